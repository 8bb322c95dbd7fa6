//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use featuremaps::prelude::*;
//! ```

// Errors
pub use crate::{Error, Result};

// Texture maps - main API
pub use crate::{
    haralick_map_extraction, FeatureMap, Haralick, HaralickMapConfig, TexturePrimitive,
};

// Edge maps - main API
pub use crate::{
    edge_map_extraction, gabor_kernel_bank, EdgeDetector, EdgeMapConfig, EdgeMaps,
    NoiseMethod,
};
