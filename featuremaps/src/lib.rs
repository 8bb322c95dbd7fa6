//! Featuremaps - dense texture and edge feature maps for 2D and 3D images.
//!
//! Every map is computed per pixel (or voxel) so it can feed a per-pixel
//! classifier:
//! - Haralick texture statistics over every valid sliding window, assembled
//!   into a `(directions, statistics, map...)` array
//! - Sobel and Prewitt first and second derivative responses
//! - Real Gabor filter bank responses
//! - Phase congruency edge and blob moments
//!
//! Per-patch and per-kernel work runs on a worker pool built for each call;
//! results always come back in input order.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use featuremaps::{edge_map_extraction, haralick_map_extraction};
//! use featuremaps::{EdgeMapConfig, HaralickMapConfig};
//!
//! let texture = haralick_map_extraction(&image, &HaralickMapConfig::default())?;
//! println!("texture map shape: {:?}", texture.shape());
//!
//! let edges = edge_map_extraction(&image, &EdgeMapConfig::for_detector("PhaseCong")?)?;
//! ```

mod assemble;
pub mod edges;
mod error;
mod haralick_map;
mod image;
mod patches;
mod rescale;
pub mod texture;

#[cfg(test)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Errors and image handling
// ============================================================================

pub use error::{Error, Result};
pub use image::ImageRank;

// ============================================================================
// Pipeline stages
// ============================================================================

pub use assemble::{assemble_feature_map, FeatureMap};
pub use patches::{extract_patches, PatchGrid};
pub use rescale::{rescale_gray_levels, GrayLevelRescaler};

// ============================================================================
// Texture maps
// ============================================================================

pub use haralick_map::{
    // Configuration
    HaralickMapConfig,
    DEFAULT_WINDOW_EXTENT,
    // Main API
    haralick_map_extraction,
    haralick_map_extraction_with,
};
pub use texture::{Haralick, TexturePrimitive};

// ============================================================================
// Edge maps
// ============================================================================

pub use edges::config::{
    EdgeDetector, EdgeMapConfig, GaborBankConfig, NoiseMethod, PhaseCongruencyConfig,
};
pub use edges::gabor::{
    // Kernel synthesis
    GaborKernelBank,
    GaborKernelParams,
    KernelSynthesizer,
    RealGaborSynthesizer,
    // Filtering
    convolve_wrap,
    gabor_kernel_bank,
    gabor_kernel_bank_with,
};
pub use edges::operators::DerivativeOperator;
pub use edges::phase_congruency::{
    LogGaborPhaseCongruency, PhaseCongruency, PhaseCongruencyPrimitive,
};
pub use edges::{edge_map_extraction, edge_map_extraction_with, EdgeMaps};

// ============================================================================
// Parallel execution
// ============================================================================

pub use common::parallel::{PoolError, WorkerPool};
