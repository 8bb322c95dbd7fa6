//! Dense Haralick texture maps.
//!
//! The image is quantized to integer gray levels, cut into every valid
//! stride-1 window, each window is reduced to a `(directions, statistics)`
//! feature array on a worker pool, and the results are assembled into a map
//! of shape `(directions, statistics, map_extent...)` where
//! `map_extent = image_extent - window_extent + 1`.


use std::num::NonZeroUsize;

use common::parallel::WorkerPool;
use ndarray::{ArrayBase, Data, Dimension};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::assemble::{assemble_feature_map, FeatureMap};
use crate::error::{Error, Result};
use crate::image::{min_max, to_f64, ImageRank};
use crate::patches::PatchGrid;
use crate::rescale::GrayLevelRescaler;
use crate::texture::{Haralick, TexturePrimitive};

/// Window extent used along every axis when no window is configured.
pub const DEFAULT_WINDOW_EXTENT: usize = 7;

/// Parameters of [`haralick_map_extraction`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HaralickMapConfig {
    /// Sliding window shape, one extent per image axis.
    /// Defaults to `(7, 7)` for 2D and `(7, 7, 7)` for 3D images.
    pub win_size: Option<Vec<usize>>,
    /// Target number of gray levels. Defaults to the image maximum.
    pub n_gray_levels: Option<f64>,
    /// Intensity range mapped onto `[0, n_gray_levels]`.
    /// Defaults to the image `(min, max)`.
    pub gray_limits: Option<(f64, f64)>,
    /// Parameters of the default texture primitive.
    pub haralick: Haralick,
    /// Worker count override; host parallelism when unset.
    pub workers: Option<NonZeroUsize>,
}

impl HaralickMapConfig {
    /// Window shape for an image of the given rank.
    pub fn window_for(&self, rank: ImageRank) -> Vec<usize> {
        self.win_size
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_WINDOW_EXTENT; rank.ndim()])
    }
}

/// Extracts a Haralick texture map with the built-in [`Haralick`] primitive.
///
/// 2D images yield `(4, 14, map_h, map_w)`, 3D images
/// `(13, 14, map_d, map_h, map_w)` (13 columns when the 14th statistic is
/// disabled).
pub fn haralick_map_extraction<S, D, A>(
    image: &ArrayBase<S, D>,
    config: &HaralickMapConfig,
) -> Result<FeatureMap>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: AsPrimitive<f64>,
{
    config.haralick.validate()?;
    haralick_map_extraction_with(image, config, &config.haralick)
}

/// Same pipeline as [`haralick_map_extraction`] with a caller-supplied
/// texture primitive. `config.haralick` is ignored.
pub fn haralick_map_extraction_with<S, D, A, P>(
    image: &ArrayBase<S, D>,
    config: &HaralickMapConfig,
    primitive: &P,
) -> Result<FeatureMap>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: AsPrimitive<f64>,
    P: TexturePrimitive + ?Sized,
{
    let rank = ImageRank::of(image.shape())?;
    let window = config.window_for(rank);

    if let Some((min, max)) = config.gray_limits {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
    }
    if window.len() != rank.ndim() {
        return Err(Error::DimensionMismatch {
            image_ndim: rank.ndim(),
            window_ndim: window.len(),
        });
    }

    let image = to_f64(image);
    // Window fit is checked before quantization so shape errors win over
    // range errors.
    let map_shape = PatchGrid::new(image.view(), &window)?.grid_shape().to_vec();
    let rescaler =
        GrayLevelRescaler::with_image_defaults(&image, config.n_gray_levels, config.gray_limits)?;

    // Quantization is monotone, so the image minimum yields the lowest level.
    let lowest_level = rescaler.rescale_value(min_max(&image).0);
    if lowest_level < 0 {
        return Err(Error::NegativeGrayLevel(lowest_level));
    }

    tracing::debug!(
        "Haralick map: image={:?}, window={:?}, levels={}, limits={:?}",
        image.shape(),
        window,
        rescaler.levels(),
        rescaler.limits()
    );

    let levels = rescaler.rescale(&image);
    let grid = PatchGrid::new(levels.view(), &window)?;
    let patches = grid.patches();
    let pool = WorkerPool::from_override(config.workers);

    tracing::info!(
        "Extracting texture features from {} patches (map {:?}) on {} workers",
        patches.len(),
        map_shape,
        pool.workers()
    );

    let results = pool.try_map(&patches, |patch| primitive.compute(patch.view()))?;
    assemble_feature_map(&results, &map_shape)
}
