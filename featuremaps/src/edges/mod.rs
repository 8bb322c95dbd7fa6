//! Edge maps: derivative operators, Gabor filter banks and phase congruency.
//!
//! [`edge_map_extraction`] validates the image and the selected detector's
//! parameters, then dispatches:
//!
//! | detector | ranks | output |
//! |----------|-------|--------|
//! | `Sobel1stDev`, `Prewitt1stDev` | 2D, 3D | gradient magnitude, image shape |
//! | `Sobel2ndDev`, `Prewitt2ndDev` | 2D, 3D | summed second derivatives, image shape |
//! | `GaborBank` | 2D | one map per kernel plus kernel parameters |
//! | `PhaseCong` | 2D | maximum (edge) and minimum (blob) moment maps |

pub mod config;
pub mod gabor;
pub mod operators;
pub mod phase_congruency;


use common::parallel::WorkerPool;
use ndarray::{Array2, ArrayBase, ArrayD, Data, Dimension, Ix2};
use num_traits::AsPrimitive;

use self::config::{EdgeDetector, EdgeMapConfig};
use self::gabor::{
    filter_bank, gabor_kernel_bank_with, GaborKernelParams, KernelSynthesizer,
    RealGaborSynthesizer,
};
use self::operators::DerivativeOperator;
use self::phase_congruency::{LogGaborPhaseCongruency, PhaseCongruencyPrimitive};
use crate::error::{Error, Result};
use crate::image::{to_f64, ImageRank};

/// Output of [`edge_map_extraction`]; the variant follows the detector.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeMaps {
    /// Derivative detectors: one map with the image shape.
    Single(ArrayD<f64>),
    /// One filtered map per bank kernel, positionally matched with `params`.
    GaborBank {
        maps: Vec<Array2<f64>>,
        params: Vec<GaborKernelParams>,
    },
    /// Phase congruency moments.
    PhaseCongruency {
        /// Maximum moment, high on edges.
        edges: Array2<f64>,
        /// Minimum moment, high on corners and blobs.
        blobs: Array2<f64>,
    },
}

impl EdgeMaps {
    /// Number of maps carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::GaborBank { maps, .. } => maps.len(),
            Self::PhaseCongruency { .. } => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_single(self) -> Option<ArrayD<f64>> {
        match self {
            Self::Single(map) => Some(map),
            _ => None,
        }
    }
}

/// Extracts edge maps with the built-in Gabor synthesizer and phase
/// congruency implementation.
pub fn edge_map_extraction<S, D, A>(
    image: &ArrayBase<S, D>,
    config: &EdgeMapConfig,
) -> Result<EdgeMaps>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: AsPrimitive<f64>,
{
    let pool = WorkerPool::from_override(config.workers);
    edge_map_extraction_with(
        image,
        config,
        &RealGaborSynthesizer::default(),
        &LogGaborPhaseCongruency::new(pool),
    )
}

/// Same dispatch as [`edge_map_extraction`] with caller-supplied primitives.
pub fn edge_map_extraction_with<S, D, A, K, P>(
    image: &ArrayBase<S, D>,
    config: &EdgeMapConfig,
    synthesizer: &K,
    phase_congruency: &P,
) -> Result<EdgeMaps>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: AsPrimitive<f64>,
    K: KernelSynthesizer + ?Sized,
    P: PhaseCongruencyPrimitive + ?Sized,
{
    let rank = ImageRank::of(image.shape())?;
    let detector = config.edge_detector;
    match detector {
        EdgeDetector::GaborBank => rank.require_planar("Gabor filter banks only handle 2D images")?,
        EdgeDetector::PhaseCong => rank.require_planar("phase congruency only handles 2D images")?,
        _ => {}
    }
    config.validate()?;

    tracing::info!("Extracting {} edge map from {:?} image", detector, image.shape());

    let image = to_f64(image);
    let maps = match detector {
        EdgeDetector::Sobel1stDev => {
            EdgeMaps::Single(DerivativeOperator::Sobel.gradient_magnitude(&image))
        }
        EdgeDetector::Prewitt1stDev => {
            EdgeMaps::Single(DerivativeOperator::Prewitt.gradient_magnitude(&image))
        }
        EdgeDetector::Sobel2ndDev => {
            EdgeMaps::Single(DerivativeOperator::Sobel.second_derivative_sum(&image))
        }
        EdgeDetector::Prewitt2ndDev => {
            EdgeMaps::Single(DerivativeOperator::Prewitt.second_derivative_sum(&image))
        }
        EdgeDetector::GaborBank => {
            let image = into_planar(image)?;
            let bank = gabor_kernel_bank_with(&config.gabor, synthesizer)?;
            let pool = WorkerPool::from_override(config.workers);
            let maps = filter_bank(image.view(), &bank, &pool)?;
            EdgeMaps::GaborBank {
                maps,
                params: bank.params,
            }
        }
        EdgeDetector::PhaseCong => {
            let image = into_planar(image)?;
            let result = phase_congruency.compute(image.view(), &config.phase_congruency)?;
            EdgeMaps::PhaseCongruency {
                edges: result.max_moment,
                blobs: result.min_moment,
            }
        }
    };
    Ok(maps)
}

fn into_planar(image: ArrayD<f64>) -> Result<Array2<f64>> {
    let ndim = image.ndim();
    image
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::UnsupportedDimension {
            ndim,
            reason: "expected a 2D image",
        })
}
