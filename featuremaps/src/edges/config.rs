//! Configuration types for edge map extraction.
//!
//! [`EdgeMapConfig`] selects one [`EdgeDetector`] and carries the parameter
//! groups of the detectors that take parameters. Groups that do not belong
//! to the selected detector are ignored.

use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::error::{Error, Result};

// ============================================================================
// Enums
// ============================================================================

/// Edge detector selected by [`EdgeMapConfig::edge_detector`].
///
/// Names parse exactly as spelled (`"Sobel1stDev"`, `"GaborBank"`, ...);
/// anything else fails with [`Error::UnknownDetector`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum EdgeDetector {
    /// Sobel gradient magnitude. 2D and 3D.
    #[default]
    Sobel1stDev,
    /// Prewitt gradient magnitude. 2D and 3D.
    Prewitt1stDev,
    /// Sum over axes of the Sobel second derivative. 2D and 3D.
    Sobel2ndDev,
    /// Sum over axes of the Prewitt second derivative. 2D and 3D.
    Prewitt2ndDev,
    /// Bank of real Gabor filters. 2D only.
    GaborBank,
    /// Phase congruency moments. 2D only.
    PhaseCong,
}

impl EdgeDetector {
    /// All accepted detector names, in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::iter().map(<&'static str>::from).collect()
    }

    /// Detectors that only accept 2D images.
    pub fn is_planar_only(self) -> bool {
        matches!(self, Self::GaborBank | Self::PhaseCong)
    }
}

impl FromStr for EdgeDetector {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::iter()
            .find(|detector| <&'static str>::from(*detector) == name)
            .ok_or_else(|| Error::UnknownDetector(name.to_string()))
    }
}

/// How phase congruency estimates the noise energy threshold of each
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Display, IntoStaticStr)]
pub enum NoiseMethod {
    /// Median of the smallest-scale amplitude, divided by `sqrt(ln 4)`.
    #[default]
    Median,
    /// Mode of the Rayleigh-distributed smallest-scale amplitude, from a
    /// 50-bin histogram.
    RayleighMode,
    /// Fixed threshold applied as-is.
    Fixed(f64),
}

// ============================================================================
// Parameter groups
// ============================================================================

/// Gabor filter bank sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaborBankConfig {
    /// Number of frequencies sampled in `freq_range`.
    pub n_freq: usize,
    /// Inclusive `(low, high)` frequency range, in cycles per pixel.
    pub freq_range: (f64, f64),
    /// Number of orientations sampled in `[0, pi]`.
    pub n_theta: usize,
    /// `(height, width)` the Gaussian envelope should span, in pixels.
    pub win_size: (f64, f64),
}

impl Default for GaborBankConfig {
    fn default() -> Self {
        Self {
            n_freq: 10,
            freq_range: (0.05, 0.2),
            n_theta: 6,
            win_size: (15.0, 15.0),
        }
    }
}

impl GaborBankConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_freq == 0 {
            return Err(Error::invalid_parameter("n_freq", "must be at least 1"));
        }
        if self.n_theta == 0 {
            return Err(Error::invalid_parameter("n_theta", "must be at least 1"));
        }
        let (low, high) = self.freq_range;
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::invalid_parameter(
                "freq_range",
                format!("bounds must be finite, got ({low}, {high})"),
            ));
        }
        if low > high {
            return Err(Error::InvalidRange {
                min: low,
                max: high,
            });
        }
        let (height, width) = self.win_size;
        if !(height > 1.0 && width > 1.0) || !height.is_finite() || !width.is_finite() {
            return Err(Error::invalid_parameter(
                "win_size",
                format!("extents must be finite and greater than 1, got ({height}, {width})"),
            ));
        }
        Ok(())
    }

    /// Envelope standard deviations `(sigma_y, sigma_x)`: the window spans
    /// three deviations on each side of the center.
    pub fn sigmas(&self) -> (f64, f64) {
        let (height, width) = self.win_size;
        ((height - 1.0) / 6.0, (width - 1.0) / 6.0)
    }
}

/// Log-Gabor phase congruency parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhaseCongruencyConfig {
    /// Number of wavelet scales.
    pub nscale: usize,
    /// Number of filter orientations.
    pub norient: usize,
    /// Wavelength of the smallest-scale filter, in pixels.
    pub min_wavelength: f64,
    /// Wavelength ratio between successive scales.
    pub mult: f64,
    /// Ratio of the log-Gabor bandwidth to the center frequency.
    pub sigma_onf: f64,
    /// Noise standard deviations above the mean that count as signal.
    pub k: f64,
    /// Frequency spread below which phase congruency is penalized.
    pub cut_off: f64,
    /// Sharpness of the frequency spread penalty.
    pub g: f64,
    pub noise_method: NoiseMethod,
}

impl Default for PhaseCongruencyConfig {
    fn default() -> Self {
        Self {
            nscale: 5,
            norient: 6,
            min_wavelength: 3.0,
            mult: 2.1,
            sigma_onf: 0.55,
            k: 2.0,
            cut_off: 0.5,
            g: 10.0,
            noise_method: NoiseMethod::Median,
        }
    }
}

impl PhaseCongruencyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.nscale < 2 {
            return Err(Error::invalid_parameter("nscale", "must be at least 2"));
        }
        if self.norient == 0 {
            return Err(Error::invalid_parameter("norient", "must be at least 1"));
        }
        if !(self.min_wavelength > 0.0) {
            return Err(Error::invalid_parameter(
                "min_wavelength",
                format!("must be positive, got {}", self.min_wavelength),
            ));
        }
        if !(self.mult > 0.0) || self.mult == 1.0 {
            return Err(Error::invalid_parameter(
                "mult",
                format!("must be positive and different from 1, got {}", self.mult),
            ));
        }
        if !(self.sigma_onf > 0.0) || self.sigma_onf == 1.0 {
            return Err(Error::invalid_parameter(
                "sigma_onf",
                format!("must be positive and different from 1, got {}", self.sigma_onf),
            ));
        }
        if let NoiseMethod::Fixed(threshold) = self.noise_method {
            if !(threshold >= 0.0) {
                return Err(Error::invalid_parameter(
                    "noise_method",
                    format!("fixed threshold must be non-negative, got {threshold}"),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Edge map configuration
// ============================================================================

/// Parameters of [`edge_map_extraction`](super::edge_map_extraction).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeMapConfig {
    pub edge_detector: EdgeDetector,
    /// Used by [`EdgeDetector::GaborBank`].
    pub gabor: GaborBankConfig,
    /// Used by [`EdgeDetector::PhaseCong`].
    pub phase_congruency: PhaseCongruencyConfig,
    /// Worker count override; host parallelism when unset.
    pub workers: Option<NonZeroUsize>,
}

impl EdgeMapConfig {
    pub fn new(edge_detector: EdgeDetector) -> Self {
        Self {
            edge_detector,
            ..Default::default()
        }
    }

    /// Builds a default configuration for a detector given by name.
    pub fn for_detector(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Validates the parameter group of the selected detector.
    pub fn validate(&self) -> Result<()> {
        match self.edge_detector {
            EdgeDetector::GaborBank => self.gabor.validate(),
            EdgeDetector::PhaseCong => self.phase_congruency.validate(),
            _ => Ok(()),
        }
    }
}
