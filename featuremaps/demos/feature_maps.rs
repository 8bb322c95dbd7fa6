//! Demo: texture and edge maps of a synthetic image
//!
//! Builds a 96×96 image with a bright disc on a striped background, then
//! extracts a Haralick texture map and every edge map and logs a summary of
//! each. Log output also goes to `logs/featuremaps.*.log`.
//!
//! An optional YAML file overrides the Haralick configuration, e.g.
//!
//! ```yaml
//! win_size: [9, 9]
//! n_gray_levels: 16
//! haralick:
//!   distance: 2
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example feature_maps [haralick.yml]
//! ```

use std::env;
use std::time::Instant;

use anyhow::Context;
use ndarray::{Array2, ArrayD};
use strum::IntoEnumIterator;

use featuremaps::{
    edge_map_extraction, haralick_map_extraction, EdgeDetector, EdgeMapConfig, EdgeMaps,
    HaralickMapConfig,
};

const IMAGE_SIZE: usize = 96;

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info")?;

    let haralick_config = match env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            serde_yml::from_str::<HaralickMapConfig>(&text)
                .with_context(|| format!("Invalid Haralick configuration in {path}"))?
        }
        None => HaralickMapConfig {
            win_size: Some(vec![7, 7]),
            n_gray_levels: Some(16.0),
            ..Default::default()
        },
    };

    let image = synthetic_image(IMAGE_SIZE);

    let start = Instant::now();
    let texture = haralick_map_extraction(&image, &haralick_config)?;
    tracing::info!(
        shape = ?texture.shape(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Haralick map"
    );
    log_range("haralick", &texture);

    for detector in EdgeDetector::iter() {
        let start = Instant::now();
        let maps = edge_map_extraction(&image, &EdgeMapConfig::new(detector))?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match maps {
            EdgeMaps::Single(map) => {
                tracing::info!(%detector, elapsed_ms, "single map");
                log_range(detector.into(), &map);
            }
            EdgeMaps::GaborBank { maps, params } => {
                tracing::info!(%detector, elapsed_ms, kernels = maps.len(), "Gabor bank");
                if let (Some(first), Some(last)) = (params.first(), params.last()) {
                    tracing::info!(
                        "frequencies {:.3}..{:.3}, orientations {:.3}..{:.3} rad",
                        first.frequency,
                        last.frequency,
                        first.theta,
                        last.theta
                    );
                }
            }
            EdgeMaps::PhaseCongruency { edges, blobs } => {
                tracing::info!(%detector, elapsed_ms, "phase congruency");
                log_range("edges", &edges.into_dyn());
                log_range("blobs", &blobs.into_dyn());
            }
        }
    }

    Ok(())
}

/// Horizontal stripes with a bright disc in the middle.
fn synthetic_image(size: usize) -> Array2<u8> {
    let center = size as f64 / 2.0;
    let radius = size as f64 / 4.0;
    Array2::from_shape_fn((size, size), |(y, x)| {
        let (dy, dx) = (y as f64 - center, x as f64 - center);
        if dy.hypot(dx) < radius {
            200
        } else if (y / 4) % 2 == 0 {
            40
        } else {
            90
        }
    })
}

fn log_range(name: &str, map: &ArrayD<f64>) {
    let (min, max) = map
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    tracing::info!(name, min, max, "value range");
}
