//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use netshape_core::{Feature, Geometry, Position};
use rand::Rng;

/// Random positions inside a `size` by `size` square, on a 0.01 grid.
pub fn random_positions(count: usize, size: f64) -> Vec<Position> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let x: f64 = rng.gen_range(0.0..size);
            let y: f64 = rng.gen_range(0.0..size);
            [(x * 100.0).round() / 100.0, (y * 100.0).round() / 100.0]
        })
        .collect()
}

/// Adds noise below `1e-digits` to a position.
pub fn jitter([x, y]: Position, digits: i32) -> Position {
    let mut rng = rand::thread_rng();
    let scale = 10f64.powi(-digits);
    [
        x + rng.gen_range(-0.4..0.4) * scale,
        y + rng.gen_range(-0.4..0.4) * scale,
    ]
}

/// Point features at `positions`.
pub fn point_features(positions: &[Position]) -> Vec<Feature> {
    positions
        .iter()
        .map(|&p| Feature::new(Geometry::Point(p)))
        .collect()
}

/// Line features joining consecutive `positions`, each with a numeric and
/// a text property.
pub fn chain_features(positions: &[Position]) -> Vec<Feature> {
    let mut rng = rand::thread_rng();
    positions
        .windows(2)
        .map(|pair| {
            Feature::new(Geometry::LineString(pair.to_vec()))
                .with_property("depth", rng.gen_range(0.5..8.0))
                .with_property("lining", if rng.gen_bool(0.5) { "clay" } else { "concrete" })
        })
        .collect()
}
