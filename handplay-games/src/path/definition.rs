use crate::{GameError, Result};
use handplay_core::PathConfig;
use serde::Serialize;
use std::f64::consts::TAU;

/// Upper bound on the points [`PathDefinition::sample`] will produce.
pub const MAX_SAMPLES: usize = 1_000_000;

/// A position in camera pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sinusoidal band the player has to trace, from `start_x` to `finish_x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDefinition {
    baseline_y: f64,
    amplitude: f64,
    frequency: f64,
    start_x: f64,
    finish_x: f64,
    tolerance: f64,
    point_radius: f64,
}

impl PathDefinition {
    pub fn from_config(config: &PathConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            baseline_y: config.baseline_y,
            amplitude: config.amplitude,
            frequency: config.frequency,
            start_x: config.start_x,
            finish_x: config.finish_x,
            tolerance: config.tolerance,
            point_radius: config.point_radius,
        })
    }

    /// Vertical center of the band at horizontal position `x`.
    pub fn center_y(&self, x: f64) -> f64 {
        self.baseline_y + self.amplitude * (self.frequency * (x - self.start_x) * TAU).sin()
    }

    pub fn start_point(&self) -> Point {
        Point::new(self.start_x, self.center_y(self.start_x))
    }

    pub fn finish_point(&self) -> Point {
        Point::new(self.finish_x, self.center_y(self.finish_x))
    }

    /// Within `tolerance` of the band center directly above or below `p`.
    pub fn is_within_band(&self, p: Point) -> bool {
        (p.y - self.center_y(p.x)).abs() <= self.tolerance
    }

    /// Within `point_radius` of the start marker on both axes.
    pub fn is_at_start(&self, p: Point) -> bool {
        let start = self.start_point();
        (p.x - start.x).abs() <= self.point_radius && (p.y - start.y).abs() <= self.point_radius
    }

    /// Reaching the finish column is enough; height is policed by the band.
    pub fn is_at_finish(&self, p: Point) -> bool {
        (p.x - self.finish_x).abs() <= self.point_radius
    }

    /// Polyline through the band center, `step` pixels apart, ending exactly
    /// on the finish point.
    pub fn sample(&self, step: f64) -> Result<Vec<Point>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(GameError::InvalidPath(format!(
                "sample step must be positive, got {}",
                step
            )));
        }

        let count = ((self.finish_x - self.start_x) / step).ceil();
        if count >= MAX_SAMPLES as f64 {
            return Err(GameError::InvalidPath(format!(
                "sample step {} yields more than {} points",
                step, MAX_SAMPLES
            )));
        }
        let count = count as usize;
        let mut points: Vec<Point> = (0..count)
            .map(|i| {
                let x = self.start_x + i as f64 * step;
                Point::new(x, self.center_y(x))
            })
            .collect();
        points.push(self.finish_point());
        Ok(points)
    }
}
