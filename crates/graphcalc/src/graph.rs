//! Function-of-x view of an expression
//!
//! The memory variable `M` plays the role of x. This module covers the numeric
//! side of graphing only: sampling and intercept search.

use crate::core::evaluator::Bindings;
use crate::core::{float_serde, Evaluator, STORED_VARIABLE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Intercept search settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Left end of the scanned range
    #[serde(with = "float_serde")]
    pub x_min: f64,
    /// Right end of the scanned range (inclusive)
    #[serde(with = "float_serde")]
    pub x_max: f64,
    /// Distance between scanned points
    #[serde(with = "float_serde")]
    pub step: f64,
    /// |y| below this counts as a crossing
    #[serde(with = "float_serde")]
    pub tolerance: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            step: 0.001,
            tolerance: 0.001,
        }
    }
}

impl GraphConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scanned range
    #[must_use]
    pub const fn with_range(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    /// Set the scan step
    #[must_use]
    pub const fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the crossing tolerance
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// True when the range and step describe a finite scan
    #[must_use]
    pub fn is_valid(&self) -> bool {
        scan_len(self.x_min, self.x_max, self.step).is_some()
    }
}

/// Bindings with `M` pinned to x
struct AtX<'a> {
    base: &'a HashMap<String, f64>,
    x: f64,
}

impl Bindings for AtX<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        if name == STORED_VARIABLE {
            Some(self.x)
        } else {
            self.base.lookup(name)
        }
    }
}

/// Snapshot of an expression, evaluated as y = f(x)
#[derive(Debug, Clone)]
pub struct Graph {
    brain: Evaluator,
    bindings: HashMap<String, f64>,
}

impl Graph {
    /// Creates a graph from an engine snapshot and its bindings
    #[must_use]
    pub fn new(brain: Evaluator, bindings: HashMap<String, f64>) -> Self {
        Self { brain, bindings }
    }

    /// Evaluates the expression with `M = x`; an empty result counts as 0
    #[must_use]
    pub fn y(&self, x: f64) -> f64 {
        self.brain
            .evaluate(&AtX {
                base: &self.bindings,
                x,
            })
            .value
            .unwrap_or(0.0)
    }

    /// Title for the plot: the expression, or "Graph" when there is none
    #[must_use]
    pub fn title(&self) -> String {
        let description = self.brain.description();
        if description.is_empty() {
            "Graph".to_string()
        } else {
            description
        }
    }

    /// Samples `[x_min, x_max)` every `step`
    #[must_use]
    pub fn sample(&self, x_min: f64, x_max: f64, step: f64) -> Vec<(f64, f64)> {
        let Some(count) = scan_len(x_min, x_max, step) else {
            return Vec::new();
        };
        (0..count)
            .map(|i| x_min + i as f64 * step)
            .take_while(|x| *x < x_max)
            .map(|x| (x, self.y(x)))
            .collect()
    }

    /// f(0), rounded to hundredths
    #[must_use]
    pub fn y_intercept(&self) -> f64 {
        round_hundredths(self.y(0.0))
    }

    /// Points where |f(x)| falls under the tolerance, rounded to hundredths,
    /// without duplicates, in ascending order
    #[must_use]
    pub fn x_intercepts(&self, config: &GraphConfig) -> Vec<f64> {
        let Some(count) = scan_len(config.x_min, config.x_max, config.step) else {
            return Vec::new();
        };
        let mut crossings: Vec<f64> = (0..count)
            .map(|i| config.x_min + i as f64 * config.step)
            .filter(|x| *x <= config.x_max)
            .filter(|x| self.y(*x).abs() < config.tolerance)
            .map(round_hundredths)
            .collect();
        crossings.sort_by(f64::total_cmp);
        crossings.dedup();
        crossings
    }
}

/// Largest number of points a single scan will evaluate
pub const MAX_SCAN_POINTS: usize = 10_000_000;

/// Number of scan points in `[x_min, x_max]`, `None` for unusable ranges and
/// for scans longer than [`MAX_SCAN_POINTS`]
fn scan_len(x_min: f64, x_max: f64, step: f64) -> Option<usize> {
    if !(x_min.is_finite() && x_max.is_finite() && step.is_finite()) || step <= 0.0 || x_min > x_max
    {
        return None;
    }
    // The span itself overflows to infinity for ranges like [-1e308, 1e308]
    let intervals = ((x_max - x_min) / step).floor();
    if !intervals.is_finite() || intervals >= MAX_SCAN_POINTS as f64 {
        return None;
    }
    (intervals as usize).checked_add(1)
}

fn round_hundredths(value: f64) -> f64 {
    // + 0.0 folds -0.0 into 0.0
    (value * 100.0).round() / 100.0 + 0.0
}
