//! Uniform time grid shared by trajectories and control schedules.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Evenly spaced time axis over the half-open horizon `[t0, t_max)`.
///
/// Grid length is `ceil((t_max - t0) / dt)` and sample `i` sits at
/// `t0 + i * dt`, matching the sampling of every trajectory produced from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    t0: f64,
    dt: f64,
    len: usize,
}

impl TimeGrid {
    /// Build a grid over `[t0, t_max)` with step `dt`.
    ///
    /// Rejects a non-positive step or an empty horizon before any work is
    /// done with the grid.
    pub fn new(t0: f64, t_max: f64, dt: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::invalid_config(format!(
                "time step must be positive, got {dt}"
            )));
        }
        if !(t_max > t0) {
            return Err(Error::invalid_config(format!(
                "horizon must be positive, got [{t0}, {t_max})"
            )));
        }
        let len = ((t_max - t0) / dt).ceil() as usize;
        Ok(Self { t0, dt, len })
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of sample `i`, exactly `t0 + i * dt`.
    pub fn time(&self, i: usize) -> f64 {
        self.t0 + i as f64 * self.dt
    }

    /// Materialize the full time axis.
    pub fn times(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.time(i)).collect()
    }
}
