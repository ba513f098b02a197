//! Euler–Maruyama integration of one trajectory realization.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::TimeGrid;
use crate::model::Drift;
use crate::noise::NoiseGenerator;
use crate::schedule::ControlSchedule;

/// Parameters for one stochastic integration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Integration step.
    pub dt: f64,
    /// Start of the horizon.
    pub t0: f64,
    /// End of the horizon (exclusive).
    pub t_max: f64,
    /// Duration integrated at the initial control value and discarded, except
    /// for the final state which seeds the trajectory.
    pub burn_in: f64,
    /// Noise intensity; each increment has standard deviation sigma*sqrt(dt).
    pub sigma: f64,
    /// Analytic starting point handed to the burn-in phase.
    pub x0: f64,
}

impl SimConfig {
    /// Validate and build the integration grid. Called before any simulation
    /// work so a bad configuration never yields a partial trajectory.
    pub fn grid(&self) -> Result<TimeGrid> {
        if self.burn_in < 0.0 || !self.burn_in.is_finite() {
            return Err(Error::invalid_config(format!(
                "burn-in must be non-negative, got {}",
                self.burn_in
            )));
        }
        if self.sigma < 0.0 || !self.sigma.is_finite() {
            return Err(Error::invalid_config(format!(
                "noise intensity must be non-negative, got {}",
                self.sigma
            )));
        }
        TimeGrid::new(self.t0, self.t_max, self.dt)
    }

    /// Number of burn-in steps, truncating as the horizon/step ratio does.
    pub fn burn_steps(&self) -> usize {
        (self.burn_in / self.dt) as usize
    }
}

/// Integrate one realization: burn-in at the initial control value, then the
/// main phase following the schedule. Returns the state at every grid sample.
///
/// Both noise batches are drawn up front from `noise`, burn-in first, so the
/// stream position after this call is a pure function of the configuration —
/// realizations simulated back to back off one stream stay reproducible.
pub fn simulate(
    config: &SimConfig,
    model: &impl Drift,
    schedule: &ControlSchedule,
    noise: &mut NoiseGenerator,
) -> Result<Vec<f64>> {
    let grid = config.grid()?;
    if schedule.grid().len() != grid.len() {
        return Err(Error::invalid_config(format!(
            "control schedule has {} samples but the grid has {}",
            schedule.grid().len(),
            grid.len()
        )));
    }

    let scale = config.sigma * config.dt.sqrt();
    let dw_burn = noise.increments(config.burn_steps(), scale);
    // The main batch covers the full grid even though the update loop stops
    // one short, keeping the draw order independent of loop structure.
    let dw = noise.increments(grid.len(), scale);

    // Burn-in: settle onto the noisy equilibrium at the pre-drift control
    // value, discarding everything but the final state.
    let u0 = schedule.initial();
    let mut x = config.x0;
    for &xi in &dw_burn {
        x = x + model.rate(x, u0) * config.dt + xi;
    }

    let mut values = vec![0.0; grid.len()];
    values[0] = x;
    for i in 0..grid.len() - 1 {
        values[i + 1] = values[i] + model.rate(values[i], schedule.value(i)) * config.dt + dw[i];
    }
    Ok(values)
}
