//! Realization aggregation: many independent trajectories, one indexed set.

use crate::error::{Error, Result};
use crate::model::Drift;
use crate::noise::NoiseGenerator;
use crate::schedule::ControlSchedule;
use crate::simulate::{SimConfig, simulate};

/// Ordered (time, value) samples for one realization of one state variable.
///
/// Created by the simulator, read-only afterwards: the analysis layers
/// resample and slice but never mutate a trajectory.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// 1-based realization identifier.
    pub realization: u32,
    /// Name of the state variable this series tracks.
    pub variable: String,
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Every k-th sample, starting from the first. Stride resampling — no
    /// interpolation, point `i` of the result is point `k*i` of the input.
    pub fn resample(&self, stride: usize) -> Trajectory {
        let stride = stride.max(1);
        Trajectory {
            realization: self.realization,
            variable: self.variable.clone(),
            times: self.times.iter().copied().step_by(stride).collect(),
            values: self.values.iter().copied().step_by(stride).collect(),
        }
    }

    /// Samples at or before `cutoff`.
    pub fn up_to(&self, cutoff: f64) -> (&[f64], &[f64]) {
        let end = self.times.partition_point(|&t| t <= cutoff);
        (&self.times[..end], &self.values[..end])
    }
}

/// The aggregated output of N independent realizations, keyed by 1-based
/// realization id. The aggregator is the sole writer; everything downstream
/// reads.
#[derive(Debug, Clone)]
pub struct RealizationSet {
    trajectories: Vec<Trajectory>,
}

impl RealizationSet {
    /// Build a set from pre-tagged trajectories, e.g. when aggregating more
    /// than one state variable per realization.
    pub fn from_trajectories(trajectories: Vec<Trajectory>) -> Self {
        Self { trajectories }
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Look up one realization's trajectory for `variable`.
    pub fn get(&self, realization: u32, variable: &str) -> Option<&Trajectory> {
        self.trajectories
            .iter()
            .find(|t| t.realization == realization && t.variable == variable)
    }

    /// Two-level (realization, time) view over every stored sample, in
    /// realization order with per-realization time order preserved.
    pub fn rows(&self) -> impl Iterator<Item = (u32, f64, f64)> + '_ {
        self.trajectories.iter().flat_map(|t| {
            t.times
                .iter()
                .zip(&t.values)
                .map(|(&time, &value)| (t.realization, time, value))
        })
    }
}

/// Run the simulator for `realizations` independent realizations off the
/// shared seeded stream and collect them into a [`RealizationSet`].
///
/// Each realization draws its own fresh burn-in and main batches, so the
/// realizations are statistically independent but collectively reproducible
/// from the stream's seed. Emits a progress notification per completed
/// realization.
pub fn simulate_ensemble(
    config: &SimConfig,
    realizations: u32,
    variable: &str,
    model: &impl Drift,
    schedule: &ControlSchedule,
    noise: &mut NoiseGenerator,
) -> Result<RealizationSet> {
    if realizations == 0 {
        return Err(Error::invalid_config(
            "realization count must be positive".to_string(),
        ));
    }
    let grid = config.grid()?;
    let times = grid.times();

    let mut trajectories = Vec::with_capacity(realizations as usize);
    for id in 1..=realizations {
        let values = simulate(config, model, schedule, noise)?;
        trajectories.push(Trajectory {
            realization: id,
            variable: variable.to_string(),
            times: times.clone(),
            values,
        });
        log::info!("simulation {id}/{realizations} complete");
    }
    Ok(RealizationSet { trajectories })
}
