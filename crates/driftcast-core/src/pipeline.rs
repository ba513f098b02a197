//! EWS pipeline orchestration and result assembly.
//!
//! For every realization (ascending) and every tracked variable (configured
//! order), the orchestrator resamples the trajectory to the analysis spacing,
//! truncates it at the transition time, invokes the analysis collaborator,
//! and tags the returned artifacts with their (realization, variable) origin.
//! The assembler then concatenates the tagged artifacts into three
//! multi-indexed tables, verifying index uniqueness along the way.

use crate::ensemble::RealizationSet;
use crate::error::{Error, Result};
use crate::ews::{EwsAnalyzer, EwsConfig, MetricsRow, SpectrumRow, TrendStats};
use crate::table::{MetricsKey, Ordered, SeriesKey, SpectrumKey, Table};

/// Orchestration parameters on top of the collaborator's own configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Time spacing of the analyzed series. Must be an integer multiple of
    /// the simulation step.
    pub analysis_dt: f64,
    /// State variables to analyze, in the order their artifacts accumulate.
    pub variables: Vec<String>,
    pub ews: EwsConfig,
}

/// The three assembled artifact tables.
#[derive(Debug, Clone)]
pub struct EwsTables {
    /// Rolling metrics indexed by (realization, variable, time).
    pub metrics: Table<MetricsKey, MetricsRow>,
    /// Power spectra indexed by (realization, variable, time, frequency).
    pub spectra: Table<SpectrumKey, SpectrumRow>,
    /// Trend statistics indexed by (realization, variable).
    pub trend: Table<SeriesKey, TrendStats>,
}

/// Resampling stride implied by the analysis spacing, rejecting spacings that
/// are not an integer multiple of the simulation step.
fn resample_stride(sim_dt: f64, analysis_dt: f64) -> Result<usize> {
    if !(analysis_dt > 0.0) {
        return Err(Error::invalid_config(format!(
            "analysis spacing must be positive, got {analysis_dt}"
        )));
    }
    let ratio = analysis_dt / sim_dt;
    let stride = ratio.round();
    if stride < 1.0 || (ratio - stride).abs() > 1e-9 * stride {
        return Err(Error::invalid_config(format!(
            "analysis spacing {analysis_dt} is not an integer multiple of the simulation step {sim_dt}"
        )));
    }
    Ok(stride as usize)
}

/// Run the EWS analysis over every (realization, variable) series and
/// assemble the results.
///
/// A collaborator failure for any single series aborts the whole run —
/// partial tables with missing realizations would silently corrupt the
/// downstream trend statistics.
pub fn run_ews_pipeline(
    set: &RealizationSet,
    sim_dt: f64,
    transition_time: f64,
    config: &PipelineConfig,
    analyzer: &impl EwsAnalyzer,
) -> Result<EwsTables> {
    let stride = resample_stride(sim_dt, config.analysis_dt)?;
    if config.variables.is_empty() {
        return Err(Error::invalid_config(
            "at least one variable must be tracked".to_string(),
        ));
    }

    let mut realizations: Vec<u32> = set.iter().map(|t| t.realization).collect();
    realizations.sort_unstable();
    realizations.dedup();

    let mut metrics = Vec::new();
    let mut spectra = Vec::new();
    let mut trend = Vec::new();

    for &realization in &realizations {
        for variable in &config.variables {
            let trajectory = set.get(realization, variable).ok_or_else(|| {
                Error::invalid_config(format!(
                    "no trajectory for realization {realization}, variable {variable}"
                ))
            })?;

            let resampled = trajectory.resample(stride);
            // Data past the transition is out of scope for precursor
            // detection; the collaborator only ever sees the run-up.
            let (times, values) = resampled.up_to(transition_time);

            let bundle =
                analyzer
                    .analyze(times, values, &config.ews)
                    .map_err(|source| Error::Collaborator {
                        realization,
                        variable: variable.clone(),
                        source,
                    })?;

            for (time, row) in bundle.metrics {
                metrics.push((
                    MetricsKey {
                        realization,
                        variable: variable.clone(),
                        time: Ordered(time),
                    },
                    row,
                ));
            }
            for (time, frequency, row) in bundle.spectra {
                spectra.push((
                    SpectrumKey {
                        realization,
                        variable: variable.clone(),
                        time: Ordered(time),
                        frequency: Ordered(frequency),
                    },
                    row,
                ));
            }
            trend.push((
                SeriesKey {
                    realization,
                    variable: variable.clone(),
                },
                bundle.trend,
            ));
        }
        log::info!("EWS for realization {realization} complete");
    }

    Ok(EwsTables {
        metrics: Table::assemble(metrics)?,
        spectra: Table::assemble(spectra)?,
        trend: Table::assemble(trend)?,
    })
}
