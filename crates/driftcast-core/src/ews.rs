//! Contract with the early-warning-signal analysis collaborator.
//!
//! The orchestrator hands the collaborator one resampled, pre-transition
//! series plus an [`EwsConfig`], and gets back exactly three artifacts:
//! rolling metrics over time, power spectra over (time, frequency), and
//! per-series trend statistics. The shape of this interface is stable; the
//! analysis internals live behind it (see the `driftcast-ews` crate for the
//! shipped implementation).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// Statistical indicators the collaborator can be asked to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Rolling variance of the detrended series.
    Variance,
    /// Rolling autocorrelation at each configured lag.
    Autocorrelation,
    /// Rolling standard deviation.
    StdDev,
    /// Rolling coefficient of variation of the raw state.
    CoeffVar,
    /// Rolling skewness.
    Skewness,
    /// Rolling kurtosis.
    Kurtosis,
    /// Peak height of the rolling power spectrum.
    Smax,
    /// Akaike weights of the fold/Hopf/null spectral fits.
    Aic,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Variance,
        Metric::Autocorrelation,
        Metric::StdDev,
        Metric::CoeffVar,
        Metric::Skewness,
        Metric::Kurtosis,
        Metric::Smax,
        Metric::Aic,
    ];
}

/// Collaborator configuration, mirrored one-for-one from its call signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EwsConfig {
    /// Rolling window length as a fraction of the analyzed series length.
    pub roll_window: f64,
    /// Detrending bandwidth as a fraction of the analyzed series length.
    pub band_width: f64,
    /// Autocorrelation lags, in analysis samples.
    pub lag_times: Vec<usize>,
    /// Which indicators to compute.
    pub metrics: Vec<Metric>,
    /// Number of data points in each Hamming window of the spectral estimate.
    pub ham_length: usize,
    /// Fraction of the Hamming window to advance between segments.
    pub ham_offset: f64,
    /// Rolling-window advance, in samples, between spectral estimates.
    pub pspec_roll_offset: usize,
}

impl Default for EwsConfig {
    fn default() -> Self {
        Self {
            roll_window: 0.4,
            band_width: 0.1,
            lag_times: vec![1, 2, 3],
            metrics: Metric::ALL.to_vec(),
            ham_length: 40,
            ham_offset: 0.5,
            pspec_roll_offset: 20,
        }
    }
}

impl EwsConfig {
    pub fn has(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }
}

/// One row of the rolling-metrics artifact. Fields the configuration did not
/// enable — or that the window had not yet filled for — stay `None`.
#[derive(Debug, Clone, Default)]
pub struct MetricsRow {
    /// Raw state value at this analysis time.
    pub state: f64,
    /// Kernel-smoothed state.
    pub smoothing: Option<f64>,
    pub variance: Option<f64>,
    /// Autocorrelation by lag.
    pub autocorr: BTreeMap<usize, f64>,
    pub std_dev: Option<f64>,
    pub coeff_var: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub smax: Option<f64>,
    pub aic_fold: Option<f64>,
    pub aic_hopf: Option<f64>,
    pub aic_null: Option<f64>,
}

/// One row of the power-spectrum artifact: the empirical density and the
/// three fitted candidate forms at a single (time, frequency) point.
#[derive(Debug, Clone)]
pub struct SpectrumRow {
    pub empirical: f64,
    pub fit_fold: f64,
    pub fit_hopf: f64,
    pub fit_null: f64,
}

/// Monotonic-trend strength of one metric over the pre-transition window.
#[derive(Debug, Clone, Copy)]
pub struct TrendStat {
    /// Kendall rank correlation against time.
    pub tau: f64,
    /// Two-sided significance of the correlation.
    pub p_value: f64,
}

/// Trend statistics for every computed metric of one analyzed series, in a
/// stable metric order.
#[derive(Debug, Clone, Default)]
pub struct TrendStats {
    pub stats: Vec<(String, TrendStat)>,
}

impl TrendStats {
    pub fn get(&self, metric: &str) -> Option<TrendStat> {
        self.stats
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, s)| *s)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(|(name, _)| name.as_str())
    }
}

/// The three artifacts returned for one (realization, variable) series.
#[derive(Debug, Clone)]
pub struct EwsBundle {
    /// Rolling metrics, one entry per analysis time point, time-ascending.
    pub metrics: Vec<(f64, MetricsRow)>,
    /// Power spectra as (time, frequency, row), ordered by time then
    /// frequency.
    pub spectra: Vec<(f64, f64, SpectrumRow)>,
    /// One trend summary for the whole series.
    pub trend: TrendStats,
}

/// The analysis collaborator. Implementations may fail per series; the
/// orchestrator propagates such failures unmodified and aborts the run.
pub trait EwsAnalyzer {
    fn analyze(
        &self,
        times: &[f64],
        values: &[f64],
        config: &EwsConfig,
    ) -> std::result::Result<EwsBundle, BoxError>;
}

/// Label used for a lag-autocorrelation column, e.g. `Lag-1 AC`.
pub fn lag_label(lag: usize) -> String {
    format!("Lag-{lag} AC")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_setup() {
        let cfg = EwsConfig::default();
        assert_eq!(cfg.roll_window, 0.4);
        assert_eq!(cfg.band_width, 0.1);
        assert_eq!(cfg.lag_times, vec![1, 2, 3]);
        assert_eq!(cfg.ham_length, 40);
        assert_eq!(cfg.ham_offset, 0.5);
        assert_eq!(cfg.pspec_roll_offset, 20);
        assert!(cfg.has(Metric::Variance));
        assert!(cfg.has(Metric::Aic));
    }

    #[test]
    fn test_trend_stats_lookup() {
        let trend = TrendStats {
            stats: vec![(
                "Variance".to_string(),
                TrendStat {
                    tau: 0.9,
                    p_value: 0.001,
                },
            )],
        };
        assert_eq!(trend.get("Variance").unwrap().tau, 0.9);
        assert!(trend.get("Smax").is_none());
    }

    #[test]
    fn test_lag_label_format() {
        assert_eq!(lag_label(2), "Lag-2 AC");
    }
}
