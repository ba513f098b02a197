//! # driftcast-ews
//!
//! Early-warning-signal analysis for driftcast trajectories: the shipped
//! implementation of the [`EwsAnalyzer`] collaborator contract.
//!
//! For one resampled, pre-transition series the analyzer
//!
//! 1. detrends with a Gaussian kernel (bandwidth as a fraction of the series
//!    length) and keeps the residuals,
//! 2. computes right-aligned rolling indicators over the residuals —
//!    variance, lag-k autocorrelation, standard deviation, skewness,
//!    kurtosis — plus the coefficient of variation of the raw state,
//! 3. estimates a Hamming-windowed Welch power spectrum over the same
//!    rolling window at a configurable stride, records its peak height
//!    (`Smax`) and the Akaike weights of fold / Hopf / null spectral fits,
//! 4. summarizes each indicator's monotonic trend as a Kendall tau against
//!    time.
//!
//! ```no_run
//! use driftcast_core::{EwsAnalyzer, EwsConfig};
//! use driftcast_ews::Analyzer;
//!
//! let times: Vec<f64> = (0..400).map(|i| i as f64).collect();
//! let values: Vec<f64> = times.iter().map(|t| (t * 0.1).sin()).collect();
//! let bundle = Analyzer.analyze(&times, &values, &EwsConfig::default()).unwrap();
//! assert_eq!(bundle.metrics.len(), 400);
//! ```

pub mod rolling;
pub mod smoothing;
pub mod spectrum;
pub mod trend;

use std::collections::BTreeMap;

use thiserror::Error;

use driftcast_core::{
    BoxError, EwsAnalyzer, EwsBundle, EwsConfig, Metric, MetricsRow, SpectrumRow, TrendStat,
    TrendStats, lag_label,
};

use rolling::{
    rolling_autocorr, rolling_coeff_var, rolling_kurtosis, rolling_skewness, rolling_std,
    rolling_variance,
};
use smoothing::gaussian_smooth;
use spectrum::{fit_spectrum, welch_psd};
use trend::trend_against_time;

/// Fewest series points the rolling machinery accepts.
pub const MIN_SERIES_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("series too short for analysis: {got} points, need at least {need}")]
    SeriesTooShort { got: usize, need: usize },
    #[error("time and value axes differ in length: {times} vs {values}")]
    AxisMismatch { times: usize, values: usize },
    #[error("rolling window fraction must be in (0, 1], got {0}")]
    BadRollWindow(f64),
    #[error("bandwidth must be positive, got {0}")]
    BadBandwidth(f64),
    #[error("Hamming window needs at least 4 points, got {0}")]
    BadHamLength(usize),
    #[error("Hamming offset fraction must be in (0, 1], got {0}")]
    BadHamOffset(f64),
    #[error("spectral roll offset must be positive")]
    BadRollOffset,
}

/// The spectral EWS analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer;

impl Analyzer {
    fn validate(times: &[f64], values: &[f64], config: &EwsConfig) -> Result<(), AnalysisError> {
        if times.len() != values.len() {
            return Err(AnalysisError::AxisMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.len() < MIN_SERIES_LEN {
            return Err(AnalysisError::SeriesTooShort {
                got: times.len(),
                need: MIN_SERIES_LEN,
            });
        }
        if !(config.roll_window > 0.0 && config.roll_window <= 1.0) {
            return Err(AnalysisError::BadRollWindow(config.roll_window));
        }
        if !(config.band_width > 0.0) {
            return Err(AnalysisError::BadBandwidth(config.band_width));
        }
        if config.ham_length < 4 {
            return Err(AnalysisError::BadHamLength(config.ham_length));
        }
        if !(config.ham_offset > 0.0 && config.ham_offset <= 1.0) {
            return Err(AnalysisError::BadHamOffset(config.ham_offset));
        }
        if config.pspec_roll_offset == 0 {
            return Err(AnalysisError::BadRollOffset);
        }
        Ok(())
    }

    /// Run the full analysis. See the crate docs for the stages.
    pub fn analyze_series(
        &self,
        times: &[f64],
        values: &[f64],
        config: &EwsConfig,
    ) -> Result<EwsBundle, AnalysisError> {
        Self::validate(times, values, config)?;
        let n = values.len();
        let window = ((config.roll_window * n as f64).round() as usize).clamp(2, n);
        let dt = times[1] - times[0];

        let smoothing = gaussian_smooth(values, config.band_width);
        let residuals: Vec<f64> = values
            .iter()
            .zip(&smoothing)
            .map(|(x, s)| x - s)
            .collect();

        let variance = config
            .has(Metric::Variance)
            .then(|| rolling_variance(&residuals, window));
        let std_dev = config
            .has(Metric::StdDev)
            .then(|| rolling_std(&residuals, window));
        let coeff_var = config
            .has(Metric::CoeffVar)
            .then(|| rolling_coeff_var(values, window));
        let skewness = config
            .has(Metric::Skewness)
            .then(|| rolling_skewness(&residuals, window));
        let kurtosis = config
            .has(Metric::Kurtosis)
            .then(|| rolling_kurtosis(&residuals, window));
        let autocorr: Vec<(usize, Vec<Option<f64>>)> = if config.has(Metric::Autocorrelation) {
            config
                .lag_times
                .iter()
                .map(|&lag| (lag, rolling_autocorr(&residuals, window, lag)))
                .collect()
        } else {
            Vec::new()
        };

        // Rolling power spectra: same window, advanced by the configured
        // offset, each tagged at the window's closing time.
        let mut smax = vec![None; n];
        let mut aic = vec![None::<[f64; 3]>; n];
        let mut spectra = Vec::new();
        if config.has(Metric::Smax) || config.has(Metric::Aic) {
            let mut start = 0usize;
            while start + window <= n {
                let end = start + window;
                if let Some(psd) =
                    welch_psd(&residuals[start..end], dt, config.ham_length, config.ham_offset)
                {
                    let fits = fit_spectrum(&psd);
                    let t = times[end - 1];
                    smax[end - 1] = Some(psd.smax());
                    aic[end - 1] = Some(fits.weights);
                    for (i, &frequency) in psd.frequencies.iter().enumerate() {
                        spectra.push((
                            t,
                            frequency,
                            SpectrumRow {
                                empirical: psd.power[i],
                                fit_fold: fits.fold.fitted[i],
                                fit_hopf: fits.hopf.fitted[i],
                                fit_null: fits.null.fitted[i],
                            },
                        ));
                    }
                }
                start += config.pspec_roll_offset;
            }
        }

        let metrics: Vec<(f64, MetricsRow)> = (0..n)
            .map(|i| {
                let lag_row: BTreeMap<usize, f64> = autocorr
                    .iter()
                    .filter_map(|(lag, series)| series[i].map(|v| (*lag, v)))
                    .collect();
                let row = MetricsRow {
                    state: values[i],
                    smoothing: Some(smoothing[i]),
                    variance: variance.as_ref().and_then(|v| v[i]),
                    autocorr: lag_row,
                    std_dev: std_dev.as_ref().and_then(|v| v[i]),
                    coeff_var: coeff_var.as_ref().and_then(|v| v[i]),
                    skewness: skewness.as_ref().and_then(|v| v[i]),
                    kurtosis: kurtosis.as_ref().and_then(|v| v[i]),
                    smax: smax[i],
                    aic_fold: aic[i].map(|w| w[0]),
                    aic_hopf: aic[i].map(|w| w[1]),
                    aic_null: aic[i].map(|w| w[2]),
                };
                (times[i], row)
            })
            .collect();

        // Trend strength of every computed indicator, in a stable order.
        let mut stats = Vec::new();
        let mut push_trend = |label: String, series: &[Option<f64>]| {
            if let Some((tau, p_value)) = trend_against_time(times, series) {
                stats.push((label, TrendStat { tau, p_value }));
            }
        };
        if let Some(v) = &variance {
            push_trend("Variance".to_string(), v);
        }
        for (lag, series) in &autocorr {
            push_trend(lag_label(*lag), series);
        }
        if let Some(v) = &std_dev {
            push_trend("Standard deviation".to_string(), v);
        }
        if let Some(v) = &coeff_var {
            push_trend("Coefficient of variation".to_string(), v);
        }
        if let Some(v) = &skewness {
            push_trend("Skewness".to_string(), v);
        }
        if let Some(v) = &kurtosis {
            push_trend("Kurtosis".to_string(), v);
        }
        if config.has(Metric::Smax) {
            push_trend("Smax".to_string(), &smax);
        }

        Ok(EwsBundle {
            metrics,
            spectra,
            trend: TrendStats { stats },
        })
    }
}

impl EwsAnalyzer for Analyzer {
    fn analyze(
        &self,
        times: &[f64],
        values: &[f64],
        config: &EwsConfig,
    ) -> Result<EwsBundle, BoxError> {
        self.analyze_series(times, values, config)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_series(n: usize) -> (Vec<f64>, Vec<f64>) {
        // Deterministic pseudo-noise around a slow ramp; no rng needed here.
        let times: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let values: Vec<f64> = times
            .iter()
            .map(|&t| 0.002 * t + 0.1 * (t * 12.9898).sin() * (t * 0.37).cos())
            .collect();
        (times, values)
    }

    #[test]
    fn test_one_metrics_row_per_point() {
        let (times, values) = noisy_series(300);
        let bundle = Analyzer
            .analyze_series(&times, &values, &EwsConfig::default())
            .unwrap();
        assert_eq!(bundle.metrics.len(), 300);
        // Warm-up rows carry the state but no rolling values.
        assert!(bundle.metrics[0].1.variance.is_none());
        assert!(bundle.metrics[299].1.variance.is_some());
        assert_eq!(bundle.metrics[5].1.state, values[5]);
    }

    #[test]
    fn test_autocorr_columns_follow_config() {
        let (times, values) = noisy_series(200);
        let config = EwsConfig {
            lag_times: vec![1, 4],
            ..EwsConfig::default()
        };
        let bundle = Analyzer.analyze_series(&times, &values, &config).unwrap();
        let last = &bundle.metrics.last().unwrap().1;
        assert_eq!(last.autocorr.keys().copied().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_disabled_metrics_stay_empty() {
        let (times, values) = noisy_series(200);
        let config = EwsConfig {
            metrics: vec![Metric::Variance],
            ..EwsConfig::default()
        };
        let bundle = Analyzer.analyze_series(&times, &values, &config).unwrap();
        let last = &bundle.metrics.last().unwrap().1;
        assert!(last.variance.is_some());
        assert!(last.std_dev.is_none());
        assert!(last.smax.is_none());
        assert!(last.autocorr.is_empty());
        assert!(bundle.spectra.is_empty());
    }

    #[test]
    fn test_spectra_align_with_smax_rows() {
        let (times, values) = noisy_series(400);
        let bundle = Analyzer
            .analyze_series(&times, &values, &EwsConfig::default())
            .unwrap();
        let smax_times: Vec<f64> = bundle
            .metrics
            .iter()
            .filter(|(_, row)| row.smax.is_some())
            .map(|(t, _)| *t)
            .collect();
        assert!(!smax_times.is_empty());

        let mut spectrum_times: Vec<f64> = bundle.spectra.iter().map(|(t, _, _)| *t).collect();
        spectrum_times.dedup();
        assert_eq!(smax_times, spectrum_times);

        // AIC weights are a probability partition.
        let (_, row) = bundle
            .metrics
            .iter()
            .find(|(_, row)| row.aic_fold.is_some())
            .unwrap();
        let total = row.aic_fold.unwrap() + row.aic_hopf.unwrap() + row.aic_null.unwrap();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_labels_are_stable() {
        let (times, values) = noisy_series(300);
        let bundle = Analyzer
            .analyze_series(&times, &values, &EwsConfig::default())
            .unwrap();
        let labels: Vec<&str> = bundle.trend.labels().collect();
        assert_eq!(
            labels,
            vec![
                "Variance",
                "Lag-1 AC",
                "Lag-2 AC",
                "Lag-3 AC",
                "Standard deviation",
                "Coefficient of variation",
                "Skewness",
                "Kurtosis",
                "Smax",
            ]
        );
        for (_, stat) in &bundle.trend.stats {
            assert!(stat.tau.abs() <= 1.0);
            assert!((0.0..=1.0).contains(&stat.p_value));
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let (times, values) = noisy_series(100);
        let bad = |config: EwsConfig| Analyzer.analyze_series(&times, &values, &config);

        assert!(matches!(
            bad(EwsConfig { roll_window: 0.0, ..EwsConfig::default() }),
            Err(AnalysisError::BadRollWindow(_))
        ));
        assert!(matches!(
            bad(EwsConfig { band_width: -0.1, ..EwsConfig::default() }),
            Err(AnalysisError::BadBandwidth(_))
        ));
        assert!(matches!(
            bad(EwsConfig { ham_length: 2, ..EwsConfig::default() }),
            Err(AnalysisError::BadHamLength(2))
        ));
        assert!(matches!(
            bad(EwsConfig { pspec_roll_offset: 0, ..EwsConfig::default() }),
            Err(AnalysisError::BadRollOffset)
        ));
    }

    #[test]
    fn test_rejects_short_series() {
        let times = vec![0.0, 1.0, 2.0];
        let values = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            Analyzer.analyze_series(&times, &values, &EwsConfig::default()),
            Err(AnalysisError::SeriesTooShort { got: 3, .. })
        ));
    }
}
