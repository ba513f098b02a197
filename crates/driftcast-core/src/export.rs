//! Row-oriented CSV export of trajectories and assembled artifacts.
//!
//! One row per index tuple, header row first. The spectra export is
//! restricted to the empirical densities; fitted values stay queryable
//! through the in-memory tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ensemble::RealizationSet;
use crate::error::Result;
use crate::ews::{MetricsRow, SpectrumRow, TrendStats, lag_label};
use crate::table::{MetricsKey, SeriesKey, SpectrumKey, Table};

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write every stored trajectory sample as
/// `realization,variable,time,value`.
pub fn write_trajectories_csv(set: &RealizationSet, path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "realization,variable,time,value")?;
    for trajectory in set.iter() {
        for (&time, &value) in trajectory.times.iter().zip(&trajectory.values) {
            writeln!(
                w,
                "{},{},{},{}",
                trajectory.realization, trajectory.variable, time, value
            )?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Write the rolling-metrics table. Lag columns follow `lags`, every other
/// column is fixed; absent values stay empty.
pub fn write_metrics_csv(
    table: &Table<MetricsKey, MetricsRow>,
    lags: &[usize],
    path: &Path,
) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = String::from("realization,variable,time,State variable,Smoothing,Variance");
    for &lag in lags {
        header.push(',');
        header.push_str(&lag_label(lag));
    }
    header.push_str(
        ",Standard deviation,Coefficient of variation,Skewness,Kurtosis,Smax,AIC fold,AIC hopf,AIC null",
    );
    writeln!(w, "{header}")?;

    for (key, row) in table.rows() {
        write!(
            w,
            "{},{},{},{},{},{}",
            key.realization,
            key.variable,
            key.time,
            row.state,
            opt(row.smoothing),
            opt(row.variance)
        )?;
        for &lag in lags {
            write!(w, ",{}", opt(row.autocorr.get(&lag).copied()))?;
        }
        writeln!(
            w,
            ",{},{},{},{},{},{},{},{}",
            opt(row.std_dev),
            opt(row.coeff_var),
            opt(row.skewness),
            opt(row.kurtosis),
            opt(row.smax),
            opt(row.aic_fold),
            opt(row.aic_hopf),
            opt(row.aic_null)
        )?;
    }
    w.flush()?;
    Ok(())
}

/// Write the power-spectrum table restricted to empirical values.
pub fn write_empirical_spectra_csv(
    table: &Table<SpectrumKey, SpectrumRow>,
    path: &Path,
) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "realization,variable,time,frequency,power")?;
    for (key, row) in table.rows() {
        writeln!(
            w,
            "{},{},{},{},{}",
            key.realization, key.variable, key.time, key.frequency, row.empirical
        )?;
    }
    w.flush()?;
    Ok(())
}

/// Write the trend-statistics table, one row per (realization, variable) and
/// a tau column per metric label found in the first row.
pub fn write_trend_csv(table: &Table<SeriesKey, TrendStats>, path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let labels: Vec<String> = table
        .rows()
        .first()
        .map(|(_, trend)| trend.labels().map(str::to_string).collect())
        .unwrap_or_default();

    let mut header = String::from("realization,variable");
    for label in &labels {
        header.push(',');
        header.push_str(label);
    }
    writeln!(w, "{header}")?;

    for (key, trend) in table.rows() {
        write!(w, "{},{}", key.realization, key.variable)?;
        for label in &labels {
            write!(w, ",{}", opt(trend.get(label).map(|s| s.tau)))?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::Trajectory;
    use crate::ews::TrendStat;
    use crate::table::Ordered;
    use std::collections::BTreeMap;

    fn metrics_table() -> Table<MetricsKey, MetricsRow> {
        let mut autocorr = BTreeMap::new();
        autocorr.insert(1, 0.8);
        let rows = vec![
            (
                MetricsKey {
                    realization: 1,
                    variable: "x".to_string(),
                    time: Ordered(0.0),
                },
                MetricsRow {
                    state: 1.0,
                    ..MetricsRow::default()
                },
            ),
            (
                MetricsKey {
                    realization: 1,
                    variable: "x".to_string(),
                    time: Ordered(1.0),
                },
                MetricsRow {
                    state: 1.1,
                    variance: Some(0.02),
                    autocorr,
                    ..MetricsRow::default()
                },
            ),
        ];
        Table::assemble(rows).unwrap()
    }

    #[test]
    fn test_metrics_csv_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("metrics.csv");
        write_metrics_csv(&metrics_table(), &[1], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("realization,variable,time,State variable,Smoothing,Variance"));
        assert!(lines[0].contains("Lag-1 AC"));
        // Warm-up row: variance and lag columns empty.
        assert!(lines[1].starts_with("1,x,0,1,,,"));
        assert!(lines[2].contains("0.02"));
        assert!(lines[2].contains("0.8"));
    }

    #[test]
    fn test_spectra_csv_is_empirical_only() {
        let rows = vec![(
            SpectrumKey {
                realization: 1,
                variable: "x".to_string(),
                time: Ordered(100.0),
                frequency: Ordered(-0.25),
            },
            SpectrumRow {
                empirical: 3.5,
                fit_fold: 9.0,
                fit_hopf: 9.0,
                fit_null: 9.0,
            },
        )];
        let table = Table::assemble(rows).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pspec.csv");
        write_empirical_spectra_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "realization,variable,time,frequency,power");
        assert_eq!(lines[1], "1,x,100,-0.25,3.5");
        assert!(!text.contains('9'));
    }

    #[test]
    fn test_trend_csv_one_row_per_series() {
        let trend = TrendStats {
            stats: vec![
                (
                    "Variance".to_string(),
                    TrendStat {
                        tau: 0.9,
                        p_value: 0.001,
                    },
                ),
                (
                    "Lag-1 AC".to_string(),
                    TrendStat {
                        tau: 0.7,
                        p_value: 0.01,
                    },
                ),
            ],
        };
        let rows = vec![
            (
                SeriesKey {
                    realization: 1,
                    variable: "x".to_string(),
                },
                trend.clone(),
            ),
            (
                SeriesKey {
                    realization: 2,
                    variable: "x".to_string(),
                },
                trend,
            ),
        ];
        let table = Table::assemble(rows).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trend.csv");
        write_trend_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "realization,variable,Variance,Lag-1 AC");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,x,0.9,0.7"));
    }

    #[test]
    fn test_trajectories_csv() {
        let set = RealizationSet::from_trajectories(vec![Trajectory {
            realization: 1,
            variable: "x".to_string(),
            times: vec![0.0, 0.5],
            values: vec![1.0, 1.25],
        }]);

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("traj.csv");
        write_trajectories_csv(&set, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "realization,variable,time,value");
        assert_eq!(lines[1], "1,x,0,1");
        assert_eq!(lines[2], "1,x,0.5,1.25");
    }
}
