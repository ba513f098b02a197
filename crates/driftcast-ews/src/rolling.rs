//! Right-aligned rolling-window statistics.
//!
//! Every function returns one entry per input point; entries stay `None`
//! until the window has filled (and where an estimator's denominator is not
//! defined, e.g. kurtosis on windows shorter than four points). Variance and
//! standard deviation use the sample (n-1) convention; skewness and kurtosis
//! are the bias-corrected sample estimators.

fn window_iter(n: usize, window: usize) -> impl Iterator<Item = Option<(usize, usize)>> {
    (0..n).map(move |i| {
        if window == 0 || i + 1 < window {
            None
        } else {
            Some((i + 1 - window, i + 1))
        }
    })
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sample_var(xs: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 {
        return None;
    }
    let m = mean(xs);
    Some(xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64)
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    window_iter(values.len(), window)
        .map(|span| span.map(|(a, b)| mean(&values[a..b])))
        .collect()
}

pub fn rolling_variance(values: &[f64], window: usize) -> Vec<Option<f64>> {
    window_iter(values.len(), window)
        .map(|span| span.and_then(|(a, b)| sample_var(&values[a..b])))
        .collect()
}

pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_variance(values, window)
        .into_iter()
        .map(|v| v.map(f64::sqrt))
        .collect()
}

/// Rolling coefficient of variation: window std over window mean.
pub fn rolling_coeff_var(values: &[f64], window: usize) -> Vec<Option<f64>> {
    window_iter(values.len(), window)
        .map(|span| {
            span.and_then(|(a, b)| {
                let m = mean(&values[a..b]);
                if m.abs() < 1e-12 {
                    return None;
                }
                sample_var(&values[a..b]).map(|v| v.sqrt() / m)
            })
        })
        .collect()
}

/// Rolling lag-`lag` autocorrelation: Pearson correlation of the window
/// against its lagged self.
pub fn rolling_autocorr(values: &[f64], window: usize, lag: usize) -> Vec<Option<f64>> {
    window_iter(values.len(), window)
        .map(|span| {
            span.and_then(|(a, b)| {
                let xs = &values[a..b];
                if lag == 0 || xs.len() <= lag + 1 {
                    return None;
                }
                pearson(&xs[..xs.len() - lag], &xs[lag..])
            })
        })
        .collect()
}

/// Rolling bias-corrected sample skewness.
pub fn rolling_skewness(values: &[f64], window: usize) -> Vec<Option<f64>> {
    window_iter(values.len(), window)
        .map(|span| {
            span.and_then(|(a, b)| {
                let xs = &values[a..b];
                let n = xs.len() as f64;
                if xs.len() < 3 {
                    return None;
                }
                let m = mean(xs);
                let m2 = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n;
                let m3 = xs.iter().map(|x| (x - m).powi(3)).sum::<f64>() / n;
                if m2 < 1e-24 {
                    return None;
                }
                let g1 = m3 / m2.powf(1.5);
                Some(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
            })
        })
        .collect()
}

/// Rolling bias-corrected excess kurtosis.
pub fn rolling_kurtosis(values: &[f64], window: usize) -> Vec<Option<f64>> {
    window_iter(values.len(), window)
        .map(|span| {
            span.and_then(|(a, b)| {
                let xs = &values[a..b];
                let n = xs.len() as f64;
                if xs.len() < 4 {
                    return None;
                }
                let m = mean(xs);
                let s2 = sample_var(xs)?;
                if s2 < 1e-24 {
                    return None;
                }
                let m4 = xs.iter().map(|x| (x - m).powi(4)).sum::<f64>();
                let a4 = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
                let b4 = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
                Some(a4 * m4 / (s2 * s2) - b4)
            })
        })
        .collect()
}

/// Pearson correlation of two equal-length slices.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len();
    if n < 2 || n != b.len() {
        return None;
    }
    let ma = mean(a);
    let mb = mean(b);
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for i in 0..n {
        let da = a[i] - ma;
        let db = b[i] - mb;
        cov += da * db;
        va += da * da;
        vb += db * db;
    }
    let denom = (va * vb).sqrt();
    if denom < 1e-24 { None } else { Some(cov / denom) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_prefix_is_none() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let out = rolling_mean(&xs, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[4], Some(4.0));
    }

    #[test]
    fn test_rolling_variance_sample_convention() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let out = rolling_variance(&xs, 3);
        // var([1,2,3]) with ddof=1 is 1.0
        assert!((out[2].unwrap() - 1.0).abs() < 1e-12);
        assert!((out[3].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_autocorr_of_alternating_series() {
        let xs: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let ac1 = rolling_autocorr(&xs, 20, 1);
        let ac2 = rolling_autocorr(&xs, 20, 2);
        assert!(ac1[39].unwrap() < -0.9);
        assert!(ac2[39].unwrap() > 0.9);
    }

    #[test]
    fn test_rolling_skewness_sign() {
        // Mostly small values with a large positive outlier: right-skewed.
        let mut xs = vec![0.0, 0.1, -0.1, 0.05, -0.05, 0.02, -0.02, 0.08];
        xs.push(5.0);
        let out = rolling_skewness(&xs, xs.len());
        assert!(out.last().unwrap().unwrap() > 1.0);
    }

    #[test]
    fn test_rolling_kurtosis_of_uniformish_data() {
        // A flat two-point distribution has minimal tails: negative excess
        // kurtosis.
        let xs: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let out = rolling_kurtosis(&xs, 50);
        assert!(out.last().unwrap().unwrap() < -1.5);
    }

    #[test]
    fn test_coeff_var_matches_std_over_mean() {
        let xs = vec![10.0, 12.0, 8.0, 11.0, 9.0];
        let cv = rolling_coeff_var(&xs, 5).pop().unwrap().unwrap();
        let sd = rolling_std(&xs, 5).pop().unwrap().unwrap();
        assert!((cv - sd / 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        let c = vec![3.0, 2.0, 1.0];
        assert!((pearson(&a, &c).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_window_degenerate_estimators() {
        let xs = vec![1.0; 10];
        assert_eq!(rolling_coeff_var(&xs, 5)[9], Some(0.0));
        assert!(rolling_autocorr(&xs, 5, 1)[9].is_none());
        assert!(rolling_skewness(&xs, 5)[9].is_none());
        assert!(rolling_kurtosis(&xs, 5)[9].is_none());
    }
}
