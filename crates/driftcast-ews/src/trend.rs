//! Kendall rank correlation against time.

use statrs::distribution::{ContinuousCDF, Normal};

/// Kendall tau-b of `y` against `x`, with tie correction, plus the two-sided
/// p-value of its large-sample normal approximation.
///
/// Returns `None` for fewer than two points or when either ranking is
/// entirely tied.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[j] - x[i];
            let dy = y[j] - y[i];
            if dx == 0.0 && dy == 0.0 {
                continue;
            } else if dx == 0.0 {
                ties_x += 1;
            } else if dy == 0.0 {
                ties_y += 1;
            } else if (dx > 0.0) == (dy > 0.0) {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let total = (n * (n - 1) / 2) as i64;
    let denom = (((total - ties_x) as f64) * ((total - ties_y) as f64)).sqrt();
    if denom == 0.0 {
        return None;
    }
    let tau = (concordant - discordant) as f64 / denom;

    // Normal approximation to the null distribution of tau.
    let nf = n as f64;
    let sigma = (2.0 * (2.0 * nf + 5.0) / (9.0 * nf * (nf - 1.0))).sqrt();
    let z = tau / sigma;
    let normal = Normal::new(0.0, 1.0).expect("unit normal");
    let p = 2.0 * (1.0 - normal.cdf(z.abs()));

    Some((tau, p.clamp(0.0, 1.0)))
}

/// Kendall tau of a metric series (with warm-up gaps) against its time axis.
pub fn trend_against_time(times: &[f64], series: &[Option<f64>]) -> Option<(f64, f64)> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = times
        .iter()
        .zip(series)
        .filter_map(|(&t, v)| v.map(|v| (t, v)))
        .unzip();
    kendall_tau(&xs, &ys)
}
