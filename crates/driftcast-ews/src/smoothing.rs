//! Gaussian kernel detrending.

/// Smooth `values` with a Gaussian kernel whose standard deviation is
/// `bandwidth * values.len()` samples, reflecting the series at both ends.
///
/// The bandwidth is a fraction of the series length so the same
/// configuration detrends series of different pre-transition lengths
/// comparably.
pub fn gaussian_smooth(values: &[f64], bandwidth: f64) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let sigma = (bandwidth * n as f64).max(1e-9);
    // Kernel support out to four standard deviations.
    let radius = (4.0 * sigma).ceil() as usize;

    let kernel: Vec<f64> = (0..=radius)
        .map(|k| (-0.5 * (k as f64 / sigma).powi(2)).exp())
        .collect();

    let reflect = |i: isize| -> f64 {
        let m = (2 * n - 2).max(1) as isize;
        let mut j = i.rem_euclid(m);
        if j >= n as isize {
            j = m - j;
        }
        values[j as usize]
    };

    (0..n as isize)
        .map(|i| {
            let mut num = kernel[0] * values[i as usize];
            let mut den = kernel[0];
            for (k, &w) in kernel.iter().enumerate().skip(1) {
                num += w * (reflect(i - k as isize) + reflect(i + k as isize));
                den += 2.0 * w;
            }
            num / den
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_unchanged() {
        let values = vec![2.5; 100];
        let smooth = gaussian_smooth(&values, 0.1);
        for v in smooth {
            assert!((v - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smoothing_reduces_wiggle() {
        let values: Vec<f64> = (0..200)
            .map(|i| (i as f64 * 0.05) + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let smooth = gaussian_smooth(&values, 0.02);

        let wiggle = |xs: &[f64]| {
            xs.windows(2)
                .map(|w| (w[1] - w[0]).abs())
                .sum::<f64>()
        };
        assert!(wiggle(&smooth) < 0.2 * wiggle(&values));
    }

    #[test]
    fn test_tracks_slow_trend() {
        let values: Vec<f64> = (0..500).map(|i| i as f64 * 0.01).collect();
        let smooth = gaussian_smooth(&values, 0.02);
        // Interior points of a linear ramp are preserved by a symmetric
        // kernel.
        for i in 100..400 {
            assert!((smooth[i] - values[i]).abs() < 0.05, "at {i}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(gaussian_smooth(&[], 0.1).is_empty());
    }
}
