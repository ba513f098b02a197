//! Welch power spectra and candidate-model fits.
//!
//! Each rolling-window spectrum is estimated from Hamming-windowed,
//! mean-removed segments and mirrored to a two-sided density. Three
//! candidate forms are then fitted by least squares and compared via Akaike
//! weights:
//!
//! - fold: a Lorentzian centered at zero frequency,
//! - Hopf: a Lorentzian pair centered at ±f0,
//! - null: a flat spectrum.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Two-sided empirical power spectral density, frequencies ascending.
#[derive(Debug, Clone)]
pub struct PowerSpectrum {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    /// Peak height of the density.
    pub fn smax(&self) -> f64 {
        self.power.iter().copied().fold(0.0, f64::max)
    }
}

/// One fitted candidate form evaluated on the empirical frequency axis.
#[derive(Debug, Clone)]
pub struct SpectrumFit {
    pub fitted: Vec<f64>,
    pub sse: f64,
    /// Number of free parameters of the form.
    pub n_params: usize,
}

/// All three candidate fits plus their Akaike weights
/// (fold, Hopf, null order).
#[derive(Debug, Clone)]
pub struct SpectrumFits {
    pub fold: SpectrumFit,
    pub hopf: SpectrumFit,
    pub null: SpectrumFit,
    pub weights: [f64; 3],
}

/// Welch estimate of the power spectral density of `values` sampled at
/// spacing `dt`, using Hamming windows of `ham_length` points advanced by
/// `ham_offset * ham_length` samples. Returns `None` when the series is
/// shorter than one window.
pub fn welch_psd(
    values: &[f64],
    dt: f64,
    ham_length: usize,
    ham_offset: f64,
) -> Option<PowerSpectrum> {
    let n = values.len();
    let len = ham_length;
    if len < 4 || n < len {
        return None;
    }
    let step = ((ham_offset * len as f64).round() as usize).max(1);

    let window: Vec<f64> = (0..len)
        .map(|j| 0.54 - 0.46 * (2.0 * std::f64::consts::PI * j as f64 / (len - 1) as f64).cos())
        .collect();
    let window_norm: f64 = window.iter().map(|w| w * w).sum();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);

    let mut acc = vec![0.0f64; len];
    let mut segments = 0usize;
    let mut start = 0usize;
    while start + len <= n {
        let segment = &values[start..start + len];
        let mean = segment.iter().sum::<f64>() / len as f64;
        let mut buf: Vec<Complex<f64>> = segment
            .iter()
            .zip(&window)
            .map(|(&x, &w)| Complex::new((x - mean) * w, 0.0))
            .collect();
        fft.process(&mut buf);
        for (a, c) in acc.iter_mut().zip(&buf) {
            *a += c.norm_sqr();
        }
        segments += 1;
        start += step;
    }
    if segments == 0 {
        return None;
    }

    // Density scaling, then shift bins into ascending-frequency order.
    let scale = dt / (window_norm * segments as f64);
    let mut pairs: Vec<(f64, f64)> = (0..len)
        .map(|k| {
            let f = if k < len.div_ceil(2) {
                k as f64 / (len as f64 * dt)
            } else {
                (k as f64 - len as f64) / (len as f64 * dt)
            };
            (f, acc[k] * scale)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (frequencies, power): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    Some(PowerSpectrum {
        frequencies,
        power,
    })
}

/// Amplitude minimizing `sum (power - a * shape)^2`, clamped non-negative.
fn linear_amplitude(power: &[f64], shape: &[f64]) -> f64 {
    let num: f64 = power.iter().zip(shape).map(|(p, s)| p * s).sum();
    let den: f64 = shape.iter().map(|s| s * s).sum();
    if den < 1e-300 { 0.0 } else { (num / den).max(0.0) }
}

fn sse(power: &[f64], fitted: &[f64]) -> f64 {
    power
        .iter()
        .zip(fitted)
        .map(|(p, f)| (p - f) * (p - f))
        .sum()
}

fn log_spaced(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
    let (llo, lhi) = (lo.ln(), hi.ln());
    (0..n).map(move |i| (llo + (lhi - llo) * i as f64 / (n - 1) as f64).exp())
}

/// Fit the fold form `a / (f^2 + l^2)` over a log-spaced grid of widths with
/// the amplitude solved in closed form.
fn fit_fold(spectrum: &PowerSpectrum) -> SpectrumFit {
    let f_max = spectrum
        .frequencies
        .iter()
        .fold(0.0f64, |m, f| m.max(f.abs()))
        .max(1e-12);

    let mut best: Option<SpectrumFit> = None;
    for lambda in log_spaced(f_max / 100.0, 2.0 * f_max, 48) {
        let shape: Vec<f64> = spectrum
            .frequencies
            .iter()
            .map(|f| 1.0 / (f * f + lambda * lambda))
            .collect();
        let a = linear_amplitude(&spectrum.power, &shape);
        let fitted: Vec<f64> = shape.iter().map(|s| a * s).collect();
        let err = sse(&spectrum.power, &fitted);
        if best.as_ref().is_none_or(|b| err < b.sse) {
            best = Some(SpectrumFit {
                fitted,
                sse: err,
                n_params: 2,
            });
        }
    }
    best.expect("fold grid is non-empty")
}

/// Fit the Hopf form `a * [L(f - f0) + L(f + f0)]` over a grid of centers
/// and widths.
fn fit_hopf(spectrum: &PowerSpectrum) -> SpectrumFit {
    let f_max = spectrum
        .frequencies
        .iter()
        .fold(0.0f64, |m, f| m.max(f.abs()))
        .max(1e-12);

    let mut best: Option<SpectrumFit> = None;
    for i in 1..=16 {
        let f0 = f_max * i as f64 / 16.0;
        for lambda in log_spaced(f_max / 100.0, f_max, 24) {
            let shape: Vec<f64> = spectrum
                .frequencies
                .iter()
                .map(|f| {
                    1.0 / ((f - f0) * (f - f0) + lambda * lambda)
                        + 1.0 / ((f + f0) * (f + f0) + lambda * lambda)
                })
                .collect();
            let a = linear_amplitude(&spectrum.power, &shape);
            let fitted: Vec<f64> = shape.iter().map(|s| a * s).collect();
            let err = sse(&spectrum.power, &fitted);
            if best.as_ref().is_none_or(|b| err < b.sse) {
                best = Some(SpectrumFit {
                    fitted,
                    sse: err,
                    n_params: 3,
                });
            }
        }
    }
    best.expect("hopf grid is non-empty")
}

/// Fit the flat null form.
fn fit_null(spectrum: &PowerSpectrum) -> SpectrumFit {
    let c = spectrum.power.iter().sum::<f64>() / spectrum.power.len().max(1) as f64;
    let fitted = vec![c; spectrum.power.len()];
    SpectrumFit {
        sse: sse(&spectrum.power, &fitted),
        fitted,
        n_params: 1,
    }
}

fn aic(n: usize, fit: &SpectrumFit) -> f64 {
    let n = n as f64;
    n * (fit.sse.max(1e-300) / n).ln() + 2.0 * fit.n_params as f64
}

/// Fit all three candidate forms and convert their AIC scores to Akaike
/// weights.
pub fn fit_spectrum(spectrum: &PowerSpectrum) -> SpectrumFits {
    let fold = fit_fold(spectrum);
    let hopf = fit_hopf(spectrum);
    let null = fit_null(spectrum);

    let n = spectrum.power.len();
    let scores = [aic(n, &fold), aic(n, &hopf), aic(n, &null)];
    let best = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let rel: Vec<f64> = scores.iter().map(|s| (-(s - best) / 2.0).exp()).collect();
    let total: f64 = rel.iter().sum();
    let weights = [rel[0] / total, rel[1] / total, rel[2] / total];

    SpectrumFits {
        fold,
        hopf,
        null,
        weights,
    }
}
