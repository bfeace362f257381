use super::extrema::find_extrema;
use super::model::ChannelKind;
use crate::error::{ProcessError, ProcessResult};

/// Window used for head-rotation channels regardless of caller parameters.
pub const POSE_WINDOW: usize = 11;
/// Polynomial order used for head-rotation channels.
pub const POSE_POLYORDER: usize = 5;

/// Gaussian kernel radius in standard deviations.
const GAUSSIAN_TRUNCATE: f64 = 4.0;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Reject window/order pairs the polynomial stage cannot use.
pub fn validate_window(window_size: usize, polyorder: usize) -> ProcessResult<()> {
    if window_size == 0 || window_size % 2 == 0 {
        return Err(ProcessError::invalid_parameters(format!(
            "window size must be a positive odd number, got {window_size}"
        )));
    }
    if polyorder >= window_size {
        return Err(ProcessError::invalid_parameters(format!(
            "polyorder ({polyorder}) must be less than window size ({window_size})"
        )));
    }
    Ok(())
}

/// The (window, polyorder) pair actually applied to a channel of `kind`.
pub fn effective_window(kind: ChannelKind, window_size: usize, polyorder: usize) -> (usize, usize) {
    match kind {
        ChannelKind::Pose => (POSE_WINDOW, POSE_POLYORDER),
        _ => (window_size, polyorder),
    }
}

// ---------------------------------------------------------------------------
// SmoothingFilter – Savitzky-Golay stage followed by a Gaussian blur
// ---------------------------------------------------------------------------

/// Output of [`SmoothingFilter::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Smoothed {
    pub values: Vec<f64>,
    pub maxima: Vec<usize>,
    pub minima: Vec<usize>,
}

/// Two-stage smoother with all weights precomputed, so one instance can be
/// applied to many channels.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    window_size: usize,
    polyorder: usize,
    /// Centred weights for interior samples.
    interior: Vec<f64>,
    /// Weights over the first window for samples `0..half`.
    leading: Vec<Vec<f64>>,
    /// Weights over the last window for the final `half` samples.
    trailing: Vec<Vec<f64>>,
    /// Normalised Gaussian kernel, `sigma = window_size`.
    kernel: Vec<f64>,
}

impl SmoothingFilter {
    pub fn new(window_size: usize, polyorder: usize) -> ProcessResult<Self> {
        validate_window(window_size, polyorder)?;

        let half = window_size / 2;
        let basis = polynomial_basis(window_size, polyorder);
        let interior = projection_row(&basis, half);
        let leading = (0..half).map(|row| projection_row(&basis, row)).collect();
        let trailing = (half + 1..window_size)
            .map(|row| projection_row(&basis, row))
            .collect();

        Ok(Self {
            window_size,
            polyorder,
            interior,
            leading,
            trailing,
            kernel: gaussian_kernel(window_size as f64),
        })
    }

    /// The filter applied to channels of `kind` under caller parameters
    /// `(window_size, polyorder)`.
    pub fn for_channel(kind: ChannelKind, window_size: usize, polyorder: usize) -> ProcessResult<Self> {
        let (w, p) = effective_window(kind, window_size, polyorder);
        Self::new(w, p)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    /// Fewest samples this filter accepts.
    pub fn min_samples(&self) -> usize {
        self.window_size
    }

    /// Smooth `raw` and locate the extrema of the result.
    pub fn apply(&self, raw: &[f64]) -> ProcessResult<Smoothed> {
        let stage_one = self.polynomial_stage(raw)?;
        let values = convolve_reflect(&stage_one, &self.kernel);
        let (maxima, minima) = find_extrema(&values);
        Ok(Smoothed {
            values,
            maxima,
            minima,
        })
    }

    /// Local least-squares polynomial smoothing. Interior samples use the
    /// centred fit; the first and last `half` samples evaluate the fit over
    /// the first and last full window.
    pub fn polynomial_stage(&self, raw: &[f64]) -> ProcessResult<Vec<f64>> {
        let n = raw.len();
        if n < self.window_size {
            return Err(ProcessError::InsufficientSamples {
                required: self.window_size,
                available: n,
            });
        }

        let mut out = Vec::with_capacity(n);

        let head = &raw[..self.window_size];
        out.extend(self.leading.iter().map(|w| dot(w, head)));

        out.extend(raw.windows(self.window_size).map(|window| dot(&self.interior, window)));

        let tail = &raw[n - self.window_size..];
        out.extend(self.trailing.iter().map(|w| dot(w, tail)));

        debug_assert_eq!(out.len(), n);
        Ok(out)
    }
}

/// Smooth one raw series with the given window and polynomial order.
pub fn smooth(raw: &[f64], window_size: usize, polyorder: usize) -> ProcessResult<Smoothed> {
    SmoothingFilter::new(window_size, polyorder)?.apply(raw)
}

/// Savitzky-Golay stage on its own.
pub fn savgol(raw: &[f64], window_size: usize, polyorder: usize) -> ProcessResult<Vec<f64>> {
    SmoothingFilter::new(window_size, polyorder)?.polynomial_stage(raw)
}

/// Gaussian stage on its own.
pub fn gaussian_blur(signal: &[f64], sigma: f64) -> Vec<f64> {
    convolve_reflect(signal, &gaussian_kernel(sigma))
}

// ---------------------------------------------------------------------------
// Least-squares polynomial weights
// ---------------------------------------------------------------------------

/// Orthonormal basis, sampled at the window positions, of the polynomials of
/// degree `<= polyorder` over `window_size` equally spaced points.
///
/// Arnoldi iteration: each column is the previous one times the abscissa,
/// orthogonalised twice against every earlier column. The columns stay
/// orthonormal to rounding error for any `polyorder < window_size`.
fn polynomial_basis(window_size: usize, polyorder: usize) -> Vec<Vec<f64>> {
    let half = (window_size / 2) as f64;
    let scale = if half > 0.0 { half } else { 1.0 };
    let xs: Vec<f64> = (0..window_size).map(|j| (j as f64 - half) / scale).collect();

    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(polyorder + 1);
    basis.push(vec![1.0 / (window_size as f64).sqrt(); window_size]);
    for k in 0..polyorder {
        let mut column: Vec<f64> = xs.iter().zip(&basis[k]).map(|(x, q)| x * q).collect();
        for _ in 0..2 {
            for q in &basis {
                let proj = dot(q, &column);
                for (c, qj) in column.iter_mut().zip(q) {
                    *c -= proj * qj;
                }
            }
        }
        // Non-zero: a degree below window_size cannot vanish on every point.
        let norm = dot(&column, &column).sqrt();
        for c in &mut column {
            *c /= norm;
        }
        basis.push(column);
    }
    basis
}

/// Weights `c` such that `sum(c[j] * y[j])` is the least-squares polynomial
/// through the window evaluated at position `row`, i.e. row `row` of the
/// projection `Q Q^T`.
fn projection_row(basis: &[Vec<f64>], row: usize) -> Vec<f64> {
    let len = basis.first().map_or(0, Vec::len);
    (0..len)
        .map(|j| basis.iter().map(|q| q[j] * q[row]).sum())
        .collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// ---------------------------------------------------------------------------
// Gaussian blur
// ---------------------------------------------------------------------------

/// Normalised Gaussian weights over `[-r, r]`, `r = round(4 * sigma)`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Centred correlation; samples past either end are mirrored
/// (`d c b a | a b c d | d c b a`).
fn convolve_reflect(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = (kernel.len() / 2) as isize;
    (0..n as isize)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * signal[reflect_index(i + k as isize - radius, n)])
                .sum()
        })
        .collect()
}

fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let m = i.rem_euclid(2 * n);
    if m < n {
        m as usize
    } else {
        (2 * n - 1 - m) as usize
    }
}
