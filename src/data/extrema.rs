/// Peaks and troughs of a smoothed series.
///
/// An index `i` is a maximum when the sign of the slope drops between
/// `[i-1, i]` and `[i, i+1]`, and a minimum when it rises. Endpoints can never
/// qualify. Where the sign does not change (including a flat second
/// difference) nothing is reported. Both lists come back strictly increasing.
pub fn find_extrema(values: &[f64]) -> (Vec<usize>, Vec<usize>) {
    let mut maxima = Vec::new();
    let mut minima = Vec::new();
    if values.len() < 3 {
        return (maxima, minima);
    }

    let signs: Vec<f64> = values.windows(2).map(|w| slope_sign(w[1] - w[0])).collect();

    for (i, pair) in signs.windows(2).enumerate() {
        let change = pair[1] - pair[0];
        // NaN compares false on both sides.
        if change < 0.0 {
            maxima.push(i + 1);
        } else if change > 0.0 {
            minima.push(i + 1);
        }
    }

    (maxima, minima)
}

/// -1, 0 or 1; NaN stays NaN.
fn slope_sign(d: f64) -> f64 {
    if d > 0.0 {
        1.0
    } else if d < 0.0 {
        -1.0
    } else if d == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}
