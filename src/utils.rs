/// Absolute tolerance used whenever bin coordinates are matched against each other
pub(crate) const COORD_TOLERANCE: f64 = 1e-4;

pub(crate) fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= COORD_TOLERANCE
}

/// sorted distinct values
pub(crate) fn unique_sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

/// smallest gap between consecutive distinct values
pub(crate) fn min_gap(values: &[f64]) -> Option<f64> {
    unique_sorted(values)
        .windows(2)
        .map(|w| w[1] - w[0])
        .reduce(f64::min)
}

/// number of whole blocks of `size` bins spanning `start..=end`
pub(crate) fn bins_spanning(start: f64, end: f64, size: f64) -> usize {
    ((end - start) / size).round().max(0.) as usize + 1
}
