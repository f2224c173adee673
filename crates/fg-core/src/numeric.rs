use crate::{FgError, FgResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Guard for divisions by quantities that may collapse to zero
/// (free delivery at zero speed, delivered airflow of an idle fan).
pub const EPSILON: Real = 1e-9;

pub fn ensure_finite(v: Real, what: &'static str) -> FgResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FgError::NonFinite { what, value: v })
    }
}

/// Median of a slice. Even lengths average the two middle values.
///
/// Returns `None` for an empty slice.
pub fn median(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// `count` evenly spaced samples over `[start, end]`, both ends included.
///
/// Mirrors the usual `linspace` contract: a single sample is `start`,
/// zero samples is empty.
pub fn linspace(start: Real, end: Real, count: usize) -> Vec<Real> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as Real;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        }
    }
}
