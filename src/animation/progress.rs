/// Linear interpolation between two values.
pub trait Lerp: Sized {
    /// Value at `t` between `a` (`t = 0`) and `b` (`t = 1`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Normalized progress of a run that has been going for `elapsed_ms`.
///
/// Clamped to `[0, 1]`; a zero duration is complete immediately.
pub fn linear_progress(elapsed_ms: f64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/progress.rs"]
mod tests;
