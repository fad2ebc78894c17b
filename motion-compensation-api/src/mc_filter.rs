// Strength limits, strictly inside (0, 1)
pub const MIN_STRENGTH: f32 = 0.0001;
pub const MAX_STRENGTH: f32 = 0.9999;

/// The MCFilter trait is the capability set of every smoothing filter
/// applied to tracked poses.
pub trait MCFilter<T> {
    /// Smooths `value`, updating the internal state.
    fn filter(&mut self, value: T) -> T;

    /// Seeds every stage with `value`, the next `filter(value)` returns `value`.
    fn reset(&mut self, value: T);

    /// Applies a new strength, clamped into (0, 1). Returns the applied value.
    fn set_strength(&mut self, strength: f32) -> f32;

    fn strength(&self) -> f32;

    /// Number of cascaded smoothing stages.
    fn order(&self) -> usize;
}

/// Clamps `strength` into the open interval (0, 1).
/// Values already inside the interval are returned unchanged.
pub fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() || strength <= 0.0 {
        MIN_STRENGTH
    } else if strength >= 1.0 {
        MAX_STRENGTH
    } else {
        strength
    }
}

/// Strength after one user-initiated adjustment.
/// The step `(1.1 - current) * 0.05` gets finer toward the upper limit.
pub fn strength_step(current: f32, increase: bool) -> f32 {
    let amount = (1.1 - current) * 0.05;
    if increase {
        current + amount
    } else {
        current - amount
    }
}
