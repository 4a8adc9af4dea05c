//! Quintic smoothstep easing
//!
//! Scan and rapid moves shape their step emission with the quintic
//! smoothstep s(u) = 6u⁵ − 15u⁴ + 10u³ over normalized time u ∈ [0, 1].
//! Its endpoints carry zero velocity *and* zero acceleration, which is what
//! keeps the camera image stable immediately after arrival.

/// Quintic smoothstep: s(0) = 0, s(1) = 1, monotonic, s'(0) = s'(1) = 0,
/// s''(0) = s''(1) = 0
pub fn smoothstep5(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    u * u * u * (u * (u * 6.0 - 15.0) + 10.0)
}

/// Cumulative step target for iteration `i` of `m` over `total_steps`
///
/// Rounds the eased fraction onto the step grid. Because s(1) = 1 exactly,
/// iteration `m` always lands on `total_steps` - a complete move emits the
/// exact rounded step distance, no overshoot or undershoot.
///
/// Evaluated in f64: at f32 precision the polynomial's rounding error can
/// exceed half a step on long moves, letting a later target round below an
/// earlier one. f64 keeps the error orders of magnitude under the rounding
/// threshold for any step count an axis can hold, so the targets stay
/// monotone.
pub fn eased_step_target(total_steps: u32, i: u32, m: u32) -> u32 {
    if m == 0 || i >= m {
        return total_steps;
    }
    let u = f64::from(i) / f64::from(m);
    let s = u * u * u * (u * (u * 6.0 - 15.0) + 10.0);
    let target = libm::round(s * f64::from(total_steps));
    (target as u32).min(total_steps)
}
