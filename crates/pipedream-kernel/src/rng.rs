//! Uniform sampling helpers on top of `fastrand`.
//!
//! Ranges are half-open like the rest of the kernel: `[min, max)`. A
//! degenerate range (`max <= min`) yields `min`.

use std::f32::consts::TAU;

/// Uniform `f32` in `[min, max)`.
#[must_use]
pub fn uniform(min: f32, max: f32) -> f32 {
    min + fastrand::f32() * (max - min)
}

/// Uniform `u32` in `[min, max)`.
#[must_use]
pub fn uniform_u32(min: u32, max: u32) -> u32 {
    if max > min {
        fastrand::u32(min..max)
    } else {
        min
    }
}

/// Uniform `i32` in `[min, max)`.
#[must_use]
pub fn uniform_i32(min: i32, max: i32) -> i32 {
    if max > min {
        fastrand::i32(min..max)
    } else {
        min
    }
}

/// Uniform `u8` in `[min, max)`.
#[must_use]
pub fn uniform_u8(min: u8, max: u8) -> u8 {
    if max > min {
        fastrand::u8(min..max)
    } else {
        min
    }
}

/// Uniform `f32` in `(0, max]`, never zero for a positive `max`.
#[must_use]
pub fn uniform_positive(max: f32) -> f32 {
    (1.0 - fastrand::f32()) * max
}

/// Uniform `u8` in `[min, 255]`.
#[must_use]
pub fn uniform_u8_from(min: u8) -> u8 {
    fastrand::u8(min..=u8::MAX)
}

/// Uniform angle in `[0, 2π)`.
#[must_use]
pub fn angle() -> f32 {
    fastrand::f32() * TAU
}

/// Bernoulli trial.
#[must_use]
pub fn chance(probability: f32) -> bool {
    probability >= 1.0 || fastrand::f32() < probability
}
