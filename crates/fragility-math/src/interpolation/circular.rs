//! Interpolation of compass bearings.

/// Maps a bearing in degrees onto `[0, 360)`.
#[must_use]
pub fn normalize_bearing(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Interpolates between two bearings along the shorter arc.
///
/// `fraction` outside [0, 1] extrapolates along the same arc. The result is
/// normalized onto `[0, 360)`.
///
/// ```rust
/// use fragility_math::interpolation::circular_lerp;
///
/// assert!((circular_lerp(350.0, 10.0, 0.5) - 0.0).abs() < 1e-12);
/// assert!((circular_lerp(10.0, 350.0, 0.25) - 5.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn circular_lerp(from: f64, to: f64, fraction: f64) -> f64 {
    let delta = (to - from + 180.0).rem_euclid(360.0) - 180.0;
    normalize_bearing(from + fraction * delta)
}
