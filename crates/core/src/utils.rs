//! Geometry helpers shared across the pipeline.
//!
//! Word coordinates arrive in extraction space (origin top-left, Y grows
//! downward). Annotation rectangles are emitted in drawing space (origin
//! bottom-left, Y grows upward). `flip_y` is the single transform between
//! the two.

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Converts a Y coordinate between extraction space (top-left origin) and
/// drawing space (bottom-left origin). The transform is its own inverse.
#[inline]
pub fn flip_y(y: f64, page_height: f64) -> f64 {
    page_height - y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_y_is_an_involution() {
        for &h in &[612.0, 792.0, 841.89] {
            for &y in &[0.0, 13.25, 400.0, h] {
                assert!(approx_eq(flip_y(flip_y(y, h), h), y, EPSILON));
            }
        }
    }
}
