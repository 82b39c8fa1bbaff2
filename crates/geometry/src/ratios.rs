//! Aspect ratio formulas

use landmarks::Point;

use crate::Reading;

/// Spans at or below this are treated as degenerate
const MIN_SPAN_PX: f64 = f64::EPSILON;

/// Eye Aspect Ratio
///
/// EAR = (|p1-p5| + |p2-p4|) / (2 * |p0-p3|)
///
/// Roughly 0.3 for an open eye, approaching 0 when closed. A zero horizontal
/// span yields an unreliable zero.
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> Reading {
    let a = eye[1].distance(&eye[5]);
    let b = eye[2].distance(&eye[4]);
    let c = eye[0].distance(&eye[3]);

    if !(c > MIN_SPAN_PX) || !a.is_finite() || !b.is_finite() {
        return Reading::unreliable();
    }

    Reading::valid((a + b) / (2.0 * c))
}

/// Average EAR of both eyes; unreliable if either eye is
pub fn mean_eye_aspect_ratio(left: &[Point; 6], right: &[Point; 6]) -> Reading {
    let left = eye_aspect_ratio(left);
    let right = eye_aspect_ratio(right);

    match (left.get(), right.get()) {
        (Some(l), Some(r)) => Reading::valid((l + r) / 2.0),
        _ => Reading::unreliable(),
    }
}

/// Mouth Aspect Ratio: vertical lip separation over mouth width
pub fn mouth_aspect_ratio(top: Point, bottom: Point, left: Point, right: Point) -> Reading {
    let vertical = top.distance(&bottom);
    let horizontal = left.distance(&right);

    if !(horizontal > MIN_SPAN_PX) || !vertical.is_finite() {
        return Reading::unreliable();
    }

    Reading::valid(vertical / horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Eye with lid separation `a`/`b` and horizontal span `c`
    fn synthetic_eye(a: f64, b: f64, c: f64) -> [Point; 6] {
        let x1 = c / 3.0;
        let x2 = 2.0 * c / 3.0;
        [
            Point::new(0.0, 0.0),
            Point::new(x1, a / 2.0),
            Point::new(x2, b / 2.0),
            Point::new(c, 0.0),
            Point::new(x2, -b / 2.0),
            Point::new(x1, -a / 2.0),
        ]
    }

    #[test]
    fn test_open_eye() {
        let ear = eye_aspect_ratio(&synthetic_eye(10.0, 10.0, 30.0));
        assert!(ear.reliable);
        assert!((ear.value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_span_fails_closed() {
        let ear = eye_aspect_ratio(&synthetic_eye(10.0, 10.0, 0.0));
        assert_eq!(ear, Reading::unreliable());
        assert_eq!(ear.value, 0.0);
    }

    #[test]
    fn test_closed_eye_is_reliable_zero() {
        let ear = eye_aspect_ratio(&synthetic_eye(0.0, 0.0, 30.0));
        assert!(ear.reliable);
        assert_eq!(ear.value, 0.0);
    }

    #[test]
    fn test_mean_ear_needs_both_eyes() {
        let good = synthetic_eye(10.0, 10.0, 30.0);
        let bad = synthetic_eye(10.0, 10.0, 0.0);
        assert!(mean_eye_aspect_ratio(&good, &good).reliable);
        assert!(!mean_eye_aspect_ratio(&good, &bad).reliable);
    }

    #[test]
    fn test_mouth_ratio() {
        let mar = mouth_aspect_ratio(
            Point::new(50.0, 40.0),
            Point::new(50.0, 75.0),
            Point::new(25.0, 57.0),
            Point::new(75.0, 57.0),
        );
        assert!((mar.value - 0.7).abs() < 1e-12);

        let degenerate = mouth_aspect_ratio(
            Point::new(50.0, 40.0),
            Point::new(50.0, 75.0),
            Point::new(50.0, 57.0),
            Point::new(50.0, 57.0),
        );
        assert!(!degenerate.reliable);
    }

    proptest! {
        #[test]
        fn prop_ear_matches_closed_form(a in 0.0f64..50.0, b in 0.0f64..50.0, c in 0.5f64..200.0) {
            let ear = eye_aspect_ratio(&synthetic_eye(a, b, c));
            prop_assert!(ear.reliable);
            prop_assert!((ear.value - (a + b) / (2.0 * c)).abs() < 1e-9);
        }

        #[test]
        fn prop_small_span_never_panics(c in 0.0f64..1e-6) {
            let ear = eye_aspect_ratio(&synthetic_eye(5.0, 5.0, c));
            prop_assert!(ear.value.is_finite());
        }
    }
}
