//! Pinhole-camera distance estimation
//!
//! distance = known_width * focal_length / pixel_width

use landmarks::Point;

use crate::Reading;

/// Pixel span between two face-width anchors
pub fn pixel_span(a: Point, b: Point) -> f64 {
    a.distance(&b)
}

/// Camera-to-face distance in centimeters
///
/// Returns an unreliable zero when `pixel_width <= 0` or any input is not
/// a positive finite number.
pub fn distance_cm(focal_length: f64, known_width_cm: f64, pixel_width: f64) -> Reading {
    if !positive(pixel_width) || !positive(focal_length) || !positive(known_width_cm) {
        return Reading::unreliable();
    }

    Reading::valid(known_width_cm * focal_length / pixel_width)
}

/// Focal length (pixels) from a face of known width at a known distance
pub fn focal_length(known_distance_cm: f64, known_width_cm: f64, pixel_width: f64) -> Reading {
    if !positive(known_distance_cm) || !positive(known_width_cm) || !positive(pixel_width) {
        return Reading::unreliable();
    }

    Reading::valid(pixel_width * known_distance_cm / known_width_cm)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
