//! Face-width sampling for camera calibration

use calibration::Calibrator;
use landmarks::{FrameSource, LandmarkError, LandmarkLayout};
use tracing::{debug, info};

/// Feed the face-width span of every frame in `source` to `calibrator`
///
/// Frames without a face, or too short for the layout, are ignored.
pub fn collect_face_widths<S: FrameSource>(
    source: &mut S,
    layout: &LandmarkLayout,
    calibrator: &mut Calibrator,
) -> Result<u64, LandmarkError> {
    let mut frames = 0u64;
    while let Some(frame) = source.next_frame()? {
        frames += 1;
        if !frame.face_detected() {
            continue;
        }
        match layout.face_width_points(&frame) {
            Ok([left, right]) => {
                calibrator.add_sample(geometry::pixel_span(left, right));
            }
            Err(e) => debug!("Frame {} skipped: {}", frame.sequence, e),
        }
    }

    info!(
        "Calibration samples: {} accepted, {} rejected from {} frames",
        calibrator.sample_count(),
        calibrator.rejected_count(),
        frames
    );
    Ok(frames)
}
