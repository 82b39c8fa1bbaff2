//! Landmark index layouts
//!
//! Eye indices follow the canonical EAR order: `p0`/`p3` are the horizontal
//! corners, `p1`/`p2` the upper lid and `p4`/`p5` the lower lid, so that
//! `p1`-`p5` and `p2`-`p4` form the two vertical pairs.

use serde::{Deserialize, Serialize};

use crate::{LandmarkError, LandmarkFrame, Point};

/// Built-in detector layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// 468-point face mesh
    #[default]
    FaceMesh,
    /// 68-point shape predictor
    Dlib68,
}

/// Indices into a landmark frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkLayout {
    /// Left eye contour (canonical EAR order)
    pub left_eye: [usize; 6],

    /// Right eye contour (canonical EAR order)
    pub right_eye: [usize; 6],

    /// Mouth: top lip, bottom lip, left corner, right corner
    pub mouth: [usize; 4],

    /// Two anchors spanning the face width
    pub face_width: [usize; 2],
}

impl LandmarkLayout {
    /// 468-point face mesh layout
    pub fn face_mesh() -> Self {
        Self {
            left_eye: [362, 385, 387, 263, 373, 380],
            right_eye: [33, 160, 158, 133, 153, 144],
            mouth: [13, 14, 61, 291],
            face_width: [234, 454],
        }
    }

    /// 68-point shape predictor layout
    pub fn dlib68() -> Self {
        Self {
            left_eye: [42, 43, 44, 45, 46, 47],
            right_eye: [36, 37, 38, 39, 40, 41],
            mouth: [62, 66, 60, 64],
            face_width: [2, 14],
        }
    }

    pub fn for_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::FaceMesh => Self::face_mesh(),
            LayoutKind::Dlib68 => Self::dlib68(),
        }
    }

    /// Minimum number of points a frame must carry for this layout
    pub fn required_points(&self) -> usize {
        self.left_eye
            .iter()
            .chain(&self.right_eye)
            .chain(&self.mouth)
            .chain(&self.face_width)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Select the face-width anchors only
    pub fn face_width_points(&self, frame: &LandmarkFrame) -> Result<[Point; 2], LandmarkError> {
        select(frame, &self.face_width)
    }

    /// Select every landmark group used by the monitor
    pub fn extract(&self, frame: &LandmarkFrame) -> Result<FaceLandmarks, LandmarkError> {
        Ok(FaceLandmarks {
            left_eye: select(frame, &self.left_eye)?,
            right_eye: select(frame, &self.right_eye)?,
            mouth: select(frame, &self.mouth)?,
            face_width: select(frame, &self.face_width)?,
        })
    }
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::face_mesh()
    }
}

/// Landmark groups selected from one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLandmarks {
    pub left_eye: [Point; 6],
    pub right_eye: [Point; 6],
    /// Top, bottom, left, right
    pub mouth: [Point; 4],
    pub face_width: [Point; 2],
}

fn select<const N: usize>(
    frame: &LandmarkFrame,
    indices: &[usize; N],
) -> Result<[Point; N], LandmarkError> {
    let mut points = [Point::default(); N];
    for (slot, &index) in points.iter_mut().zip(indices) {
        *slot = frame.get(index).ok_or(LandmarkError::IndexOutOfRange {
            index,
            len: frame.len(),
        })?;
    }
    Ok(points)
}
