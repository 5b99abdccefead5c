use super::{HeadingPitchRoll, Mat3, Mat4, Vec3, east_north_up_to_fixed_frame};

/// Placement matrix for a volume anchored at a world-space point.
///
/// `ENU(anchor) * RT(hpr, offset)`: the offset is expressed in the anchor's local
/// east/north/up frame and the rotation is applied around the offset point.
pub fn placement_matrix(anchor: Vec3, hpr: HeadingPitchRoll, offset: Vec3) -> Mat4 {
    let frame = east_north_up_to_fixed_frame(anchor);
    let local = Mat4::from_rotation_translation(Mat3::from_heading_pitch_roll(hpr), offset);
    frame.multiply(&local)
}
