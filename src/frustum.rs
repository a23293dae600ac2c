//! Frustum-to-camera conversion for projector regions.
//!
//! The conversion is a fixed recipe: the four frustum half-angles become a
//! physical lens (aperture, aperture offset, focal length), the region's
//! coordinate frame becomes a world-space translation, and yaw/pitch/roll
//! become three sequential rotation ops. Order of operations and the
//! constants below are load-bearing; outputs feed float-typed scene
//! attributes directly.

use crate::math::{Mat3, Vec3};

/// Fixed lens focal length, in the same physical units as the apertures.
pub const FOCAL_LENGTH: f32 = 10.0;

/// Fixed lens focus distance.
pub const FOCUS_DISTANCE: f32 = 2000.0;

/// Fixed exposure of the projector rect light.
pub const LIGHT_EXPOSURE: f32 = 5.0;

/// Fixed intensity of the projector rect light.
pub const LIGHT_INTENSITY: f32 = 15_000.0;

/// Scale factor from source units to scene units. The position pipeline
/// applies it twice (before and after the orientation matrix), for a net
/// 100× conversion.
pub const UNIT_SCALE: f32 = 10.0;

const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

/// Per-region frustum description, in degrees, exactly as read from the
/// file. The yaw sign flip happens inside [`compute_camera`].
///
/// `left_angle`/`down_angle` are expected to differ from their opposite
/// half-angles; equal tangents make the lens shift division degenerate
/// (see [`RegionFrustum::degenerate_axes`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFrustum {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub right_angle: f32,
    pub left_angle: f32,
    pub up_angle: f32,
    pub down_angle: f32,
}

impl RegionFrustum {
    /// Reports per axis whether the lens-shift denominator collapses to
    /// zero: `(horizontal, vertical)`.
    #[must_use]
    pub fn degenerate_axes(&self) -> (bool, bool) {
        let tangents = FrustumTangents::from(self);
        (
            tangents.left - tangents.right == 0.0,
            tangents.up - tangents.down == 0.0,
        )
    }
}

/// Region position and orientation in source space. The three vectors are
/// the rows of the source-to-standard orientation matrix; they are assumed
/// orthonormal and not verified here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    pub position: Vec3,
    pub yaw: Vec3,
    pub pitch: Vec3,
    pub roll: Vec3,
}

/// Physical lens parameters of the derived camera, all in the units of
/// [`FOCAL_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParameters {
    pub focal_length: f32,
    pub focus_distance: f32,
    pub horizontal_aperture: f32,
    pub horizontal_aperture_offset: f32,
    pub vertical_aperture: f32,
    pub vertical_aperture_offset: f32,
}

/// Derived projector light dimensions and fixed emission values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParameters {
    pub width: f32,
    pub height: f32,
    pub exposure: f32,
    pub intensity: f32,
    pub is_projector: bool,
}

/// World transform of the region camera: one translation plus three
/// rotation ops applied in the order Y, X, Z. The rotations stay separate
/// named ops and are never composed into a single matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTransform {
    pub translate: Vec3,
    pub rotate_y: f32,
    pub rotate_x: f32,
    pub rotate_z: f32,
}

struct FrustumTangents {
    right: f32,
    left: f32,
    up: f32,
    down: f32,
}

impl From<&RegionFrustum> for FrustumTangents {
    fn from(frustum: &RegionFrustum) -> Self {
        Self {
            right: (frustum.right_angle * DEG_TO_RAD).tan(),
            left: (frustum.left_angle * DEG_TO_RAD).tan(),
            up: (frustum.up_angle * DEG_TO_RAD).tan(),
            down: (frustum.down_angle * DEG_TO_RAD).tan(),
        }
    }
}

/// Derives camera, light and transform parameters for one region.
///
/// Deterministic and side-effect free; identical inputs produce identical
/// outputs. A degenerate frustum (equal opposite tangents) divides by zero
/// here and propagates the IEEE result — callers that want a diagnostic
/// check [`RegionFrustum::degenerate_axes`] first.
#[must_use]
pub fn compute_camera(
    frustum: &RegionFrustum,
    frame: &CoordinateFrame,
) -> (CameraParameters, LightParameters, RegionTransform) {
    let tangents = FrustumTangents::from(frustum);

    let aperture_h = (tangents.right.abs() + tangents.left.abs()) * FOCAL_LENGTH;
    let aperture_v = (tangents.up.abs() + tangents.down.abs()) * FOCAL_LENGTH;
    let light_width = tangents.right.abs() + tangents.left.abs();
    let light_height = tangents.up.abs() + tangents.down.abs();

    let lens_shift_h = (tangents.left + tangents.right) / (tangents.left - tangents.right);
    let lens_shift_v = (tangents.up + tangents.down) / (tangents.up - tangents.down);

    let camera = CameraParameters {
        focal_length: FOCAL_LENGTH,
        focus_distance: FOCUS_DISTANCE,
        horizontal_aperture: aperture_h,
        horizontal_aperture_offset: lens_shift_h * aperture_h / 2.0,
        vertical_aperture: aperture_v,
        vertical_aperture_offset: lens_shift_v * aperture_v / 2.0,
    };

    let light = LightParameters {
        width: light_width,
        height: light_height,
        exposure: LIGHT_EXPOSURE,
        intensity: LIGHT_INTENSITY,
        is_projector: true,
    };

    let transform = RegionTransform {
        translate: source_to_world(frame),
        rotate_y: -frustum.yaw,
        rotate_x: frustum.pitch,
        rotate_z: frustum.roll,
    };

    (camera, light, transform)
}

/// Converts a region's source-space position to the world-space translate
/// value.
///
/// The source-to-standard matrix is built from the frame's pitch, yaw and
/// roll rows — in that row order. The position is scaled by [`UNIT_SCALE`]
/// before the matrix is applied, the Y and Z components are negated to
/// flip handedness, and the result is scaled by [`UNIT_SCALE`] once more.
#[must_use]
pub fn source_to_world(frame: &CoordinateFrame) -> Vec3 {
    let source_to_standard = Mat3::from_rows(frame.pitch, frame.yaw, frame.roll);
    let standard = source_to_standard * (frame.position * UNIT_SCALE);
    Vec3::new(standard.x, -standard.y, -standard.z) * UNIT_SCALE
}
