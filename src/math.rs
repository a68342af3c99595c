//! Small geometric helpers shared by the movement policies.
//!
//! Conventions follow Bevy: a rotation's forward axis is `-Z` and its up axis
//! is `+Y`.

use bevy::prelude::*;

/// Below this squared length a vector is treated as zero.
pub const EPSILON_SQUARED: f32 = 1e-10;

/// Remove the component of `vector` along `normal`.
///
/// `normal` does not need to be unit length. A degenerate normal leaves the
/// vector untouched.
#[inline]
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < EPSILON_SQUARED {
        return vector;
    }
    vector - normal * (vector.dot(normal) / len_sq)
}

/// Normalize `vector`, treating near-zero lengths as zero.
///
/// Unlike `Vec3::normalize_or_zero` this also rejects vectors that are only
/// non-zero through rounding error.
#[inline]
pub fn direction_or_zero(vector: Vec3) -> Vec3 {
    if vector.length_squared() < EPSILON_SQUARED {
        Vec3::ZERO
    } else {
        vector.normalize()
    }
}

/// Component of `vector` along `axis`.
#[inline]
pub fn project_on_axis(vector: Vec3, axis: Vec3) -> Vec3 {
    let len_sq = axis.length_squared();
    if len_sq < EPSILON_SQUARED {
        return Vec3::ZERO;
    }
    axis * (vector.dot(axis) / len_sq)
}

/// Interpolation factor for frame-rate independent exponential smoothing.
///
/// Returns `1 - e^(-sharpness * dt)`, which is always in `[0, 1)` for
/// non-negative inputs.
#[inline]
pub fn smoothing_factor(sharpness: f32, dt: f32) -> f32 {
    1.0 - (-sharpness * dt).exp()
}

/// Build a rotation whose forward axis points along `forward` and whose up
/// axis is as close to `up` as possible.
///
/// Falls back to the shortest arc from `-Z` when `forward` is parallel to
/// `up`, and to identity when `forward` is zero.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = direction_or_zero(forward);
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let right = forward.cross(up);
    if right.length_squared() < EPSILON_SQUARED {
        return Quat::from_rotation_arc(Vec3::NEG_Z, forward);
    }
    let right = right.normalize();
    let up = right.cross(forward);

    Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
}

/// Spherically interpolate between two directions by `t`.
///
/// Both inputs are normalized first. The result is unit length unless both
/// inputs are zero.
pub fn slerp_direction(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO {
        return to;
    }
    if to == Vec3::ZERO {
        return from;
    }

    let arc = Quat::from_rotation_arc(from, to);
    (Quat::IDENTITY.slerp(arc, t) * from).normalize_or_zero()
}
