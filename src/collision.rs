//! Data reported by the motion engine.
//!
//! These structures hold the grounding probe results and sweep hits the engine
//! hands to the controller each tick.

use bevy::prelude::*;

/// Result of the engine's ground probe for one tick.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct GroundingStatus {
    /// Any ground was found below the character, walkable or not.
    pub found_any_ground: bool,
    /// The ground found is walkable.
    pub is_stable_on_ground: bool,
    /// Normal of the ground surface. `Vec3::Y` when nothing was found.
    pub ground_normal: Vec3,
}

impl Default for GroundingStatus {
    fn default() -> Self {
        Self::airborne()
    }
}

impl GroundingStatus {
    /// No ground under the character.
    pub fn airborne() -> Self {
        Self {
            found_any_ground: false,
            is_stable_on_ground: false,
            ground_normal: Vec3::Y,
        }
    }

    /// Walkable ground with the given normal.
    pub fn stable(ground_normal: Vec3) -> Self {
        Self {
            found_any_ground: true,
            is_stable_on_ground: true,
            ground_normal: ground_normal.normalize_or(Vec3::Y),
        }
    }

    /// Ground that is too steep to stand on (sliding).
    pub fn unstable(ground_normal: Vec3) -> Self {
        Self {
            found_any_ground: true,
            is_stable_on_ground: false,
            ground_normal: ground_normal.normalize_or(Vec3::Y),
        }
    }

    /// Whether the character counts as grounded for jumping purposes.
    ///
    /// With `allow_sliding` any ground counts, otherwise only stable ground.
    #[inline]
    pub fn can_jump_from(&self, allow_sliding: bool) -> bool {
        if allow_sliding {
            self.found_any_ground
        } else {
            self.is_stable_on_ground
        }
    }

    /// Ground was found but it is not walkable.
    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.found_any_ground && !self.is_stable_on_ground
    }
}

/// A single contact produced while the engine sweeps the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementHit {
    /// Surface normal at the contact.
    pub normal: Vec3,
    /// World position of the contact.
    pub point: Vec3,
    /// Collider that was hit, if the engine tracks one.
    pub entity: Option<Entity>,
}

impl MovementHit {
    /// Create a hit record.
    pub fn new(normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            normal,
            point,
            entity,
        }
    }
}

/// Stability classification of a hit, filled in by the engine.
///
/// Hooks receive it mutably so they may override the engine's verdict.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct HitStabilityReport {
    /// The surface can be stood on.
    pub is_stable: bool,
    /// The hit lies on a ledge.
    pub ledge_detected: bool,
}

impl HitStabilityReport {
    /// A walkable surface.
    pub fn stable() -> Self {
        Self {
            is_stable: true,
            ..default()
        }
    }

    /// A wall or a slope too steep to stand on.
    pub fn unstable() -> Self {
        Self::default()
    }
}
