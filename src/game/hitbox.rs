//! Hit-volume resolution - motion segment against head/body spheres

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::combatant::{Combatant, HitVolume};

/// Which volume a projectile struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitLocation {
    Head,
    Body,
}

/// A qualifying hit on the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub location: HitLocation,
    /// Closest point on the segment's ray to the volume centre
    pub point: Vec3,
    pub volume_center: Vec3,
}

/// Test a motion segment against the target's volumes.
///
/// The head is tested first and wins whenever it is struck, even if the
/// body sphere is crossed too.
pub fn resolve(segment_start: Vec3, segment_end: Vec3, target: &Combatant) -> Option<Hit> {
    let head = target.head_volume();
    if let Some(point) = ray_hits_sphere(segment_start, segment_end, &head) {
        return Some(Hit {
            location: HitLocation::Head,
            point,
            volume_center: head.center,
        });
    }

    let body = target.body_volume();
    ray_hits_sphere(segment_start, segment_end, &body).map(|point| Hit {
        location: HitLocation::Body,
        point,
        volume_center: body.center,
    })
}

/// Returns the closest point on the ray if it passes within the sphere.
/// Spheres behind `start` are rejected.
fn ray_hits_sphere(start: Vec3, end: Vec3, volume: &HitVolume) -> Option<Vec3> {
    let dir = (end - start).try_normalize()?;
    let proj = (volume.center - start).dot(dir);
    if proj < 0.0 {
        return None;
    }

    let closest = start + dir * proj;
    if closest.distance_squared(volume.center) <= volume.radius * volume.radius {
        Some(closest)
    } else {
        None
    }
}
