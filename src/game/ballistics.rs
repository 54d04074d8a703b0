//! Projectile ballistics - spawn and per-tick integration

use glam::Vec3;
use uuid::Uuid;

use super::combatant::Side;
use super::weapon::{WeaponProfile, Wind};

/// Projectiles older than this are silently despawned (seconds)
pub const MAX_PROJECTILE_AGE: f32 = 4.0;

/// Fraction of the wind vector added to velocity per second of flight
pub const WIND_DRIFT_FACTOR: f32 = 0.1;

/// A round in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: Uuid,
    pub owner: Side,
    /// Muzzle position at spawn
    pub origin: Vec3,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since spawn
    pub age: f32,
    pub weapon: &'static WeaponProfile,
}

/// Outcome of advancing a projectile by one slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Motion segment covered this slice
    Moved { from: Vec3, to: Vec3 },
    /// Exceeded its lifetime; remove without further processing
    Expired,
}

/// Create a projectile leaving `origin` along `direction`.
///
/// This is the only spawn path: requested shots and agent shots both come
/// through here. Wind seeds the initial drift. Returns `None` for a
/// zero-length direction.
pub fn spawn(
    owner: Side,
    origin: Vec3,
    direction: Vec3,
    weapon: &'static WeaponProfile,
    wind: Wind,
) -> Option<Projectile> {
    let direction = direction.try_normalize()?;
    Some(Projectile {
        id: Uuid::new_v4(),
        owner,
        origin,
        position: origin,
        velocity: direction * weapon.muzzle_velocity + wind.as_vec3(),
        age: 0.0,
        weapon,
    })
}

/// Advance a projectile by `dt` seconds (semi-implicit Euler)
pub fn advance(projectile: &mut Projectile, wind: Wind, dt: f32) -> Step {
    projectile.age += dt;
    if projectile.age > MAX_PROJECTILE_AGE {
        return Step::Expired;
    }

    // Velocity first, then position
    projectile.velocity.y -= projectile.weapon.gravity * dt;
    projectile.velocity.x += wind.x() * WIND_DRIFT_FACTOR * dt;
    projectile.velocity.z += wind.z() * WIND_DRIFT_FACTOR * dt;

    let from = projectile.position;
    projectile.position += projectile.velocity * dt;

    Step::Moved {
        from,
        to: projectile.position,
    }
}
