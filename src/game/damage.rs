//! Damage model - armor absorption and health loss

use super::combatant::Combatant;

/// Share of raw damage armor tries to soak up
pub const ARMOR_ABSORPTION: f32 = 0.7;
/// Reduction of raw damage per point armor actually absorbed
pub const ARMOR_MITIGATION: f32 = 0.6;

/// What a single damage application did to its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    pub raw: f32,
    pub absorbed: f32,
    pub health_lost: f32,
    pub health: f32,
    pub armor: f32,
    /// This application took health to zero
    pub lethal: bool,
}

/// Apply `raw` damage to a combatant.
///
/// Armor absorbs `min(armor, raw * 0.7)` and only `absorbed * 0.6` is taken
/// off the raw amount before it reaches health. Health never goes below
/// zero. A combatant already at zero health is left untouched and `None` is
/// returned.
pub fn apply_damage(target: &mut Combatant, raw: f32) -> Option<DamageReport> {
    if !target.is_alive() {
        return None;
    }

    let raw = raw.max(0.0);
    let mut remaining = raw;
    let mut absorbed = 0.0;

    if target.armor > 0.0 {
        absorbed = target.armor.min(raw * ARMOR_ABSORPTION);
        target.armor -= absorbed;
        remaining -= absorbed * ARMOR_MITIGATION;
    }

    let before = target.health;
    target.health = (target.health - remaining).max(0.0);

    Some(DamageReport {
        raw,
        absorbed,
        health_lost: before - target.health,
        health: target.health,
        armor: target.armor,
        lethal: target.health <= 0.0,
    })
}
