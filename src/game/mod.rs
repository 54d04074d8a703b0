//! Duel simulation modules

pub mod agent;
pub mod ballistics;
pub mod combatant;
pub mod context;
pub mod damage;
pub mod duel;
pub mod events;
pub mod hitbox;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod weapon;

pub use duel::Duel;
pub use session::DuelSession;
