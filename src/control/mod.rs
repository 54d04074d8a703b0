//! External control surface for a running duel

pub mod handler;
pub mod protocol;
