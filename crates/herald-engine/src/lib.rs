//! Notification recipient resolution.
//!
//! Given an activity and a raw list of addressees, compute who receives mail
//! and why:
//!
//! 1. [`expand`] flattens groups and projects into users and mailing-list
//!    groups, recording [`provenance`] for every expanded identifier.
//! 2. [`roles`] computes the roles each candidate holds for the activity.
//! 3. [`filter`] evaluates each candidate's preferences against those roles.
//! 4. [`resolve`] ties it together and produces the final address list.
//!
//! The engine holds no state between events and only awaits on the
//! [`Directory`](herald_core::directory::Directory) it is given.

pub mod address;
pub mod config;
pub mod error;
pub mod expand;
pub mod filter;
pub mod participant;
pub mod provenance;
pub mod resolve;
pub mod roles;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use resolve::RecipientResolver;

#[cfg(test)]
mod test_utils;
