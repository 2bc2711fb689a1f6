//! Core types and trait definitions for Herald notification routing.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; the engine only ever talks to directories
//! through the [`directory::Directory`] trait defined here.

pub mod activity;
pub mod directory;
pub mod error;
pub mod participant;
pub mod preferences;

pub use error::{Error, Result};
