//! Domain model for project descriptions.
//!
//! # Responsibility
//! - Define the project-description record persisted as JSON.
//! - Hold the fixed vocabulary (prefixes, fields, roles) shared by every
//!   conversion direction.
//!
//! # Invariants
//! - A record is always rebuilt from scratch; nothing here mutates in place
//!   across captures.

pub mod description;
pub mod vocab;
