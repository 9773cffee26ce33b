//! State synchronization between form, record and document.
//!
//! # Responsibility
//! - `capture`: form state to record.
//! - `apply`: record to form state.
//!
//! # Invariants
//! - Both directions consume the same `DeveloperRole` and `ProjectField`
//!   enumerations, so a captured record always applies cleanly.

pub mod apply;
pub mod capture;
