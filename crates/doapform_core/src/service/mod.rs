//! Use-case services over the synchronization primitives.

pub mod sync_service;
