//! UI binding for the DOAP project form.

pub mod api;
