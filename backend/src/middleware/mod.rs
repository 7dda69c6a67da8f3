//! Request middleware.
//!
//! Purpose: attach request-scoped correlation data before handlers run.

pub mod trace;

pub use trace::Trace;
