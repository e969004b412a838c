//! Actix middleware shared across every route.

pub mod trace;

pub use trace::Trace;
