//! Request middleware shared by every HTTP route.

pub mod trace;

pub use trace::Trace;
