//! Client-side state shared across views.

pub mod session;
