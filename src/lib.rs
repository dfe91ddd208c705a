//! Rally onboarding — the new-member flow of a sports community app.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod picker;
