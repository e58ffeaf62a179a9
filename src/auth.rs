//! Credential plumbing: redacted token secrets and the pluggable token supplier.

pub mod secret;
pub mod supplier;

pub use secret::*;
pub use supplier::*;
