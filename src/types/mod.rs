// qrkit shared type definitions
// Each submodule defines types used across the crate.

pub mod content;
pub mod errors;
pub mod history;
pub mod qr;
pub mod settings;
