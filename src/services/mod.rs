// qrkit services
// Stateless or lightly stateful helpers: classification, rendering, export, settings.

pub mod clock;
pub mod content_classifier;
pub mod exporter;
pub mod qr_generator;
pub mod qr_renderer;
pub mod settings_engine;
