//! Connection settings: loading, secret resolution and TLS normalization.

pub mod normalizer;
pub mod ports;
pub mod provider;

pub use provider::SettingsProvider;
