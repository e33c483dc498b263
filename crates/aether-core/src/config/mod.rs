//! Configuration for the served directory.
//!
//! User-editable [`settings::Settings`] are stored as TOML and validated into
//! an immutable [`root::RootConfig`] once at startup.

pub mod root;
pub mod settings;

pub use root::RootConfig;
pub use settings::Settings;
