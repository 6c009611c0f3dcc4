//! # confab-settings
//!
//! Configuration for the confab chat relay, loaded from three layers
//! (in priority order):
//!
//! 1. **Compiled defaults** — [`ConfabSettings::default()`]
//! 2. **Settings file** — JSON, deep-merged over defaults
//! 3. **Environment variables** — `CONFAB_*` overrides (highest priority)
//!
//! There is no global singleton: the loaded value is handed by ownership
//! to the service state at startup.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path};
pub use types::*;
