//! Settings management for CLI set/unset commands.
//!
//! This module provides a trait-based architecture for handling configuration
//! settings, with different handler types for different setting patterns:
//!
//! - Boolean settings (`shuffle`, `include-skip`)
//! - Choice settings (`theme`, `display`)
//! - Numeric settings (`dropdown-threshold`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use std::path::Path;

use crate::core::config::data::Config;

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    /// The config file every change is written to.
    pub config_path: &'a Path,
}

/// Trait for handling a configuration setting.
///
/// Each implementation handles a specific configuration key,
/// providing set, unset, and format operations.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value.
    ///
    /// # Arguments
    /// * `args` - The arguments provided after the key (may be empty)
    /// * `ctx` - Context naming the config file to change
    ///
    /// # Returns
    /// A success message to display, or an error.
    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Unset (clear) the configuration value so the built-in default applies.
    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Format the current value for display in `perch config` output.
    fn format(&self, config: &Config) -> String;
}
