//! Handlers for settings that pick one of a fixed set of names.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mutate_config, success_set, success_unset};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{Config, DisplayMode, ThemeName};

/// Handler for the `theme` setting.
pub struct ThemeHandler;

impl SettingHandler for ThemeHandler {
    fn key(&self) -> &'static str {
        "theme"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a theme, specify the theme name:",
                example: "perch set theme light",
            });
        }

        let input = args.join(" ");
        let theme = ThemeName::parse(&input).ok_or(SettingError::InvalidChoice {
            key: "theme",
            input,
            choices: "dark, light",
        })?;

        mutate_config(ctx.config_path, move |config| {
            config.theme = Some(theme);
            Ok(())
        })?;

        Ok(success_set("theme", &theme.to_string()))
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config(ctx.config_path, |config| {
            config.theme = None;
            Ok(())
        })?;
        Ok(success_unset("theme", "dark"))
    }

    fn format(&self, config: &Config) -> String {
        match config.theme {
            Some(theme) => format!("  theme: {theme}"),
            None => "  theme: (unset, default: dark)".to_string(),
        }
    }
}

/// Handler for the `display` setting.
pub struct DisplayHandler;

impl SettingHandler for DisplayHandler {
    fn key(&self) -> &'static str {
        "display"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To choose how examples are shown, specify plain or file:",
                example: "perch set display file",
            });
        }

        let input = args.join(" ");
        let display = DisplayMode::parse(&input).ok_or(SettingError::InvalidChoice {
            key: "display",
            input,
            choices: "plain, file",
        })?;

        mutate_config(ctx.config_path, move |config| {
            config.display = Some(display);
            Ok(())
        })?;

        Ok(success_set("display", &display.to_string()))
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config(ctx.config_path, |config| {
            config.display = None;
            Ok(())
        })?;
        Ok(success_unset("display", "plain"))
    }

    fn format(&self, config: &Config) -> String {
        match config.display {
            Some(display) => format!("  display: {display}"),
            None => "  display: (unset, default: plain)".to_string(),
        }
    }
}
