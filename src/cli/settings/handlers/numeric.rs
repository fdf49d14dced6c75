use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mutate_config, success_set, success_unset};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::Config;
use crate::core::constants::DEFAULT_DROPDOWN_THRESHOLD;

/// Handler for the `dropdown-threshold` setting.
pub struct DropdownThresholdHandler;

impl SettingHandler for DropdownThresholdHandler {
    fn key(&self) -> &'static str {
        "dropdown-threshold"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To change when classification switches to a dropdown, give a label count:",
                example: "perch set dropdown-threshold 8",
            });
        };

        let value = input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|value| *value >= 1)
            .ok_or_else(|| SettingError::InvalidNumber {
                key: "dropdown-threshold",
                input: input.clone(),
            })?;

        mutate_config(ctx.config_path, move |config| {
            config.dropdown_threshold = Some(value);
            Ok(())
        })?;

        Ok(success_set(self.key(), &value.to_string()))
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config(ctx.config_path, |config| {
            config.dropdown_threshold = None;
            Ok(())
        })?;
        Ok(success_unset(
            self.key(),
            &DEFAULT_DROPDOWN_THRESHOLD.to_string(),
        ))
    }

    fn format(&self, config: &Config) -> String {
        match config.dropdown_threshold {
            Some(value) => format!("  dropdown-threshold: {value}"),
            None => format!("  dropdown-threshold: (unset, default: {DEFAULT_DROPDOWN_THRESHOLD})"),
        }
    }
}
