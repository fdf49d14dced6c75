use crate::core::config::data::{Config, DisplayMode, ThemeName};
use crate::core::constants::DEFAULT_DROPDOWN_THRESHOLD;

impl Config {
    pub fn shuffle_or_default(&self) -> bool {
        self.shuffle.unwrap_or(false)
    }

    pub fn include_skip_or_default(&self) -> bool {
        self.include_skip.unwrap_or(true)
    }

    pub fn dropdown_threshold_or_default(&self) -> usize {
        self.dropdown_threshold
            .unwrap_or(DEFAULT_DROPDOWN_THRESHOLD)
    }

    pub fn theme_or_default(&self) -> ThemeName {
        self.theme.unwrap_or_default()
    }

    pub fn display_or_default(&self) -> DisplayMode {
        self.display.unwrap_or_default()
    }
}
