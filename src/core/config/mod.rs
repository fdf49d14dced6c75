pub mod data;
pub mod defaults;
pub mod io;


pub use data::{Config, DisplayMode, ThemeName};
pub use io::ConfigError;
