//! Shared constants used across the application

/// Classification tasks with more labels than this render a dropdown instead
/// of one button per label.
pub const DEFAULT_DROPDOWN_THRESHOLD: usize = 5;

/// Slider step used for integer ranges when none is given.
pub const DEFAULT_INT_STEP: i64 = 1;

/// Slider step used for real-valued ranges when none is given.
pub const DEFAULT_FLOAT_STEP: f64 = 0.1;

/// Number of lines the file preview renderer reads from an example path.
pub const FILE_PREVIEW_LINES: usize = 200;

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "PERCH_LOG";
