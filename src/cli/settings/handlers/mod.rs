//! Setting handlers for different configuration patterns.

pub mod boolean;
pub mod choice;
pub mod numeric;

pub use boolean::*;
pub use choice::*;
pub use numeric::*;
