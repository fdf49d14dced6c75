//! Perch is a full-screen terminal tool for annotating datasets.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the annotation session state machine, label spaces,
//!   example loading, configuration and JSON output.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that turns key presses into session operations.
//! - [`cli`] parses arguments, merges flags with the saved config and handles
//!   the `set`/`unset`/`config` commands.
//! - [`utils`] holds logging setup and test helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which builds a [`core::session::Session`]
//! and hands it to [`ui::event_loop::run_annotator`].

pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
