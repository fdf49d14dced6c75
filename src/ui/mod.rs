//! Terminal UI layer for annotation runs.
//!
//! The UI module owns rendering, keyboard handling and loop control for the
//! full-screen annotator.
//!
//! Key submodules include:
//! - [`app`]: interaction state that maps keys and control records onto
//!   [`crate::core::session::Session`] operations.
//! - [`controls`] and [`widgets`]: the per-control records and the value
//!   entry widgets derived from the label space.
//! - [`renderer`], [`display`] and [`theme`]: frame composition and styling.
//! - [`event_loop`] and [`lifecycle`]: terminal ownership and the input loop.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns annotation semantics and persistence.

pub mod app;
pub mod controls;
pub mod display;
pub mod event_loop;
pub mod lifecycle;
pub mod renderer;
pub mod theme;
pub mod widgets;
