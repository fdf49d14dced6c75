//! Event polling, dispatching and rendering for an annotation run.
//!
//! The loop owns the terminal for the lifetime of the run. The terminal is
//! restored on every exit path, including draw and read errors.

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, warn};

use crate::core::session::Session;
use crate::ui::app::{AnnotatorApp, KeyLoopAction};
use crate::ui::lifecycle::{restore_terminal, setup_terminal, AnnotatorTerminal};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How an annotation run ended. The session is kept even when the loop
/// failed, so the annotations made so far can still be written.
pub struct RunOutcome {
    pub session: Session<String>,
    pub error: Option<Box<dyn Error>>,
}

impl RunOutcome {
    pub fn new(app: AnnotatorApp, result: Result<(), Box<dyn Error>>) -> Self {
        Self {
            session: app.into_session(),
            error: result.err(),
        }
    }
}

/// Run the full-screen annotator until the user quits.
///
/// Only terminal setup fails outright; errors after the first example was
/// shown travel in [`RunOutcome::error`].
pub fn run_annotator(mut app: AnnotatorApp, theme: &Theme) -> Result<RunOutcome, Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    app.start();

    let result = drive(&mut terminal, &mut app, theme);
    let restored = restore_terminal(&mut terminal);
    if let Err(err) = &result {
        warn!(error = %err, "annotation loop failed");
    }

    Ok(RunOutcome::new(app, result.and(restored)))
}

fn drive(
    terminal: &mut AnnotatorTerminal,
    app: &mut AnnotatorApp,
    theme: &Theme,
) -> Result<(), Box<dyn Error>> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|f| ui(f, app, theme))?;
            dirty = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) == KeyLoopAction::Break {
                    debug!("quit requested");
                    return Ok(());
                }
                dirty = true;
            }
            Event::Paste(text) => {
                app.handle_paste(&text);
                dirty = true;
            }
            Event::Resize(_, _) => dirty = true,
            _ => {}
        }
    }
}
