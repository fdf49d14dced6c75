use std::error::Error;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::RunArgs;
use crate::core::config::{Config, DisplayMode, ThemeName};
use crate::core::example::{shuffle_examples, ExampleSource};
use crate::core::label_space::{LabelSpace, LabelSpaceDescriptor};
use crate::core::output::{annotations_to_json, write_output, OutputTarget};
use crate::core::session::{Session, SessionOptions};
use crate::ui::app::AnnotatorApp;
use crate::ui::display::renderer_for;
use crate::ui::event_loop::{run_annotator, RunOutcome};
use crate::ui::theme::Theme;

/// Flags merged with the saved config. Flags win.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub allow_skip: bool,
    pub dropdown_threshold: usize,
    pub theme: ThemeName,
    pub display: DisplayMode,
    pub output: Option<PathBuf>,
}

impl RunOptions {
    pub fn resolve(args: &RunArgs, allow_skip: bool, config: &Config) -> Self {
        Self {
            shuffle: args.shuffle || args.seed.is_some() || config.shuffle_or_default(),
            seed: args.seed,
            allow_skip: allow_skip && config.include_skip_or_default(),
            dropdown_threshold: config.dropdown_threshold_or_default(),
            theme: config.theme_or_default(),
            display: args.display.unwrap_or_else(|| config.display_or_default()),
            output: args.output.clone(),
        }
    }
}

/// Build a session from the descriptor and examples, validating both before
/// any terminal state is touched.
pub fn prepare_session(
    descriptor: LabelSpaceDescriptor,
    examples: &ExampleSource,
    options: &RunOptions,
) -> Result<Session<String>, Box<dyn Error>> {
    let label_space = LabelSpace::from_descriptor(descriptor)?;
    let mut examples = examples.load()?;
    if options.shuffle {
        shuffle_examples(&mut examples, options.seed);
    }
    Ok(Session::new(
        examples,
        label_space,
        SessionOptions {
            allow_skip: options.allow_skip,
        },
    ))
}

pub fn run_annotation(
    descriptor: LabelSpaceDescriptor,
    examples: Option<&Path>,
    options: &RunOptions,
) -> Result<(), Box<dyn Error>> {
    let source = ExampleSource::from_arg(examples);
    if source == ExampleSource::Stdin && io::stdin().is_terminal() {
        return Err("no examples given: pass a file or pipe them on stdin".into());
    }

    let session = prepare_session(descriptor, &source, options)?;
    let app = AnnotatorApp::new(
        session,
        options.dropdown_threshold,
        renderer_for(options.display),
    );
    let outcome = run_annotator(app, &Theme::from_name(options.theme))?;
    finish_run(outcome, options.output.as_deref())
}

/// Write whatever was annotated, then surface any error that ended the run.
pub fn finish_run(outcome: RunOutcome, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let RunOutcome { session, error } = outcome;
    let json = annotations_to_json(&session)?;
    write_output(&json, &OutputTarget::from_arg(output))?;

    let progress = session.progress();
    info!(%progress, "annotation finished");
    eprintln!("{progress}");
    match error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
