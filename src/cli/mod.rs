//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod annotate;
pub mod settings;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};

use crate::cli::annotate::{run_annotation, RunOptions};
use crate::cli::settings::{SetContext, SettingError, SettingRegistry};
use crate::core::config::data::path_display;
use crate::core::config::{Config, DisplayMode};
use crate::core::label_space::{LabelSpaceDescriptor, RangeBound, TaskDescriptor};
use crate::utils::logging::init_logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "perch")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Label examples from the terminal")]
#[command(
    long_about = "Perch is a full-screen terminal tool for annotating datasets. It shows one \
example at a time and records a label for it: a class, a number, a caption, or a set of \
tags across several tasks.\n\n\
Examples are read from a file or stdin, either as a JSON array or one per line. The \
annotations are printed to stdout as JSON (or written to --output) when you quit.\n\n\
Controls:\n\
  1-9               Choose the n-th label (toggle it when tagging)\n\
  Left/Right/Tab    Move focus between controls\n\
  Up/Down           Change the dropdown or slider value\n\
  Enter/Space       Activate the focused control\n\
  s / b             Skip / go back one example\n\
  d / c             Done with / clear the current example (tagging)\n\
  q, Esc, Ctrl+C    Quit and write the annotations"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Write tracing output to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Give each example one label: a class, a number or a caption
    Annotate(AnnotateArgs),
    /// Toggle labels for several tasks on each example
    Tag(TagArgs),
    /// Set configuration values
    Set {
        /// Configuration key to set (omit to list current values)
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the config file location and current values
    Config,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Shuffle examples before annotating
    #[arg(long)]
    pub shuffle: bool,

    /// Seed for a reproducible shuffle (implies --shuffle)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Write annotations to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// How to show each example
    #[arg(long, value_name = "plain|file", value_parser = parse_display)]
    pub display: Option<DisplayMode>,
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group(
    ArgGroup::new("label_space")
        .required(true)
        .args(["labels", "range", "text", "spec"])
))]
pub struct AnnotateArgs {
    /// Examples file (JSON array or one per line); `-` or absent reads stdin
    pub examples: Option<PathBuf>,

    /// Comma-separated classification labels
    #[arg(long, value_delimiter = ',', value_name = "A,B,...")]
    pub labels: Option<Vec<String>>,

    /// Numeric range for regression: MIN MAX [STEP]
    #[arg(
        long,
        num_args = 2..=3,
        value_names = ["MIN", "MAX", "STEP"],
        allow_negative_numbers = true,
        value_parser = parse_bound
    )]
    pub range: Option<Vec<RangeBound>>,

    /// Free-text captions
    #[arg(long)]
    pub text: bool,

    /// Read the label space from a TOML file
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,

    /// Hide the skip control
    #[arg(long)]
    pub no_skip: bool,

    #[command(flatten)]
    pub run: RunArgs,
}

impl AnnotateArgs {
    pub fn descriptor(&self) -> Result<LabelSpaceDescriptor, Box<dyn Error>> {
        if let Some(path) = &self.spec {
            return Ok(LabelSpaceDescriptor::load_from_path(path)?);
        }
        if let Some(labels) = &self.labels {
            return Ok(LabelSpaceDescriptor::classification(
                labels
                    .iter()
                    .map(|label| label.trim())
                    .filter(|label| !label.is_empty())
                    .map(str::to_string),
            ));
        }
        if let Some(bounds) = &self.range {
            return Ok(LabelSpaceDescriptor::regression(bounds.clone()));
        }
        Ok(LabelSpaceDescriptor::free_text())
    }
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group(
    ArgGroup::new("label_space")
        .required(true)
        .args(["tasks", "spec"])
))]
pub struct TagArgs {
    /// Examples file (JSON array or one per line); `-` or absent reads stdin
    pub examples: Option<PathBuf>,

    /// A task and its labels, e.g. `--task color=red,blue` (repeatable)
    #[arg(long = "task", value_name = "NAME=A,B,...", value_parser = parse_task)]
    pub tasks: Vec<TaskDescriptor>,

    /// Read the tasks from a TOML file
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl TagArgs {
    pub fn descriptor(&self) -> Result<LabelSpaceDescriptor, Box<dyn Error>> {
        let descriptor = match &self.spec {
            Some(path) => LabelSpaceDescriptor::load_from_path(path)?,
            None => LabelSpaceDescriptor::multi_task(self.tasks.clone()),
        };
        if descriptor.tasks.is_none() {
            return Err("tagging needs tasks: use --task NAME=A,B or a [[tasks]] spec file".into());
        }
        Ok(descriptor)
    }
}

pub fn parse_bound(input: &str) -> Result<RangeBound, String> {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(RangeBound::Int(value));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(RangeBound::Float(value)),
        _ => Err(format!("'{input}' is not a number")),
    }
}

pub fn parse_task(input: &str) -> Result<TaskDescriptor, String> {
    let (name, labels) = input
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=A,B,... but got '{input}'"))?;
    Ok(TaskDescriptor {
        name: name.trim().to_string(),
        labels: labels
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

fn parse_display(input: &str) -> Result<DisplayMode, String> {
    DisplayMode::parse(input).ok_or_else(|| format!("unknown display '{input}' (use plain or file)"))
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    match args.command {
        Commands::Annotate(annotate) => {
            let config = Config::load()?;
            let descriptor = annotate.descriptor()?;
            let options = RunOptions::resolve(&annotate.run, !annotate.no_skip, &config);
            run_annotation(descriptor, annotate.examples.as_deref(), &options)
        }
        Commands::Tag(tag) => {
            let config = Config::load()?;
            let descriptor = tag.descriptor()?;
            let options = RunOptions::resolve(&tag.run, true, &config);
            run_annotation(descriptor, tag.examples.as_deref(), &options)
        }
        Commands::Set { key, value } => {
            let config_path = Config::get_config_path()?;
            let registry = SettingRegistry::new();
            match key {
                Some(key) => report(apply_set(&registry, &config_path, &key, &value)),
                None => print_config(&registry, &config_path),
            }
        }
        Commands::Unset { key } => {
            let config_path = Config::get_config_path()?;
            let registry = SettingRegistry::new();
            report(apply_unset(&registry, &config_path, &key))
        }
        Commands::Config => {
            let config_path = Config::get_config_path()?;
            println!("Config file: {}", path_display(&config_path));
            print_config(&SettingRegistry::new(), &config_path)
        }
    }
}

pub fn apply_set(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
    value: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    handler.set(value, &SetContext { config_path })
}

pub fn apply_unset(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    handler.unset(&SetContext { config_path })
}

fn report(result: Result<String, SettingError>) -> Result<(), Box<dyn Error>> {
    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

fn print_config(registry: &SettingRegistry, config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::load_from_path(config_path)?;
    println!("Current configuration:");
    for line in registry.describe(&config) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests;
