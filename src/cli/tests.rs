use super::annotate::{finish_run, prepare_session, RunOptions};
use super::*;
use crate::core::example::ExampleSource;
use crate::core::label_space::{LabelSpace, NumericRange};
use crate::core::label_space::Label;
use crate::core::session::{Mode, Session, SessionOptions};
use crate::ui::event_loop::RunOutcome;
use std::fs;
use tempfile::TempDir;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn annotate_args(argv: &[&str]) -> AnnotateArgs {
        match parse_args(argv).command {
            Commands::Annotate(args) => args,
            _ => panic!("expected annotate subcommand for argv={argv:?}"),
        }
    }

    pub(super) fn tag_args(argv: &[&str]) -> TagArgs {
        match parse_args(argv).command {
            Commands::Tag(args) => args,
            _ => panic!("expected tag subcommand for argv={argv:?}"),
        }
    }

    pub(super) fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }
}

use test_helpers::{annotate_args, parse_args, strings, tag_args};

#[test]
fn annotate_labels_are_split_on_commas() {
    let args = annotate_args(&["perch", "annotate", "items.txt", "--labels", "yes, no"]);
    assert_eq!(args.examples.as_deref(), Some(Path::new("items.txt")));
    let space = LabelSpace::from_descriptor(args.descriptor().unwrap()).unwrap();
    assert_eq!(
        space,
        LabelSpace::Classification(vec!["yes".into(), "no".into()])
    );
}

#[test]
fn annotate_labels_drop_empty_entries() {
    let args = annotate_args(&["perch", "annotate", "--labels", "a,,b, "]);
    let space = LabelSpace::from_descriptor(args.descriptor().unwrap()).unwrap();
    assert_eq!(
        space,
        LabelSpace::Classification(vec!["a".into(), "b".into()])
    );
}

#[test]
fn annotate_range_accepts_negative_and_float_bounds() {
    let args = annotate_args(&["perch", "annotate", "--range", "-1", "1", "0.5"]);
    assert_eq!(
        args.range,
        Some(vec![
            RangeBound::Int(-1),
            RangeBound::Int(1),
            RangeBound::Float(0.5)
        ])
    );

    let args = annotate_args(&["perch", "annotate", "--range", "1", "5"]);
    let space = LabelSpace::from_descriptor(args.descriptor().unwrap()).unwrap();
    assert_eq!(
        space,
        LabelSpace::Regression(NumericRange::Int {
            min: 1,
            max: 5,
            step: 1
        })
    );
}

#[test]
fn annotate_requires_exactly_one_label_space() {
    assert!(Args::try_parse_from(["perch", "annotate", "items.txt"]).is_err());
    assert!(
        Args::try_parse_from(["perch", "annotate", "--labels", "a,b", "--text"]).is_err()
    );
    let args = annotate_args(&["perch", "annotate", "--text", "--no-skip", "--seed", "7"]);
    assert!(args.text);
    assert!(args.no_skip);
    assert_eq!(args.run.seed, Some(7));
}

#[test]
fn annotate_rejects_bad_bounds_and_display() {
    assert!(Args::try_parse_from(["perch", "annotate", "--range", "low", "high"]).is_err());
    assert!(Args::try_parse_from(["perch", "annotate", "--range", "1"]).is_err());
    assert!(
        Args::try_parse_from(["perch", "annotate", "--text", "--display", "image"]).is_err()
    );
    let args = annotate_args(&["perch", "annotate", "--text", "--display", "file"]);
    assert_eq!(args.run.display, Some(DisplayMode::File));
}

#[test]
fn tag_collects_repeated_tasks() {
    let args = tag_args(&[
        "perch",
        "tag",
        "assets.json",
        "--task",
        "color=red,blue",
        "--task",
        "size=small",
    ]);
    let space = LabelSpace::from_descriptor(args.descriptor().unwrap()).unwrap();
    assert!(space.is_multi_task());
    assert_eq!(space.tasks().len(), 2);
    assert_eq!(space.tasks()[0].labels, ["red", "blue"]);
    assert_eq!(space.tasks()[1].name, "size");
}

#[test]
fn tag_rejects_a_spec_without_tasks() {
    let temp_dir = TempDir::new().unwrap();
    let spec = temp_dir.path().join("labels.toml");
    fs::write(&spec, "labels = [\"a\", \"b\"]\n").unwrap();

    let args = tag_args(&["perch", "tag", "--spec", spec.to_str().unwrap()]);
    assert!(args.descriptor().is_err());
}

#[test]
fn parse_task_requires_name_separator() {
    assert!(parse_task("color").is_err());
    let task = parse_task(" color = red, ,blue ").unwrap();
    assert_eq!(task.name, "color");
    assert_eq!(task.labels, ["red", "blue"]);
}

#[test]
fn log_flag_is_global() {
    let args = parse_args(&["perch", "annotate", "--text", "--log", "run.log"]);
    assert_eq!(args.log.as_deref(), Some(Path::new("run.log")));
    let args = parse_args(&["perch", "-l", "run.log", "config"]);
    assert!(matches!(args.command, Commands::Config));
}

#[test]
fn run_options_prefer_flags_over_config() {
    let config = Config {
        shuffle: Some(false),
        include_skip: Some(true),
        dropdown_threshold: Some(3),
        display: Some(DisplayMode::File),
        ..Default::default()
    };
    let run = RunArgs {
        seed: Some(11),
        display: Some(DisplayMode::Plain),
        ..Default::default()
    };
    let options = RunOptions::resolve(&run, false, &config);
    assert!(options.shuffle);
    assert!(!options.allow_skip);
    assert_eq!(options.dropdown_threshold, 3);
    assert_eq!(options.display, DisplayMode::Plain);

    let options = RunOptions::resolve(&RunArgs::default(), true, &Config::default());
    assert!(!options.shuffle);
    assert!(options.allow_skip);
    assert_eq!(options.display, DisplayMode::Plain);
}

#[test]
fn prepare_session_validates_before_reading_examples() {
    let options = RunOptions::resolve(&RunArgs::default(), true, &Config::default());
    let missing = ExampleSource::File(PathBuf::from("/definitely/not/here.txt"));
    let err = prepare_session(LabelSpaceDescriptor::classification(Vec::<String>::new()), &missing, &options)
        .err()
        .expect("empty label list should fail");
    assert!(err.to_string().contains("label"));
}

#[test]
fn prepare_session_shuffles_reproducibly() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("items.json");
    fs::write(&path, r#"["a", "b", "c", "d", "e", "f"]"#).unwrap();
    let source = ExampleSource::File(path);

    let run = RunArgs {
        seed: Some(42),
        ..Default::default()
    };
    let options = RunOptions::resolve(&run, true, &Config::default());
    let first = prepare_session(LabelSpaceDescriptor::free_text(), &source, &options).unwrap();
    let second = prepare_session(LabelSpaceDescriptor::free_text(), &source, &options).unwrap();

    assert_eq!(first.mode(), Mode::SingleTask);
    assert_eq!(first.examples(), second.examples());
    let mut sorted = first.examples().to_vec();
    sorted.sort();
    assert_eq!(sorted, strings(&["a", "b", "c", "d", "e", "f"]));
}

#[test]
fn finish_run_writes_annotations_before_reporting_a_loop_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("labels.json");

    let mut session = Session::new(
        strings(&["a", "b"]),
        LabelSpace::Classification(strings(&["yes", "no"])),
        SessionOptions::default(),
    );
    session.start().unwrap();
    session.record_single_label(Label::text("yes")).unwrap();

    let outcome = RunOutcome {
        session,
        error: Some("terminal read failed".into()),
    };
    let err = finish_run(outcome, Some(&output)).unwrap_err();
    assert_eq!(err.to_string(), "terminal read failed");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!([["a", "yes"]]));
}

#[test]
fn set_and_unset_round_trip_through_registry() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let registry = SettingRegistry::new();

    let message = apply_set(&registry, &config_path, "shuffle", &strings(&["on"])).unwrap();
    assert_eq!(message, "✅ Set shuffle to: on");
    apply_set(&registry, &config_path, "theme", &strings(&["Light"])).unwrap();
    apply_set(&registry, &config_path, "dropdown-threshold", &strings(&["8"])).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.shuffle, Some(true));
    assert_eq!(config.theme, Some(crate::core::config::ThemeName::Light));
    assert_eq!(config.dropdown_threshold, Some(8));

    apply_unset(&registry, &config_path, "shuffle").unwrap();
    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.shuffle, None);
    assert_eq!(config.dropdown_threshold, Some(8));
}

#[test]
fn set_reports_invalid_values_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let registry = SettingRegistry::new();

    assert!(matches!(
        apply_set(&registry, &config_path, "colour", &strings(&["on"])),
        Err(SettingError::UnknownKey(_))
    ));
    assert!(matches!(
        apply_set(&registry, &config_path, "include-skip", &strings(&["maybe"])),
        Err(SettingError::InvalidBoolean(_))
    ));
    assert!(matches!(
        apply_set(&registry, &config_path, "dropdown-threshold", &strings(&["0"])),
        Err(SettingError::InvalidNumber { .. })
    ));
    assert!(matches!(
        apply_set(&registry, &config_path, "display", &[]),
        Err(SettingError::MissingArgs { .. })
    ));
    assert!(!config_path.exists());
}

#[test]
fn registry_describes_keys_in_display_order() {
    let registry = SettingRegistry::new();
    assert_eq!(
        registry.keys_display_order(),
        ["shuffle", "include-skip", "dropdown-threshold", "theme", "display"]
    );
    let lines = registry.describe(&Config::default());
    assert_eq!(lines[0], "  shuffle: (unset, default: off)");
    assert_eq!(lines[2], "  dropdown-threshold: (unset, default: 5)");
}
