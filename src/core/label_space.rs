//! Label-space descriptors and the validated label space built from them.
//!
//! A [`LabelSpaceDescriptor`] is what the user hands us (CLI flags or a TOML
//! task file). It is checked once by [`LabelSpace::from_descriptor`]; after
//! that the session and the UI only ever see the tagged [`LabelSpace`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::data::path_display;
use crate::core::constants::{DEFAULT_FLOAT_STEP, DEFAULT_INT_STEP};

/// A single label value recorded for an example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Label {
    pub fn text<S: Into<String>>(value: S) -> Self {
        Label::Text(value.into())
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Label::Int(value) => Some(*value as f64),
            Label::Float(value) => Some(*value),
            Label::Text(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(value) => write!(f, "{value}"),
            Label::Float(value) => write!(f, "{value}"),
            Label::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Numeric bound as written by the user; integers stay integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBound {
    Int(i64),
    Float(f64),
}

impl RangeBound {
    fn as_f64(self) -> f64 {
        match self {
            RangeBound::Int(value) => value as f64,
            RangeBound::Float(value) => value,
        }
    }
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Int(value) => write!(f, "{value}"),
            RangeBound::Float(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Unvalidated label-space description. Exactly one field may be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSpaceDescriptor {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub range: Option<Vec<RangeBound>>,
    #[serde(default)]
    pub free_text: bool,
    #[serde(default)]
    pub tasks: Option<Vec<TaskDescriptor>>,
}

impl LabelSpaceDescriptor {
    pub fn classification<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: Some(labels.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn regression(bounds: Vec<RangeBound>) -> Self {
        Self {
            range: Some(bounds),
            ..Default::default()
        }
    }

    pub fn free_text() -> Self {
        Self {
            free_text: true,
            ..Default::default()
        }
    }

    pub fn multi_task(tasks: Vec<TaskDescriptor>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Default::default()
        }
    }

    /// Read a descriptor from a TOML task file.
    ///
    /// ```toml
    /// labels = ["cat", "dog"]
    /// # or: range = [0, 10, 2]
    /// # or: free_text = true
    /// # or:
    /// [[tasks]]
    /// name = "color"
    /// labels = ["red", "blue"]
    /// ```
    pub fn load_from_path(path: &Path) -> Result<Self, LabelSpaceError> {
        let contents = fs::read_to_string(path).map_err(|source| LabelSpaceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| LabelSpaceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn kinds_set(&self) -> usize {
        [
            self.labels.is_some(),
            self.range.is_some(),
            self.free_text,
            self.tasks.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRange {
    Int { min: i64, max: i64, step: i64 },
    Float { min: f64, max: f64, step: f64 },
}

impl NumericRange {
    fn check(&self, label: &Label) -> Result<(), LabelRejection> {
        match (*self, label) {
            (NumericRange::Int { min, max, .. }, Label::Int(value)) => {
                if (min..=max).contains(value) {
                    Ok(())
                } else {
                    Err(self.out_of_range())
                }
            }
            (NumericRange::Int { .. }, _) => Err(LabelRejection::WrongType {
                expected: "an integer",
            }),
            (NumericRange::Float { min, max, .. }, label) => match label.as_f64() {
                Some(value) if value.is_finite() && value >= min && value <= max => Ok(()),
                Some(_) => Err(self.out_of_range()),
                None => Err(LabelRejection::WrongType {
                    expected: "a number",
                }),
            },
        }
    }

    fn out_of_range(&self) -> LabelRejection {
        let (min, max) = match *self {
            NumericRange::Int { min, max, .. } => (min.to_string(), max.to_string()),
            NumericRange::Float { min, max, .. } => (min.to_string(), max.to_string()),
        };
        LabelRejection::OutOfRange { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub labels: Vec<String>,
}

/// The validated label space, decided once per session.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSpace {
    Classification(Vec<String>),
    Regression(NumericRange),
    FreeText,
    MultiTask(Vec<Task>),
}

impl LabelSpace {
    pub fn from_descriptor(descriptor: LabelSpaceDescriptor) -> Result<Self, LabelSpaceError> {
        match descriptor.kinds_set() {
            0 => return Err(LabelSpaceError::Missing),
            1 => {}
            _ => return Err(LabelSpaceError::Ambiguous),
        }

        if let Some(labels) = descriptor.labels {
            return Ok(LabelSpace::Classification(unique_labels(labels, None)?));
        }
        if let Some(bounds) = descriptor.range {
            return Ok(LabelSpace::Regression(numeric_range(&bounds)?));
        }
        if descriptor.free_text {
            return Ok(LabelSpace::FreeText);
        }

        let tasks = descriptor.tasks.unwrap_or_default();
        if tasks.is_empty() {
            return Err(LabelSpaceError::NoTasks);
        }
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(tasks.len());
        for task in tasks {
            let name = task.name.trim().to_string();
            if name.is_empty() {
                return Err(LabelSpaceError::EmptyTaskName);
            }
            if !seen.insert(name.clone()) {
                return Err(LabelSpaceError::DuplicateTask(name));
            }
            let labels = unique_labels(task.labels, Some(&name))?;
            validated.push(Task { name, labels });
        }
        Ok(LabelSpace::MultiTask(validated))
    }

    pub fn is_multi_task(&self) -> bool {
        matches!(self, LabelSpace::MultiTask(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LabelSpace::Classification(_) => "classification",
            LabelSpace::Regression(_) => "regression",
            LabelSpace::FreeText => "free text",
            LabelSpace::MultiTask(_) => "multi-task",
        }
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        match self {
            LabelSpace::MultiTask(tasks) => tasks.iter().find(|task| task.name == name),
            _ => None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        match self {
            LabelSpace::MultiTask(tasks) => tasks,
            _ => &[],
        }
    }

    /// Check that `label` may be recorded in single-task mode.
    pub fn accepts(&self, label: &Label) -> Result<(), LabelRejection> {
        match self {
            LabelSpace::Classification(labels) => match label {
                Label::Text(text) if labels.iter().any(|known| known == text) => Ok(()),
                _ => Err(LabelRejection::NotAnOption),
            },
            LabelSpace::Regression(range) => range.check(label),
            LabelSpace::FreeText => match label {
                Label::Text(_) => Ok(()),
                _ => Err(LabelRejection::WrongType { expected: "text" }),
            },
            LabelSpace::MultiTask(_) => Err(LabelRejection::MultiTask),
        }
    }
}

fn unique_labels(labels: Vec<String>, task: Option<&str>) -> Result<Vec<String>, LabelSpaceError> {
    if labels.is_empty() {
        return Err(LabelSpaceError::EmptyLabels {
            task: task.map(str::to_string),
        });
    }
    let mut seen = HashSet::new();
    for label in &labels {
        if label.trim().is_empty() {
            return Err(LabelSpaceError::BlankLabel {
                task: task.map(str::to_string),
            });
        }
        if !seen.insert(label.as_str()) {
            return Err(LabelSpaceError::DuplicateLabel {
                task: task.map(str::to_string),
                label: label.clone(),
            });
        }
    }
    Ok(labels)
}

fn numeric_range(bounds: &[RangeBound]) -> Result<NumericRange, LabelSpaceError> {
    if !(2..=3).contains(&bounds.len()) {
        return Err(LabelSpaceError::RangeArity(bounds.len()));
    }

    // The first bound decides whether the slider is integer or real valued.
    let range = match bounds[0] {
        RangeBound::Int(min) => {
            let mut ints = Vec::with_capacity(bounds.len());
            for bound in bounds {
                match bound {
                    RangeBound::Int(value) => ints.push(*value),
                    RangeBound::Float(_) => return Err(LabelSpaceError::MixedRangeTypes),
                }
            }
            let step = ints.get(2).copied().unwrap_or(DEFAULT_INT_STEP);
            if step <= 0 {
                return Err(LabelSpaceError::InvalidStep(bounds[2].to_string()));
            }
            NumericRange::Int {
                min,
                max: ints[1],
                step,
            }
        }
        RangeBound::Float(min) => {
            let max = bounds[1].as_f64();
            let step = bounds.get(2).map(|b| b.as_f64()).unwrap_or(DEFAULT_FLOAT_STEP);
            if !min.is_finite() || !max.is_finite() {
                return Err(LabelSpaceError::EmptyRange {
                    min: bounds[0].to_string(),
                    max: bounds[1].to_string(),
                });
            }
            if !(step.is_finite() && step > 0.0) {
                return Err(LabelSpaceError::InvalidStep(step.to_string()));
            }
            NumericRange::Float { min, max, step }
        }
    };

    let empty = match range {
        NumericRange::Int { min, max, .. } => min >= max,
        NumericRange::Float { min, max, .. } => min >= max,
    };
    if empty {
        return Err(LabelSpaceError::EmptyRange {
            min: bounds[0].to_string(),
            max: bounds[1].to_string(),
        });
    }
    Ok(range)
}

/// Reason a label was refused by [`LabelSpace::accepts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRejection {
    NotAnOption,
    OutOfRange { min: String, max: String },
    WrongType { expected: &'static str },
    MultiTask,
}

impl fmt::Display for LabelRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelRejection::NotAnOption => write!(f, "not one of the configured labels"),
            LabelRejection::OutOfRange { min, max } => {
                write!(f, "outside the range {min}..={max}")
            }
            LabelRejection::WrongType { expected } => write!(f, "expected {expected}"),
            LabelRejection::MultiTask => write!(f, "multi-task sessions take task toggles"),
        }
    }
}

/// Errors raised while building a label space.
#[derive(Debug)]
pub enum LabelSpaceError {
    /// Failed to read the task file.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The task file is not valid TOML or has unexpected fields.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Missing,
    Ambiguous,
    EmptyLabels { task: Option<String> },
    DuplicateLabel { task: Option<String>, label: String },
    BlankLabel { task: Option<String> },
    RangeArity(usize),
    MixedRangeTypes,
    EmptyRange { min: String, max: String },
    InvalidStep(String),
    NoTasks,
    EmptyTaskName,
    DuplicateTask(String),
}

impl fmt::Display for LabelSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSpaceError::Read { path, source } => {
                write!(f, "Failed to read task file {}: {}", path_display(path), source)
            }
            LabelSpaceError::Parse { path, source } => {
                write!(f, "Failed to parse task file {}: {}", path_display(path), source)
            }
            LabelSpaceError::Missing => write!(
                f,
                "Invalid options: give labels, a numeric range, free text, or tasks"
            ),
            LabelSpaceError::Ambiguous => write!(
                f,
                "Invalid options: labels, range, free text and tasks are mutually exclusive"
            ),
            LabelSpaceError::EmptyLabels { task: Some(task) } => {
                write!(f, "Invalid options: task '{task}' has no labels")
            }
            LabelSpaceError::EmptyLabels { task: None } => {
                write!(f, "Invalid options: the label list is empty")
            }
            LabelSpaceError::DuplicateLabel {
                task: Some(task),
                label,
            } => write!(f, "Invalid options: label '{label}' repeated in task '{task}'"),
            LabelSpaceError::DuplicateLabel { task: None, label } => {
                write!(f, "Invalid options: label '{label}' repeated")
            }
            LabelSpaceError::BlankLabel { task: Some(task) } => {
                write!(f, "Invalid options: task '{task}' has a blank label")
            }
            LabelSpaceError::BlankLabel { task: None } => {
                write!(f, "Invalid options: labels cannot be blank")
            }
            LabelSpaceError::RangeArity(len) => write!(
                f,
                "Invalid options: a range takes (min, max) or (min, max, step), got {len} values"
            ),
            LabelSpaceError::MixedRangeTypes => write!(
                f,
                "Invalid options: an integer range cannot have real-valued bounds or step"
            ),
            LabelSpaceError::EmptyRange { min, max } => {
                write!(f, "Invalid options: range {min}..{max} is empty")
            }
            LabelSpaceError::InvalidStep(step) => {
                write!(f, "Invalid options: step must be positive, got {step}")
            }
            LabelSpaceError::NoTasks => write!(f, "Invalid options: no tasks given"),
            LabelSpaceError::EmptyTaskName => write!(f, "Invalid options: task name is empty"),
            LabelSpaceError::DuplicateTask(name) => {
                write!(f, "Invalid options: task '{name}' defined twice")
            }
        }
    }
}

impl std::error::Error for LabelSpaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabelSpaceError::Read { source, .. } => Some(source),
            LabelSpaceError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn classification_keeps_label_order() {
        let space =
            LabelSpace::from_descriptor(LabelSpaceDescriptor::classification(["yes", "no"]))
                .unwrap();
        assert_eq!(
            space,
            LabelSpace::Classification(vec!["yes".to_string(), "no".to_string()])
        );
        assert!(space.accepts(&Label::text("no")).is_ok());
        assert_eq!(
            space.accepts(&Label::text("maybe")),
            Err(LabelRejection::NotAnOption)
        );
    }

    #[test]
    fn descriptor_must_name_exactly_one_kind() {
        assert!(matches!(
            LabelSpace::from_descriptor(LabelSpaceDescriptor::default()),
            Err(LabelSpaceError::Missing)
        ));

        let both = LabelSpaceDescriptor {
            labels: Some(vec!["a".into()]),
            free_text: true,
            ..Default::default()
        };
        assert!(matches!(
            LabelSpace::from_descriptor(both),
            Err(LabelSpaceError::Ambiguous)
        ));
    }

    #[test]
    fn integer_range_defaults_step_to_one() {
        let space = LabelSpace::from_descriptor(LabelSpaceDescriptor::regression(vec![
            RangeBound::Int(0),
            RangeBound::Int(10),
        ]))
        .unwrap();
        assert_eq!(
            space,
            LabelSpace::Regression(NumericRange::Int {
                min: 0,
                max: 10,
                step: 1
            })
        );
        assert!(space.accepts(&Label::Int(10)).is_ok());
        assert!(matches!(
            space.accepts(&Label::Int(11)),
            Err(LabelRejection::OutOfRange { .. })
        ));
        assert!(matches!(
            space.accepts(&Label::Float(2.5)),
            Err(LabelRejection::WrongType { .. })
        ));
    }

    #[test]
    fn float_range_promotes_integer_bounds() {
        let space = LabelSpace::from_descriptor(LabelSpaceDescriptor::regression(vec![
            RangeBound::Float(0.5),
            RangeBound::Int(2),
            RangeBound::Float(0.25),
        ]))
        .unwrap();
        assert_eq!(
            space,
            LabelSpace::Regression(NumericRange::Float {
                min: 0.5,
                max: 2.0,
                step: 0.25
            })
        );
        assert!(space.accepts(&Label::Int(1)).is_ok());
    }

    #[test]
    fn rejects_bad_ranges() {
        let cases = [
            vec![RangeBound::Int(1)],
            vec![RangeBound::Int(5), RangeBound::Int(5)],
            vec![RangeBound::Int(0), RangeBound::Float(1.5)],
            vec![RangeBound::Int(0), RangeBound::Int(3), RangeBound::Int(0)],
            vec![
                RangeBound::Float(0.0),
                RangeBound::Float(1.0),
                RangeBound::Float(-0.1),
            ],
        ];
        for bounds in cases {
            let result = LabelSpace::from_descriptor(LabelSpaceDescriptor::regression(
                bounds.clone(),
            ));
            assert!(result.is_err(), "expected {bounds:?} to be rejected");
        }
    }

    #[test]
    fn blank_labels_are_rejected() {
        assert!(matches!(
            LabelSpace::from_descriptor(LabelSpaceDescriptor::classification(["a", "", "b"])),
            Err(LabelSpaceError::BlankLabel { task: None })
        ));

        let tasks = LabelSpaceDescriptor::multi_task(vec![TaskDescriptor {
            name: "color".into(),
            labels: vec!["red".into(), "  ".into()],
        }]);
        assert!(matches!(
            LabelSpace::from_descriptor(tasks),
            Err(LabelSpaceError::BlankLabel { task: Some(task) }) if task == "color"
        ));
    }

    #[test]
    fn multi_task_rejects_duplicates_and_empty_tasks() {
        let duplicate = LabelSpaceDescriptor::multi_task(vec![
            TaskDescriptor {
                name: "color".into(),
                labels: vec!["red".into()],
            },
            TaskDescriptor {
                name: "color".into(),
                labels: vec!["blue".into()],
            },
        ]);
        assert!(matches!(
            LabelSpace::from_descriptor(duplicate),
            Err(LabelSpaceError::DuplicateTask(name)) if name == "color"
        ));

        let empty = LabelSpaceDescriptor::multi_task(vec![TaskDescriptor {
            name: "size".into(),
            labels: vec![],
        }]);
        assert!(matches!(
            LabelSpace::from_descriptor(empty),
            Err(LabelSpaceError::EmptyLabels { task: Some(task) }) if task == "size"
        ));

        assert!(matches!(
            LabelSpace::from_descriptor(LabelSpaceDescriptor::multi_task(vec![])),
            Err(LabelSpaceError::NoTasks)
        ));
    }

    #[test]
    fn loads_tasks_from_toml_in_file_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tasks.toml");
        fs::write(
            &path,
            r#"
[[tasks]]
name = "gender"
labels = ["male", "female", "unisex"]

[[tasks]]
name = "color"
labels = ["red", "blue"]
"#,
        )
        .unwrap();

        let descriptor = LabelSpaceDescriptor::load_from_path(&path).expect("load");
        let space = LabelSpace::from_descriptor(descriptor).expect("valid");
        let names: Vec<&str> = space.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["gender", "color"]);
        assert!(space.is_multi_task());
        assert!(space.accepts(&Label::text("red")).is_err());
    }

    #[test]
    fn loads_range_from_toml() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("range.toml");
        fs::write(&path, "range = [0.0, 1.0]\n").unwrap();

        let descriptor = LabelSpaceDescriptor::load_from_path(&path).expect("load");
        let space = LabelSpace::from_descriptor(descriptor).expect("valid");
        assert_eq!(
            space,
            LabelSpace::Regression(NumericRange::Float {
                min: 0.0,
                max: 1.0,
                step: DEFAULT_FLOAT_STEP
            })
        );
    }

    #[test]
    fn missing_task_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("missing.toml");
        let err = LabelSpaceDescriptor::load_from_path(&path).unwrap_err();
        assert!(matches!(err, LabelSpaceError::Read { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn labels_serialize_untagged() {
        let labels = vec![Label::text("yes"), Label::Int(3), Label::Float(0.5)];
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"["yes",3,0.5]"#);
    }
}
