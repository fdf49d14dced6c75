//! The annotation session: cursor, examples and accumulated labels.
//!
//! A [`Session`] is created once per run and driven by the UI layer. It never
//! renders anything itself; every operation returns what should be shown next.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::core::label_space::{Label, LabelRejection, LabelSpace};


/// Position of the cursor over the example list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Cursor at -1, before `start()`.
    NotStarted,
    Active(usize),
    /// Cursor at `len`; terminal.
    Done,
}

/// What the UI should display after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<E> {
    Show { index: usize, example: E },
    Done,
    /// The session was started with no examples.
    Empty,
}

/// Result of toggling a label in multi-task mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SingleTask,
    MultiTask,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::SingleTask => write!(f, "single-task"),
            Mode::MultiTask => write!(f, "multi-task"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub annotated: usize,
    pub remaining: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} examples annotated, {} examples left",
            self.annotated, self.remaining
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Whether `skip()` is offered (single-task mode).
    pub allow_skip: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { allow_skip: true }
    }
}

/// One recorded single-task label.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleLabel<E> {
    /// Cursor position the label was recorded at.
    pub position: usize,
    pub example: E,
    pub label: Label,
}

/// Labels selected per task for one example, in selection order.
pub type TaskSelections = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Annotations<E: Eq + Hash> {
    Single(Vec<SingleLabel<E>>),
    Multi(HashMap<E, TaskSelections>),
}

impl<E: Eq + Hash> Annotations<E> {
    pub fn len(&self) -> usize {
        match self {
            Annotations::Single(records) => records.len(),
            Annotations::Multi(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Retreat requested at (or before) the first example. Benign.
    CannotGoBack,
    NotStarted,
    AlreadyStarted,
    /// The session reached its terminal state.
    Finished,
    WrongMode { expected: Mode, actual: Mode },
    SkipDisabled,
    UnknownTask(String),
    UnknownLabel { task: String, label: String },
    InvalidLabel { label: String, reason: LabelRejection },
}

impl SessionError {
    /// Errors the user can trigger by pressing the wrong control.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            SessionError::CannotGoBack | SessionError::SkipDisabled | SessionError::InvalidLabel { .. }
        )
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::CannotGoBack => write!(f, "cannot go back"),
            SessionError::NotStarted => write!(f, "annotation has not started"),
            SessionError::AlreadyStarted => write!(f, "annotation already started"),
            SessionError::Finished => write!(f, "annotation done"),
            SessionError::WrongMode { expected, actual } => {
                write!(f, "operation needs a {expected} session, this one is {actual}")
            }
            SessionError::SkipDisabled => write!(f, "skipping is disabled"),
            SessionError::UnknownTask(task) => write!(f, "unknown task '{task}'"),
            SessionError::UnknownLabel { task, label } => {
                write!(f, "task '{task}' has no label '{label}'")
            }
            SessionError::InvalidLabel { label, reason } => {
                write!(f, "label '{label}' rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for SessionError {}

pub struct Session<E: Eq + Hash> {
    examples: Vec<E>,
    label_space: LabelSpace,
    options: SessionOptions,
    cursor: Cursor,
    annotations: Annotations<E>,
}

impl<E: Clone + Eq + Hash> Session<E> {
    pub fn new(examples: Vec<E>, label_space: LabelSpace, options: SessionOptions) -> Self {
        let annotations = if label_space.is_multi_task() {
            Annotations::Multi(HashMap::new())
        } else {
            Annotations::Single(Vec::new())
        };
        Self {
            examples,
            label_space,
            options,
            cursor: Cursor::NotStarted,
            annotations,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.annotations {
            Annotations::Single(_) => Mode::SingleTask,
            Annotations::Multi(_) => Mode::MultiTask,
        }
    }

    pub fn label_space(&self) -> &LabelSpace {
        &self.label_space
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn examples(&self) -> &[E] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_done(&self) -> bool {
        self.cursor == Cursor::Done
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::Active(index) => Some(index),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&E> {
        self.current_index().map(|index| &self.examples[index])
    }

    pub fn annotations(&self) -> &Annotations<E> {
        &self.annotations
    }

    /// Recorded `(example, label)` pairs in single-task mode.
    pub fn single_result(&self) -> Vec<(&E, &Label)> {
        match &self.annotations {
            Annotations::Single(records) => records
                .iter()
                .map(|record| (&record.example, &record.label))
                .collect(),
            Annotations::Multi(_) => Vec::new(),
        }
    }

    pub fn multi_result(&self) -> Option<&HashMap<E, TaskSelections>> {
        match &self.annotations {
            Annotations::Multi(entries) => Some(entries),
            Annotations::Single(_) => None,
        }
    }

    /// Labels currently selected under `task` for the example at the cursor.
    pub fn selected(&self, task: &str) -> &[String] {
        let (Some(example), Annotations::Multi(entries)) = (self.current(), &self.annotations)
        else {
            return &[];
        };
        entries
            .get(example)
            .and_then(|tasks| tasks.get(task))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_selected(&self, task: &str, label: &str) -> bool {
        self.selected(task).iter().any(|selected| selected == label)
    }

    pub fn progress(&self) -> Progress {
        let len = self.examples.len();
        let remaining = match self.cursor {
            Cursor::NotStarted => len,
            Cursor::Active(index) => len - index,
            Cursor::Done => 0,
        };
        Progress {
            annotated: self.annotations.len(),
            remaining,
        }
    }

    pub fn start(&mut self) -> Result<Step<E>, SessionError> {
        if self.cursor != Cursor::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        self.move_to(0)
    }

    pub fn advance(&mut self) -> Result<Step<E>, SessionError> {
        let next = match self.cursor {
            Cursor::NotStarted => 0,
            Cursor::Active(index) => index + 1,
            Cursor::Done => return Err(SessionError::Finished),
        };
        self.move_to(next)
    }

    pub fn retreat(&mut self) -> Result<Step<E>, SessionError> {
        let previous = match self.cursor {
            Cursor::NotStarted | Cursor::Active(0) => return Err(SessionError::CannotGoBack),
            Cursor::Active(index) => index - 1,
            Cursor::Done => return Err(SessionError::Finished),
        };
        self.clear_at(previous);
        self.move_to(previous)
    }

    pub fn skip(&mut self) -> Result<Step<E>, SessionError> {
        if self.mode() == Mode::SingleTask && !self.options.allow_skip {
            return Err(SessionError::SkipDisabled);
        }
        self.active_index()?;
        self.advance()
    }

    /// Accept the current multi-task selection and move on.
    pub fn finish_current(&mut self) -> Result<Step<E>, SessionError> {
        self.require_mode(Mode::MultiTask)?;
        self.active_index()?;
        self.advance()
    }

    pub fn record_single_label(&mut self, label: Label) -> Result<Step<E>, SessionError> {
        self.require_mode(Mode::SingleTask)?;
        let position = self.active_index()?;
        self.label_space
            .accepts(&label)
            .map_err(|reason| SessionError::InvalidLabel {
                label: label.to_string(),
                reason,
            })?;

        let example = self.examples[position].clone();
        if let Annotations::Single(records) = &mut self.annotations {
            records.push(SingleLabel {
                position,
                example,
                label,
            });
        }
        debug!(position, "recorded label");
        self.advance()
    }

    pub fn toggle_multi_label(&mut self, task: &str, label: &str) -> Result<Toggle, SessionError> {
        self.require_mode(Mode::MultiTask)?;
        let position = self.active_index()?;
        let known = self
            .label_space
            .task(task)
            .ok_or_else(|| SessionError::UnknownTask(task.to_string()))?;
        if !known.labels.iter().any(|candidate| candidate == label) {
            return Err(SessionError::UnknownLabel {
                task: task.to_string(),
                label: label.to_string(),
            });
        }

        let example = &self.examples[position];
        let Annotations::Multi(entries) = &mut self.annotations else {
            return Err(SessionError::WrongMode {
                expected: Mode::MultiTask,
                actual: Mode::SingleTask,
            });
        };

        let toggle = match entries.get_mut(example) {
            Some(tasks) => {
                let selected = tasks.entry(task.to_string()).or_default();
                let toggle =
                    if let Some(found) = selected.iter().position(|existing| existing == label) {
                        selected.remove(found);
                        Toggle::Removed
                    } else {
                        selected.push(label.to_string());
                        Toggle::Added
                    };
                if selected.is_empty() {
                    tasks.remove(task);
                }
                if tasks.is_empty() {
                    entries.remove(example);
                }
                toggle
            }
            None => {
                let mut tasks = TaskSelections::new();
                tasks.insert(task.to_string(), vec![label.to_string()]);
                entries.insert(example.clone(), tasks);
                Toggle::Added
            }
        };
        debug!(position, task, label, ?toggle, "toggled label");
        Ok(toggle)
    }

    pub fn clear_current_and_advance(&mut self) -> Result<Step<E>, SessionError> {
        let position = self.active_index()?;
        self.clear_at(position);
        self.advance()
    }

    fn active_index(&self) -> Result<usize, SessionError> {
        match self.cursor {
            Cursor::Active(index) => Ok(index),
            Cursor::NotStarted => Err(SessionError::NotStarted),
            Cursor::Done => Err(SessionError::Finished),
        }
    }

    fn require_mode(&self, expected: Mode) -> Result<(), SessionError> {
        let actual = self.mode();
        if actual == expected {
            Ok(())
        } else {
            Err(SessionError::WrongMode { expected, actual })
        }
    }

    fn clear_at(&mut self, position: usize) {
        let removed = match &mut self.annotations {
            Annotations::Single(records) => {
                let before = records.len();
                records.retain(|record| record.position != position);
                before != records.len()
            }
            Annotations::Multi(entries) => entries.remove(&self.examples[position]).is_some(),
        };
        if removed {
            debug!(position, "cleared annotation");
        }
    }

    fn move_to(&mut self, index: usize) -> Result<Step<E>, SessionError> {
        let len = self.examples.len();
        if index >= len {
            self.cursor = Cursor::Done;
            debug!(annotated = self.annotations.len(), "annotation done");
            return Ok(if len == 0 { Step::Empty } else { Step::Done });
        }
        self.cursor = Cursor::Active(index);
        debug!(index, len, "showing example");
        Ok(Step::Show {
            index,
            example: self.examples[index].clone(),
        })
    }
}
