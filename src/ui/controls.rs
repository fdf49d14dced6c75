//! Per-control records built once from the label space.
//!
//! Every control carries the action it triggers. The event loop hands that
//! record to [`crate::ui::app::AnnotatorApp::activate`], so no handler ever
//! has to capture the label or task it belongs to.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::core::label_space::{Label, LabelSpace};

/// Longest caption shown on a button before it is truncated.
const MAX_CAPTION_WIDTH: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Record this classification label and advance.
    Label(Label),
    /// Toggle a label under a task for the current example.
    Toggle { task: String, label: String },
    /// Record the value held by the input widget.
    Submit,
    Skip,
    Back,
    ClearCurrent,
    /// Accept the current multi-task selection.
    Done,
}

impl ControlAction {
    /// Whether pressing a digit key may trigger this control.
    pub fn has_hotkey_slot(&self) -> bool {
        matches!(self, ControlAction::Label(_) | ControlAction::Toggle { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub action: ControlAction,
    pub caption: String,
}

impl Control {
    fn new(action: ControlAction, caption: impl Into<String>) -> Self {
        Self {
            action,
            caption: caption.into(),
        }
    }

    /// The caption trimmed to the button width budget.
    pub fn display_caption(&self) -> String {
        truncate_to_width(&self.caption, MAX_CAPTION_WIDTH)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlRow {
    /// Task name shown above a row of toggles.
    pub title: Option<String>,
    pub controls: Vec<Control>,
}

/// Which value-entry widget sits above the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Buttons,
    Dropdown,
    Slider,
    TextBox,
    Toggles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlOptions {
    pub allow_skip: bool,
    pub dropdown_threshold: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlLayout {
    pub input: InputKind,
    pub rows: Vec<ControlRow>,
}

impl ControlLayout {
    pub fn build(space: &LabelSpace, options: ControlOptions) -> Self {
        let mut nav = Vec::new();
        let (input, mut rows) = match space {
            LabelSpace::Classification(labels) if labels.len() > options.dropdown_threshold => {
                nav.push(Control::new(ControlAction::Submit, "submit"));
                (InputKind::Dropdown, Vec::new())
            }
            LabelSpace::Classification(labels) => {
                nav.extend(labels.iter().map(|label| {
                    Control::new(ControlAction::Label(Label::text(label.clone())), label.clone())
                }));
                (InputKind::Buttons, Vec::new())
            }
            LabelSpace::Regression(_) => {
                nav.push(Control::new(ControlAction::Submit, "submit"));
                (InputKind::Slider, Vec::new())
            }
            LabelSpace::FreeText => {
                nav.push(Control::new(ControlAction::Submit, "submit"));
                (InputKind::TextBox, Vec::new())
            }
            LabelSpace::MultiTask(tasks) => {
                let rows = tasks
                    .iter()
                    .map(|task| ControlRow {
                        title: Some(task.name.clone()),
                        controls: task
                            .labels
                            .iter()
                            .map(|label| {
                                Control::new(
                                    ControlAction::Toggle {
                                        task: task.name.clone(),
                                        label: label.clone(),
                                    },
                                    label.clone(),
                                )
                            })
                            .collect(),
                    })
                    .collect();
                nav.push(Control::new(ControlAction::Done, "done"));
                nav.push(Control::new(ControlAction::Back, "back"));
                nav.push(Control::new(ControlAction::ClearCurrent, "clear current"));
                nav.push(Control::new(ControlAction::Skip, "skip"));
                (InputKind::Toggles, rows)
            }
        };

        if input != InputKind::Toggles {
            if options.allow_skip {
                nav.push(Control::new(ControlAction::Skip, "skip"));
            }
            nav.push(Control::new(ControlAction::Back, "back"));
        }
        rows.push(ControlRow {
            title: None,
            controls: nav,
        });

        Self { input, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(|row| row.controls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Controls in focus order (row by row).
    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.rows.iter().flat_map(|row| row.controls.iter())
    }

    pub fn get(&self, index: usize) -> Option<&Control> {
        self.iter().nth(index)
    }

    /// Flat index of the first control in `row`.
    pub fn row_start(&self, row: usize) -> usize {
        self.rows
            .iter()
            .take(row)
            .map(|row| row.controls.len())
            .sum()
    }

    /// Row containing the control at flat `index`.
    pub fn row_of(&self, index: usize) -> usize {
        let mut start = 0;
        for (row, controls) in self.rows.iter().enumerate() {
            let end = start + controls.controls.len();
            if index < end {
                return row;
            }
            start = end;
        }
        self.rows.len().saturating_sub(1)
    }

    /// The n-th (0-based) label or toggle control, for digit hotkeys.
    pub fn hotkey_target(&self, slot: usize) -> Option<&Control> {
        self.iter()
            .filter(|control| control.action.has_hotkey_slot())
            .nth(slot)
    }

    /// Where focus starts: the first control of the last (navigation) row for
    /// widget-driven layouts, otherwise the very first control.
    pub fn initial_focus(&self) -> usize {
        match self.input {
            InputKind::Dropdown | InputKind::Slider | InputKind::TextBox => {
                self.row_start(self.rows.len().saturating_sub(1))
            }
            InputKind::Buttons | InputKind::Toggles => 0,
        }
    }
}

pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}
