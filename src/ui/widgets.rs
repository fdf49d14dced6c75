//! State for the value-entry widgets: dropdown, slider and text box.

use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::core::label_space::{Label, LabelSpace, NumericRange};
use crate::ui::controls::InputKind;

#[derive(Debug, Clone)]
pub struct DropdownState {
    pub items: Vec<String>,
    pub selected: usize,
}

impl DropdownState {
    pub fn new(items: Vec<String>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            if self.selected == 0 {
                self.selected = self.items.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn move_to_start(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_end(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }
}

/// A slider over a numeric range; the value is always `min + steps * step`.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderState {
    range: NumericRange,
    steps: u64,
    max_steps: u64,
}

impl SliderState {
    pub fn new(range: NumericRange) -> Self {
        let max_steps = match range {
            NumericRange::Int { min, max, step } => max.abs_diff(min) / step.unsigned_abs(),
            NumericRange::Float { min, max, step } => {
                // Tolerate float error so 0.0..1.0 by 0.1 still reaches 1.0.
                ((max - min) / step + 1e-9).floor() as u64
            }
        };
        Self {
            range,
            steps: 0,
            max_steps,
        }
    }

    pub fn range(&self) -> NumericRange {
        self.range
    }

    pub fn increase(&mut self, by: u64) {
        self.steps = self.steps.saturating_add(by).min(self.max_steps);
    }

    pub fn decrease(&mut self, by: u64) {
        self.steps = self.steps.saturating_sub(by);
    }

    pub fn to_min(&mut self) {
        self.steps = 0;
    }

    pub fn to_max(&mut self) {
        self.steps = self.max_steps;
    }

    /// Position within the range, for gauge rendering.
    pub fn ratio(&self) -> f64 {
        if self.max_steps == 0 {
            0.0
        } else {
            self.steps as f64 / self.max_steps as f64
        }
    }

    pub fn value(&self) -> Label {
        match self.range {
            NumericRange::Int { min, max, step } => {
                // Widened so ranges spanning more than i64::MAX stay exact.
                let value = i128::from(min) + i128::from(step) * i128::from(self.steps);
                Label::Int(value.min(i128::from(max)) as i64)
            }
            NumericRange::Float { min, max, step } => {
                let raw = (min + step * self.steps as f64).min(max);
                let rounded = (raw * 1e9).round() / 1e9;
                let value = if rounded.is_finite() { rounded } else { raw };
                Label::Float(value.clamp(min, max))
            }
        }
    }
}

/// The widget shown above the control rows, if any.
#[derive(Debug)]
pub enum InputWidget {
    None,
    Dropdown(DropdownState),
    Slider(SliderState),
    Text(Box<TextArea<'static>>),
}

impl InputWidget {
    pub fn for_layout(input: InputKind, space: &LabelSpace) -> Self {
        match (input, space) {
            (InputKind::Dropdown, LabelSpace::Classification(labels)) => {
                InputWidget::Dropdown(DropdownState::new(labels.clone()))
            }
            (InputKind::Slider, LabelSpace::Regression(range)) => {
                InputWidget::Slider(SliderState::new(*range))
            }
            (InputKind::TextBox, LabelSpace::FreeText) => InputWidget::Text(Box::new(new_text_box())),
            _ => InputWidget::None,
        }
    }

    /// The label the submit control records, if the widget holds one.
    pub fn value(&self) -> Option<Label> {
        match self {
            InputWidget::None => None,
            InputWidget::Dropdown(dropdown) => dropdown.selected_label().map(Label::text),
            InputWidget::Slider(slider) => Some(slider.value()),
            InputWidget::Text(textarea) => Some(Label::Text(textarea.lines().join("\n"))),
        }
    }

    /// Reset per-example input after a successful submit.
    pub fn after_submit(&mut self) {
        if let InputWidget::Text(textarea) = self {
            **textarea = new_text_box();
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, InputWidget::Text(_))
    }
}

fn new_text_box() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title("Caption (Enter to submit, Alt+Enter for new line)"),
    );
    textarea
}
