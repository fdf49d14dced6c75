//! Interactive state for one annotation run.
//!
//! [`AnnotatorApp`] owns the [`Session`] and the control layout, translates
//! key presses into control activations and keeps the status line. It has no
//! terminal dependency so the whole interaction can be driven from tests.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use tracing::{debug, info, warn};
use tui_textarea::Input as TAInput;

use crate::core::session::{Session, SessionError, Step};
use crate::ui::controls::{Control, ControlAction, ControlLayout, ControlOptions, InputKind};
use crate::ui::display::ExampleRenderer;
use crate::ui::widgets::InputWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLoopAction {
    Continue,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

pub struct AnnotatorApp {
    session: Session<String>,
    layout: ControlLayout,
    widget: InputWidget,
    focus: usize,
    status: Option<StatusMessage>,
    renderer: Box<dyn ExampleRenderer>,
    view: Vec<Line<'static>>,
}

impl AnnotatorApp {
    pub fn new(
        session: Session<String>,
        dropdown_threshold: usize,
        renderer: Box<dyn ExampleRenderer>,
    ) -> Self {
        let layout = ControlLayout::build(
            session.label_space(),
            ControlOptions {
                allow_skip: session.options().allow_skip,
                dropdown_threshold,
            },
        );
        let widget = InputWidget::for_layout(layout.input, session.label_space());
        let focus = layout.initial_focus();
        Self {
            session,
            layout,
            widget,
            focus,
            status: None,
            renderer,
            view: Vec::new(),
        }
    }

    /// Show the first example.
    pub fn start(&mut self) {
        info!(
            examples = self.session.len(),
            mode = %self.session.mode(),
            label_space = self.session.label_space().kind_name(),
            "annotation started"
        );
        let result = self.session.start();
        self.apply(result);
    }

    pub fn session(&self) -> &Session<String> {
        &self.session
    }

    pub fn into_session(self) -> Session<String> {
        self.session
    }

    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    pub fn widget(&self) -> &InputWidget {
        &self.widget
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Rendered lines for the example at the cursor.
    pub fn view(&self) -> &[Line<'static>] {
        &self.view
    }

    /// Whether `control` should currently be drawn highlighted.
    pub fn is_highlighted(&self, control: &Control) -> bool {
        match &control.action {
            ControlAction::Toggle { task, label } => self.session.is_selected(task, label),
            _ => false,
        }
    }

    /// Label controls stop accepting input once the session is done.
    pub fn is_enabled(&self, _control: &Control) -> bool {
        !self.session.is_done()
    }

    pub fn activate(&mut self, action: &ControlAction) {
        debug!(?action, "control activated");
        match action {
            ControlAction::Label(label) => {
                let result = self.session.record_single_label(label.clone());
                self.apply(result);
            }
            ControlAction::Toggle { task, label } => {
                match self.session.toggle_multi_label(task, label) {
                    Ok(_) => self.status = None,
                    Err(err) => self.reject(err),
                }
            }
            ControlAction::Submit => {
                let Some(label) = self.widget.value() else {
                    self.set_warning("nothing to submit");
                    return;
                };
                let result = self.session.record_single_label(label);
                if result.is_ok() {
                    self.widget.after_submit();
                }
                self.apply(result);
            }
            ControlAction::Skip => {
                let result = self.session.skip();
                self.apply(result);
            }
            ControlAction::Back => {
                let result = self.session.retreat();
                self.apply(result);
            }
            ControlAction::ClearCurrent => {
                let result = self.session.clear_current_and_advance();
                self.apply(result);
            }
            ControlAction::Done => {
                let result = self.session.finish_current();
                self.apply(result);
            }
        }
    }

    pub fn activate_focused(&mut self) {
        if let Some(action) = self.layout.get(self.focus).map(|c| c.action.clone()) {
            self.activate(&action);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyLoopAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return KeyLoopAction::Break;
        }

        match key.code {
            KeyCode::Esc => return KeyLoopAction::Break,
            KeyCode::Tab => {
                self.focus_next();
                return KeyLoopAction::Continue;
            }
            KeyCode::BackTab => {
                self.focus_previous();
                return KeyLoopAction::Continue;
            }
            _ => {}
        }

        if self.widget.is_text() && !self.session.is_done() {
            self.handle_text_key(key);
            return KeyLoopAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return KeyLoopAction::Break,
            KeyCode::Left => self.focus_previous(),
            KeyCode::Right => self.focus_next(),
            KeyCode::Up => self.nudge_widget_or_row(true),
            KeyCode::Down => self.nudge_widget_or_row(false),
            KeyCode::PageUp => self.nudge_slider(10, true),
            KeyCode::PageDown => self.nudge_slider(10, false),
            KeyCode::Home => self.jump_widget(true),
            KeyCode::End => self.jump_widget(false),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_focused(),
            KeyCode::Char('s') => self.activate(&ControlAction::Skip),
            KeyCode::Char('b') => self.activate(&ControlAction::Back),
            KeyCode::Char('c') if self.layout.input == InputKind::Toggles => {
                self.activate(&ControlAction::ClearCurrent)
            }
            KeyCode::Char('d') if self.layout.input == InputKind::Toggles => {
                self.activate(&ControlAction::Done)
            }
            KeyCode::Char(digit @ '1'..='9') => {
                let slot = digit as usize - '1' as usize;
                if let Some(action) = self.layout.hotkey_target(slot).map(|c| c.action.clone()) {
                    self.activate(&action);
                }
            }
            _ => {}
        }
        KeyLoopAction::Continue
    }

    /// Bracketed paste goes straight into the text box.
    pub fn handle_paste(&mut self, text: &str) {
        if let InputWidget::Text(textarea) = &mut self.widget {
            textarea.insert_str(text);
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Enter if alt => {
                if let InputWidget::Text(textarea) = &mut self.widget {
                    textarea.insert_newline();
                }
            }
            KeyCode::Enter => self.activate_focused(),
            KeyCode::Char('s') if ctrl => self.activate(&ControlAction::Skip),
            KeyCode::Char('b') if ctrl => self.activate(&ControlAction::Back),
            _ => {
                if let InputWidget::Text(textarea) = &mut self.widget {
                    textarea.input(TAInput::from(key));
                }
            }
        }
    }

    fn nudge_widget_or_row(&mut self, up: bool) {
        match &mut self.widget {
            InputWidget::Dropdown(dropdown) => {
                if up {
                    dropdown.move_up()
                } else {
                    dropdown.move_down()
                }
            }
            InputWidget::Slider(_) => self.nudge_slider(1, up),
            _ => self.focus_row(up),
        }
    }

    fn nudge_slider(&mut self, by: u64, up: bool) {
        if let InputWidget::Slider(slider) = &mut self.widget {
            if up {
                slider.increase(by)
            } else {
                slider.decrease(by)
            }
        }
    }

    fn jump_widget(&mut self, start: bool) {
        match &mut self.widget {
            InputWidget::Dropdown(dropdown) if start => dropdown.move_to_start(),
            InputWidget::Dropdown(dropdown) => dropdown.move_to_end(),
            InputWidget::Slider(slider) if start => slider.to_min(),
            InputWidget::Slider(slider) => slider.to_max(),
            _ => {}
        }
    }

    fn focus_next(&mut self) {
        let len = self.layout.len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    fn focus_previous(&mut self) {
        let len = self.layout.len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    fn focus_row(&mut self, up: bool) {
        let rows = self.layout.rows.len();
        if rows < 2 {
            return;
        }
        let row = self.layout.row_of(self.focus);
        let column = self.focus - self.layout.row_start(row);
        let target = if up {
            (row + rows - 1) % rows
        } else {
            (row + 1) % rows
        };
        let width = self.layout.rows[target].controls.len();
        self.focus = self.layout.row_start(target) + column.min(width.saturating_sub(1));
    }

    fn apply(&mut self, result: Result<Step<String>, SessionError>) {
        match result {
            Ok(Step::Show { example, .. }) => {
                self.view = self.renderer.render(&example);
                self.status = None;
            }
            Ok(Step::Done) => {
                self.view.clear();
                info!(progress = %self.session.progress(), "annotation done");
                self.set_info("Annotation done.");
            }
            Ok(Step::Empty) => {
                self.view.clear();
                self.set_info("No examples to annotate.");
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: SessionError) {
        if err.is_benign() {
            debug!(%err, "operation rejected");
        } else {
            warn!(%err, "operation rejected");
        }
        self.set_warning(err.to_string());
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    fn set_warning(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Warning,
            text: text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::label_space::{Label, LabelSpace, NumericRange, Task};
    use crate::core::session::{Cursor, SessionOptions};
    use crate::ui::display::PlainRenderer;
    use crate::utils::test_utils::{create_test_examples, key, key_with};

    fn app(space: LabelSpace, items: &[&str]) -> AnnotatorApp {
        let session = Session::new(create_test_examples(items), space, SessionOptions::default());
        let mut app = AnnotatorApp::new(session, 5, Box::new(PlainRenderer));
        app.start();
        app
    }

    fn app_with_text(items: &[&str]) -> AnnotatorApp {
        app(LabelSpace::FreeText, items)
    }

    fn tagging(items: &[&str]) -> AnnotatorApp {
        app(
            LabelSpace::MultiTask(vec![Task {
                name: "color".into(),
                labels: vec!["red".into(), "blue".into()],
            }]),
            items,
        )
    }

    #[test]
    fn digit_hotkeys_record_labels() {
        let mut app = app(
            LabelSpace::Classification(vec!["yes".into(), "no".into()]),
            &["a", "b", "c"],
        );
        assert_eq!(app.view()[0].to_string(), "a");

        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('2')));

        assert!(app.session().is_done());
        assert_eq!(
            app.session().single_result(),
            vec![
                (&"a".to_string(), &Label::text("yes")),
                (&"c".to_string(), &Label::text("no"))
            ]
        );
        assert_eq!(app.status().map(|s| s.text.as_str()), Some("Annotation done."));
    }

    #[test]
    fn back_at_start_shows_notice_and_keeps_state() {
        let mut app = tagging(&["x", "y"]);
        app.handle_key(key(KeyCode::Char('b')));
        let status = app.status().expect("status");
        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(status.text, "cannot go back");
        assert_eq!(app.session().cursor(), Cursor::Active(0));
    }

    #[test]
    fn toggles_highlight_and_clear_on_navigation() {
        let mut app = tagging(&["x", "y"]);
        let red = app.layout().get(0).cloned().unwrap();

        app.activate_focused();
        assert!(app.is_highlighted(&red));

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.session().current().map(String::as_str), Some("y"));
        assert!(!app.is_highlighted(&red));

        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.session().current().map(String::as_str), Some("x"));
        assert!(!app.is_highlighted(&red));
        assert!(app.session().multi_result().unwrap().is_empty());
    }

    #[test]
    fn clear_current_drops_entry_and_advances() {
        let mut app = tagging(&["x", "y"]);
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.session().current().map(String::as_str), Some("y"));
        assert!(app.session().multi_result().unwrap().is_empty());
    }

    #[test]
    fn focus_moves_between_rows() {
        let mut app = tagging(&["x"]);
        assert_eq!(app.focus(), 0);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.layout().get(app.focus()).unwrap().caption, "done");
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.layout().get(app.focus()).unwrap().caption, "back");
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.layout().get(app.focus()).unwrap().caption, "blue");
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus(), 0);
    }

    #[test]
    fn slider_submit_records_value() {
        let mut app = app(
            LabelSpace::Regression(NumericRange::Int {
                min: 1,
                max: 5,
                step: 1,
            }),
            &["a"],
        );
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.session().single_result(),
            vec![(&"a".to_string(), &Label::Int(3))]
        );
    }

    #[test]
    fn dropdown_submit_records_selection() {
        let labels: Vec<String> = (0..7).map(|i| format!("class-{i}")).collect();
        let mut app = app(LabelSpace::Classification(labels), &["a"]);
        assert!(matches!(app.widget(), InputWidget::Dropdown(_)));
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.session().single_result(),
            vec![(&"a".to_string(), &Label::text("class-6"))]
        );
    }

    #[test]
    fn text_mode_types_hotkey_letters() {
        let mut app = app(LabelSpace::FreeText, &["a", "b"]);
        for ch in "sbc".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key_with(KeyCode::Enter, KeyModifiers::ALT));
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(
            app.session().single_result(),
            vec![(&"a".to_string(), &Label::text("sbc\nd"))]
        );
        assert_eq!(app.widget().value(), Some(Label::text("")));

        app.handle_key(key_with(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert_eq!(app.session().current().map(String::as_str), Some("a"));
        assert!(app.session().single_result().is_empty());
    }

    #[test]
    fn paste_lands_in_text_box() {
        let mut app = app(LabelSpace::FreeText, &["a"]);
        app.handle_paste("pasted caption");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.session().single_result(),
            vec![(&"a".to_string(), &Label::text("pasted caption"))]
        );
    }

    #[test]
    fn quitting_keys() {
        let mut app = tagging(&["x"]);
        assert_eq!(
            app.handle_key(key_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyLoopAction::Break
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), KeyLoopAction::Break);
        assert_eq!(app.handle_key(key(KeyCode::Char('d'))), KeyLoopAction::Continue);
        assert!(app.session().is_done());
        assert_eq!(app.handle_key(key(KeyCode::Esc)), KeyLoopAction::Break);

        let mut captions = app_with_text(&["a"]);
        assert_eq!(captions.handle_key(key(KeyCode::Char('q'))), KeyLoopAction::Continue);
    }

    #[test]
    fn labels_after_done_are_rejected() {
        let mut app = app(
            LabelSpace::Classification(vec!["yes".into()]),
            &["a"],
        );
        app.handle_key(key(KeyCode::Char('1')));
        assert!(app.session().is_done());
        let control = app.layout().get(0).cloned().unwrap();
        assert!(!app.is_enabled(&control));

        app.activate(&control.action);
        assert_eq!(app.session().single_result().len(), 1);
        assert_eq!(app.status().map(|s| s.text.as_str()), Some("annotation done"));
    }

    #[test]
    fn empty_session_reports_no_examples() {
        let app = app(LabelSpace::Classification(vec!["yes".into()]), &[]);
        assert!(app.session().is_done());
        assert_eq!(
            app.status().map(|s| s.text.as_str()),
            Some("No examples to annotate.")
        );
    }
}
