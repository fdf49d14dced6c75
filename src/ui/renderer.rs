use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::session::Mode;
use crate::ui::app::{AnnotatorApp, StatusKind};
use crate::ui::controls::{ControlRow, InputKind};
use crate::ui::theme::Theme;
use crate::ui::widgets::InputWidget;

/// Tallest the dropdown list grows before it scrolls.
const MAX_DROPDOWN_ROWS: u16 = 8;
const TEXT_BOX_HEIGHT: u16 = 5;

pub fn ui(f: &mut Frame, app: &AnnotatorApp, theme: &Theme) {
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let header_height = match app.session().mode() {
        Mode::SingleTask => 1,
        Mode::MultiTask => 2,
    };
    let controls_height: u16 = app
        .layout()
        .rows
        .iter()
        .map(|row| if row.title.is_some() { 2 } else { 1 })
        .sum();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(widget_height(app.widget())),
            Constraint::Length(controls_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, theme, chunks[0]);
    render_example(f, app, theme, chunks[1]);
    render_widget(f, app, theme, chunks[2]);
    render_controls(f, app, theme, chunks[3]);
    render_status(f, app, theme, chunks[4]);

    f.render_widget(
        Paragraph::new(help_text(app.layout().input)).style(theme.help_style),
        chunks[5],
    );
}

fn widget_height(widget: &InputWidget) -> u16 {
    match widget {
        InputWidget::None => 0,
        InputWidget::Dropdown(dropdown) => {
            (dropdown.items.len() as u16).min(MAX_DROPDOWN_ROWS) + 2
        }
        InputWidget::Slider(_) => 3,
        InputWidget::Text(_) => TEXT_BOX_HEIGHT,
    }
}

fn render_header(f: &mut Frame, app: &AnnotatorApp, theme: &Theme, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("Perch v{} • ", env!("CARGO_PKG_VERSION")),
            theme.title_style,
        ),
        Span::styled(app.session().progress().to_string(), theme.progress_style),
    ])];
    if app.session().mode() == Mode::MultiTask {
        let name = app.session().current().map(String::as_str).unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled("Asset name: ", theme.title_style),
            Span::styled(name.to_string(), theme.example_meta_style),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_example(f: &mut Frame, app: &AnnotatorApp, theme: &Theme, area: Rect) {
    let title = match app.session().current_index() {
        Some(index) => format!("Example {} of {}", index + 1, app.session().len()),
        None => "Example".to_string(),
    };
    let paragraph = Paragraph::new(app.view().to_vec())
        .style(theme.example_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style)
                .title(title),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_widget(f: &mut Frame, app: &AnnotatorApp, theme: &Theme, area: Rect) {
    if area.height == 0 {
        return;
    }
    match app.widget() {
        InputWidget::None => {}
        InputWidget::Dropdown(dropdown) => {
            let items: Vec<ListItem> = dropdown
                .items
                .iter()
                .map(|label| ListItem::new(label.as_str()))
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.border_style)
                        .title("Label (↑/↓ to choose)"),
                )
                .style(theme.control_style)
                .highlight_style(theme.control_focus_style)
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(dropdown.selected));
            f.render_stateful_widget(list, area, &mut state);
        }
        InputWidget::Slider(slider) => {
            let gauge = Gauge::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.border_style)
                        .title("Value (↑/↓ to adjust, PgUp/PgDn for larger steps)"),
                )
                .gauge_style(theme.progress_style)
                .ratio(slider.ratio().clamp(0.0, 1.0))
                .label(slider.value().to_string());
            f.render_widget(gauge, area);
        }
        InputWidget::Text(textarea) => {
            f.render_widget(&**textarea, area);
        }
    }
}

fn render_controls(f: &mut Frame, app: &AnnotatorApp, theme: &Theme, area: Rect) {
    let mut lines = Vec::new();
    let mut index = 0;
    let mut slot = 0;
    for row in &app.layout().rows {
        if let Some(title) = &row.title {
            lines.push(Line::from(Span::styled(title.clone(), theme.row_title_style)));
        }
        lines.push(control_line(app, theme, row, &mut index, &mut slot));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn control_line(
    app: &AnnotatorApp,
    theme: &Theme,
    row: &ControlRow,
    index: &mut usize,
    slot: &mut usize,
) -> Line<'static> {
    let mut spans = Vec::new();
    for control in &row.controls {
        let caption = if control.action.has_hotkey_slot() && *slot < 9 {
            *slot += 1;
            format!(" {} {} ", slot, control.display_caption())
        } else {
            format!(" {} ", control.display_caption())
        };

        let style = if *index == app.focus() {
            theme.control_focus_style
        } else if app.is_highlighted(control) {
            theme.control_selected_style
        } else if !app.is_enabled(control) && control.action.has_hotkey_slot() {
            theme.control_disabled_style
        } else {
            theme.control_style
        };

        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(caption, style));
        *index += 1;
    }
    Line::from(spans)
}

fn render_status(f: &mut Frame, app: &AnnotatorApp, theme: &Theme, area: Rect) {
    let Some(status) = app.status() else {
        return;
    };
    let style = match status.kind {
        StatusKind::Info => theme.status_info_style,
        StatusKind::Warning => theme.status_warning_style,
    };
    f.render_widget(Paragraph::new(status.text.clone()).style(style), area);
}

fn help_text(input: InputKind) -> &'static str {
    match input {
        InputKind::Buttons => "1-9 label • ←/→ focus • Enter select • s skip • b back • Esc quit",
        InputKind::Dropdown | InputKind::Slider => {
            "↑/↓ adjust • ←/→ focus • Enter select • s skip • b back • Esc quit"
        }
        InputKind::TextBox => "Enter submit • Ctrl+S skip • Ctrl+B back • Tab focus • Esc quit",
        InputKind::Toggles => {
            "1-9 toggle • arrows focus • Enter select • d done • c clear • s skip • b back • Esc quit"
        }
    }
}
