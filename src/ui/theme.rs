use crate::core::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Chrome
    pub title_style: Style,
    pub progress_style: Style,
    pub border_style: Style,
    pub help_style: Style,

    // Example pane
    pub example_text_style: Style,
    pub example_meta_style: Style,

    // Controls
    pub control_style: Style,
    pub control_focus_style: Style,
    pub control_selected_style: Style,
    pub control_disabled_style: Style,
    pub row_title_style: Style,

    // Status line
    pub status_info_style: Style,
    pub status_warning_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,

            title_style: Style::default().fg(Color::Gray),
            progress_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Gray),
            help_style: Style::default().fg(Color::DarkGray),

            example_text_style: Style::default().fg(Color::White),
            example_meta_style: Style::default().fg(Color::DarkGray),

            control_style: Style::default().fg(Color::White).bg(Color::DarkGray),
            control_focus_style: Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
            // Matches the "lightgreen" toggle highlight.
            control_selected_style: Style::default().fg(Color::Black).bg(Color::LightGreen),
            control_disabled_style: Style::default().fg(Color::DarkGray),
            row_title_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),

            status_info_style: Style::default().fg(Color::Green),
            status_warning_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,

            title_style: Style::default().fg(Color::DarkGray),
            progress_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Black),
            help_style: Style::default().fg(Color::Gray),

            example_text_style: Style::default().fg(Color::Black),
            example_meta_style: Style::default().fg(Color::Gray),

            control_style: Style::default().fg(Color::Black).bg(Color::Gray),
            control_focus_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
            control_selected_style: Style::default().fg(Color::Black).bg(Color::LightGreen),
            control_disabled_style: Style::default().fg(Color::Gray),
            row_title_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),

            status_info_style: Style::default().fg(Color::Green),
            status_warning_style: Style::default().fg(Color::Red),
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark_default(),
            ThemeName::Light => Self::light(),
        }
    }
}
