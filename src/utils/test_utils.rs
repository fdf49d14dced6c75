#[cfg(test)]
use crate::core::label_space::{LabelSpace, Task};
#[cfg(test)]
use crate::core::session::{Session, SessionOptions};
#[cfg(test)]
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[cfg(test)]
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[cfg(test)]
pub fn create_test_examples(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A color/size tagging session over the given examples.
#[cfg(test)]
pub fn create_tagging_session(items: &[&str]) -> Session<String> {
    let space = LabelSpace::MultiTask(vec![
        Task {
            name: "color".into(),
            labels: vec!["red".into(), "blue".into()],
        },
        Task {
            name: "size".into(),
            labels: vec!["small".into(), "large".into()],
        },
    ]);
    Session::new(create_test_examples(items), space, SessionOptions::default())
}
