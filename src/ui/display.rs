//! Turning an example into the lines shown in the example pane.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ratatui::text::Line;

use crate::core::config::DisplayMode;
use crate::core::constants::FILE_PREVIEW_LINES;

pub trait ExampleRenderer {
    fn render(&self, example: &str) -> Vec<Line<'static>>;
}

/// Shows the example text as-is.
pub struct PlainRenderer;

impl ExampleRenderer for PlainRenderer {
    fn render(&self, example: &str) -> Vec<Line<'static>> {
        example
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect()
    }
}

/// Treats the example as a path and shows the head of the file. Examples that
/// are not readable text files fall back to plain rendering.
pub struct FilePreviewRenderer {
    pub max_lines: usize,
}

impl Default for FilePreviewRenderer {
    fn default() -> Self {
        Self {
            max_lines: FILE_PREVIEW_LINES,
        }
    }
}

impl ExampleRenderer for FilePreviewRenderer {
    fn render(&self, example: &str) -> Vec<Line<'static>> {
        let path = Path::new(example);
        if !path.is_file() {
            return PlainRenderer.render(example);
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => return vec![Line::from(format!("{example}: {err}"))],
        };

        let mut lines = Vec::new();
        for line in BufReader::new(file).lines().take(self.max_lines) {
            match line {
                Ok(text) => lines.push(Line::from(text)),
                Err(_) => {
                    let size = path.metadata().map(|meta| meta.len()).unwrap_or(0);
                    return vec![Line::from(format!("{example} (binary file, {size} bytes)"))];
                }
            }
        }
        lines
    }
}

pub fn renderer_for(mode: DisplayMode) -> Box<dyn ExampleRenderer> {
    match mode {
        DisplayMode::Plain => Box::new(PlainRenderer),
        DisplayMode::File => Box::new(FilePreviewRenderer::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn text(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn plain_renderer_splits_lines() {
        assert_eq!(text(&PlainRenderer.render("one\ntwo")), ["one", "two"]);
    }

    #[test]
    fn file_preview_reads_the_head_of_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("review.txt");
        fs::write(&path, "first\nsecond\nthird\n").unwrap();

        let renderer = FilePreviewRenderer { max_lines: 2 };
        let rendered = renderer.render(path.to_str().unwrap());
        assert_eq!(text(&rendered), ["first", "second"]);
    }

    #[test]
    fn file_preview_falls_back_for_non_paths() {
        let renderer = FilePreviewRenderer::default();
        assert_eq!(text(&renderer.render("just words")), ["just words"]);
    }

    #[test]
    fn file_preview_summarizes_binary_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image.png");
        fs::write(&path, [0x89, 0x50, 0xff, 0xfe, 0x00]).unwrap();

        let rendered = FilePreviewRenderer::default().render(path.to_str().unwrap());
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].to_string().contains("binary file, 5 bytes"));
    }
}
