//! Serializing session results and writing them out.
//!
//! Single-task results become a JSON array of `[example, label]` pairs in the
//! order they were recorded. Multi-task results become an object keyed by
//! example (in example order) whose values map task name to labels (in task
//! order).

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::core::config::data::path_display;
use crate::core::label_space::Label;
use crate::core::session::{Annotations, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => OutputTarget::File(path.to_path_buf()),
            _ => OutputTarget::Stdout,
        }
    }
}

struct Pair<'a, E>(&'a E, &'a Label);

impl<E: Serialize> Serialize for Pair<'_, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.0, self.1).serialize(serializer)
    }
}

struct OrderedMap<K, V>(Vec<(K, V)>);

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Render the session's annotations as pretty-printed JSON.
pub fn annotations_to_json<E>(session: &Session<E>) -> Result<String, serde_json::Error>
where
    E: Serialize + Clone + Eq + Hash,
{
    match session.annotations() {
        Annotations::Single(records) => {
            let pairs: Vec<Pair<'_, E>> = records
                .iter()
                .map(|record| Pair(&record.example, &record.label))
                .collect();
            serde_json::to_string_pretty(&pairs)
        }
        Annotations::Multi(entries) => {
            let tasks = session.label_space().tasks();
            let mut seen = HashSet::new();
            let mut ordered = Vec::with_capacity(entries.len());
            for example in session.examples() {
                if !seen.insert(example) {
                    continue;
                }
                let Some(selections) = entries.get(example) else {
                    continue;
                };
                let per_task: Vec<(&str, &[String])> = tasks
                    .iter()
                    .filter_map(|task| {
                        selections
                            .get(&task.name)
                            .map(|labels| (task.name.as_str(), labels.as_slice()))
                    })
                    .collect();
                ordered.push((example, OrderedMap(per_task)));
            }
            serde_json::to_string_pretty(&OrderedMap(ordered))
        }
    }
}

/// Write `json` to the target. Files are replaced atomically.
pub fn write_output(json: &str, target: &OutputTarget) -> Result<(), OutputError> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").map_err(OutputError::Stdout)?;
            stdout.flush().map_err(OutputError::Stdout)
        }
        OutputTarget::File(path) => write_file(json, path),
    }
}

fn write_file(json: &str, path: &Path) -> Result<(), OutputError> {
    let write_err = |source: io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new_in("."),
    }
    .map_err(write_err)?;

    writeln!(temp_file, "{json}").map_err(write_err)?;
    temp_file.as_file_mut().sync_all().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|err| write_err(err.error))?;
    Ok(())
}

#[derive(Debug)]
pub enum OutputError {
    Serialize(serde_json::Error),
    Stdout(io::Error),
    Write { path: PathBuf, source: io::Error },
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::Serialize(err)
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Serialize(source) => write!(f, "Failed to serialize annotations: {source}"),
            OutputError::Stdout(source) => write!(f, "Failed to write annotations: {source}"),
            OutputError::Write { path, source } => write!(
                f,
                "Failed to write annotations to {}: {}",
                path_display(path),
                source
            ),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Serialize(source) => Some(source),
            OutputError::Stdout(source) => Some(source),
            OutputError::Write { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::label_space::{LabelSpace, LabelSpaceDescriptor, TaskDescriptor};
    use crate::core::session::SessionOptions;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn tagging_session() -> Session<String> {
        let space = LabelSpace::from_descriptor(LabelSpaceDescriptor::multi_task(vec![
            TaskDescriptor {
                name: "size".into(),
                labels: vec!["small".into(), "large".into()],
            },
            TaskDescriptor {
                name: "color".into(),
                labels: vec!["red".into(), "blue".into()],
            },
        ]))
        .unwrap();
        let examples = ["z.png", "a.png", "m.png"]
            .into_iter()
            .map(String::from)
            .collect();
        Session::new(examples, space, SessionOptions::default())
    }

    #[test]
    fn single_results_are_pairs_in_record_order() {
        let space = LabelSpace::Classification(vec!["yes".into(), "no".into()]);
        let mut session = Session::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            space,
            SessionOptions::default(),
        );
        session.start().unwrap();
        session.record_single_label(Label::text("yes")).unwrap();
        session.skip().unwrap();
        session.record_single_label(Label::text("no")).unwrap();

        let json: Value = serde_json::from_str(&annotations_to_json(&session).unwrap()).unwrap();
        assert_eq!(json, json!([["a", "yes"], ["c", "no"]]));
    }

    #[test]
    fn multi_results_follow_example_and_task_order() {
        let mut session = tagging_session();
        session.start().unwrap();
        session.toggle_multi_label("color", "red").unwrap();
        session.toggle_multi_label("size", "large").unwrap();
        session.finish_current().unwrap();
        session.skip().unwrap();
        session.toggle_multi_label("color", "blue").unwrap();
        session.finish_current().unwrap();

        let text = annotations_to_json(&session).unwrap();
        let z = text.find("z.png").unwrap();
        let m = text.find("m.png").unwrap();
        assert!(z < m);
        assert!(!text.contains("a.png"));
        assert!(text.find("\"size\"").unwrap() < text.find("\"color\"").unwrap());

        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json,
            json!({
                "z.png": {"size": ["large"], "color": ["red"]},
                "m.png": {"color": ["blue"]}
            })
        );
    }

    #[test]
    fn writes_output_file_atomically() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("labels.json");
        fs::write(&path, "stale").unwrap();

        write_output("[]", &OutputTarget::File(path.clone())).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn missing_output_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("labels.json");
        let err = write_output("[]", &OutputTarget::File(path)).unwrap_err();
        assert!(matches!(err, OutputError::Write { .. }));
    }
}
