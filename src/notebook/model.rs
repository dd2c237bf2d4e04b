//! nbformat v4 document model
//!
//! Only the fields the normalizer touches are typed. Everything else rides
//! along in `extra` so a read/write cycle does not drop unknown keys.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The only major format version we read and write.
pub const SUPPORTED_NBFORMAT: u64 = 4;

/// A notebook document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Major format version (must be 4)
    pub nbformat: u64,

    /// Minor format version
    pub nbformat_minor: u64,

    /// Document-level metadata (kernelspec, language_info, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Cells in document order
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Any other top-level keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// True when no cell carries execution state and document metadata is empty.
    pub fn is_normalized(&self) -> bool {
        self.metadata.as_ref().map_or(true, Map::is_empty)
            && self.cells.iter().all(|cell| cell.is_clean())
    }
}

/// Kind of a notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

/// One notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,

    #[serde(default)]
    pub source: Source,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Value>>,

    /// `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_count: Option<Option<u64>>,

    /// Any other cell keys (`id`, `attachments`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// True when the cell carries no execution state.
    pub fn is_clean(&self) -> bool {
        self.outputs.as_ref().map_or(true, Vec::is_empty)
            && !matches!(self.execution_count, Some(Some(_)))
            && self.metadata.as_ref().map_or(true, Map::is_empty)
    }
}

/// Cell source text.
///
/// Accepts either a single string or a list of lines on read, and always
/// writes a list of lines, each keeping its trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSource", into = "Vec<String>")]
pub struct Source(String);

impl Source {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into lines, keeping line terminators.
    pub fn lines(&self) -> Vec<String> {
        self.0.split_inclusive('\n').map(str::to_string).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl From<RawSource> for Source {
    fn from(raw: RawSource) -> Self {
        match raw {
            RawSource::Text(text) => Self(text),
            RawSource::Lines(lines) => Self(lines.concat()),
        }
    }
}

impl From<Source> for Vec<String> {
    fn from(source: Source) -> Self {
        source.lines()
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_accepts_string_and_line_list() {
        let from_text: Source = serde_json::from_str(r#""a = 1\nb = 2""#).unwrap();
        let from_lines: Source = serde_json::from_str(r#"["a = 1\n", "b = 2"]"#).unwrap();
        assert_eq!(from_text, from_lines);
        assert_eq!(from_text.lines(), vec!["a = 1\n", "b = 2"]);
    }

    #[test]
    fn empty_source_writes_empty_list() {
        let json = serde_json::to_string(&Source::default()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn execution_count_distinguishes_null_from_absent() {
        let with_null: Cell =
            serde_json::from_str(r#"{"cell_type": "code", "source": "", "execution_count": null}"#)
                .unwrap();
        let absent: Cell =
            serde_json::from_str(r#"{"cell_type": "markdown", "source": ""}"#).unwrap();

        assert_eq!(with_null.execution_count, Some(None));
        assert_eq!(absent.execution_count, None);

        let written = serde_json::to_value(&with_null).unwrap();
        assert!(written["execution_count"].is_null());
        let written = serde_json::to_value(&absent).unwrap();
        assert!(written.get("execution_count").is_none());
    }

    #[test]
    fn unknown_cell_keys_are_kept() {
        let cell: Cell = serde_json::from_str(
            r##"{"cell_type": "markdown", "id": "abc123", "source": "# Title", "attachments": {}}"##,
        )
        .unwrap();
        assert_eq!(cell.extra.get("id"), Some(&Value::from("abc123")));
        assert!(cell.extra.contains_key("attachments"));
    }

    #[test]
    fn unknown_cell_type_is_rejected() {
        let result: Result<Cell, _> =
            serde_json::from_str(r#"{"cell_type": "widget", "source": ""}"#);
        assert!(result.is_err());
    }
}
