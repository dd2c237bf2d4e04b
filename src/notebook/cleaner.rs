//! Strip execution state from a single notebook

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Map;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::notebook::model::{Notebook, SUPPORTED_NBFORMAT};
use crate::{NbtidyError, Result};

/// Clear outputs, execution counts and metadata in place.
pub fn normalize(notebook: &mut Notebook) {
    for cell in &mut notebook.cells {
        if let Some(outputs) = cell.outputs.as_mut() {
            outputs.clear();
        }
        if cell.execution_count.is_some() {
            cell.execution_count = Some(None);
        }
        if cell.metadata.is_some() {
            cell.metadata = Some(Map::new());
        }
    }

    if notebook.metadata.is_some() {
        notebook.metadata = Some(Map::new());
    }
}

/// Parse notebook JSON read from `path`.
pub fn parse(path: &Path, content: &str) -> Result<Notebook> {
    let notebook: Notebook = serde_json::from_str(content).map_err(|e| NbtidyError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if notebook.nbformat != SUPPORTED_NBFORMAT {
        return Err(NbtidyError::Parse {
            path: path.to_path_buf(),
            reason: format!(
                "unsupported nbformat {} (expected {})",
                notebook.nbformat, SUPPORTED_NBFORMAT
            ),
        });
    }

    Ok(notebook)
}

/// Render a notebook the way the nbformat v4 writer does: sorted keys,
/// one-space indent, UTF-8 text, trailing newline.
pub fn render(notebook: &Notebook) -> serde_json::Result<String> {
    // Going through Value sorts keys, including flattened extras.
    let value = serde_json::to_value(notebook)?;

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');

    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Clean the notebook at `path` and write it back in place.
pub fn clean(path: &Path) -> Result<()> {
    let content = read(path)?;
    let mut notebook = parse(path, &content)?;
    normalize(&mut notebook);
    let rendered = render_at(path, &notebook)?;

    if rendered == content {
        tracing::debug!("Already clean: {}", path.display());
        return Ok(());
    }

    write_replacing(path, &rendered)
}

/// Report whether the notebook at `path` would change if cleaned.
pub fn needs_cleaning(path: &Path) -> Result<bool> {
    let content = read(path)?;
    let mut notebook = parse(path, &content)?;
    normalize(&mut notebook);
    Ok(render_at(path, &notebook)? != content)
}

fn render_at(path: &Path, notebook: &Notebook) -> Result<String> {
    render(notebook).map_err(|source| NbtidyError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| NbtidyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a sibling temp file and rename over `path`, keeping the
/// original permissions. A symlinked notebook is written through to its
/// target so the link itself survives.
fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| NbtidyError::Io {
        path: path.to_path_buf(),
        source,
    };

    let is_link = fs::symlink_metadata(path)
        .map_err(io_err)?
        .file_type()
        .is_symlink();
    let target = if is_link {
        fs::canonicalize(path).map_err(io_err)?
    } else {
        path.to_path_buf()
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(&target).map_err(io_err)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    fs::set_permissions(tmp.path(), permissions).map_err(io_err)?;
    tmp.persist(&target).map_err(|e| io_err(e.error))?;

    Ok(())
}
