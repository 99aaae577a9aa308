// src/output/mod.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    collections::HashSet,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::catalog::{Catalog, Category, CategoryTable};
use crate::error::{CatalogError, Result};

/// One line per food: `<name>\t<modifier>,<modifier>...\n`.
pub fn render_category(category: &Category) -> String {
    let mut out = String::new();
    for food in category.foods() {
        out.push_str(&food.name);
        out.push('\t');
        out.push_str(&food.modifiers.join(","));
        out.push('\n');
    }
    out
}

/// Write `contents` to `path` through a hidden temp file in the same
/// directory, then rename it over the target.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let written = fs::File::create(&tmp_path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        writer.write_all(contents.as_bytes())?;
        writer.flush()
    });
    if let Err(e) = written {
        discard_tmp(&tmp_path);
        return Err(CatalogError::io(&tmp_path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        discard_tmp(&tmp_path);
        CatalogError::io(path, e)
    })
}

fn discard_tmp(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %tmp_path.display(), error = %e, "failed to remove temp file");
        }
    }
}

/// Per-category line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenCategory {
    pub code: String,
    pub label: String,
    pub file: PathBuf,
    pub foods: usize,
    pub modifiers: usize,
}

/// Write every category of `catalog` to `<out_dir>/<LABEL>.txt`.
///
/// Labels are resolved up front, so a missing label fails the call before
/// any file is touched.
#[instrument(level = "info", skip(catalog, table, out_dir), fields(out_dir = %out_dir.display()))]
pub fn write_catalog(
    catalog: &Catalog,
    table: &CategoryTable,
    out_dir: &Path,
) -> Result<Vec<WrittenCategory>> {
    let resolved = table.resolve(catalog)?;

    fs::create_dir_all(out_dir).map_err(|e| CatalogError::io(out_dir, e))?;

    let mut seen_labels: HashSet<&str> = HashSet::new();
    let mut written = Vec::with_capacity(resolved.len());
    for (category, label) in resolved {
        if !seen_labels.insert(label) {
            warn!(code = %category.code, label, "label shared with an earlier category; file overwritten");
        }
        let path = out_dir.join(format!("{}.txt", label));
        write_atomic(&path, &render_category(category))?;
        debug!(code = %category.code, path = %path.display(), foods = category.foods().len(), "wrote category");

        written.push(WrittenCategory {
            code: category.code.clone(),
            label: label.to_string(),
            file: path,
            foods: category.foods().len(),
            modifiers: category.modifier_count(),
        });
    }

    info!(files = written.len(), "wrote category files");
    Ok(written)
}

/// JSON description of one run's output.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub generated_at: DateTime<Utc>,
    pub food_des: &'a Path,
    pub fd_group: &'a Path,
    pub output_dir: &'a Path,
    pub categories: &'a [WrittenCategory],
}

/// Pretty-print `manifest` to `path` with a trailing newline.
pub fn write_manifest(path: &Path, manifest: &Manifest<'_>) -> Result<()> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    write_atomic(path, &json)
}
