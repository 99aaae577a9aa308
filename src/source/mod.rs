// src/source/mod.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fs, path::Path};
use tracing::{debug, instrument, warn};

use crate::config::MalformedPolicy;
use crate::error::{CatalogError, Result};

static FOOD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^~([0-9]+)~\^~([0-9]+)~\^~([^~]+)~\^~([^~]+)").unwrap());
static GROUP_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^~([0-9]+)~\^~([^~]+)~").unwrap());
static ALPHA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]+").unwrap());

/// One row of `FOOD_DES.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    pub id: String,
    pub category: String,
    pub description: String,
}

/// One row of `FD_GROUP.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub line: usize,
    pub code: String,
    pub raw_label: String,
}

/// Parse a single food line, `~ID~^~CATEGORY~^~DESCRIPTION~^~SHORT~...`.
pub fn parse_food_line(line_no: usize, line: &str) -> Result<FoodRecord> {
    let caps = FOOD_LINE
        .captures(line)
        .ok_or_else(|| CatalogError::MalformedFoodRecord {
            line: line_no,
            content: line.to_string(),
        })?;
    Ok(FoodRecord {
        line: line_no,
        id: caps[1].to_string(),
        category: caps[2].to_string(),
        description: caps[3].to_string(),
    })
}

/// Parse a single category line, `~CATEGORY~^~LABEL~`.
pub fn parse_category_line(line_no: usize, line: &str) -> Result<CategoryRecord> {
    let caps = GROUP_LINE
        .captures(line)
        .ok_or_else(|| CatalogError::MalformedCategoryRecord {
            line: line_no,
            content: line.to_string(),
        })?;
    Ok(CategoryRecord {
        line: line_no,
        code: caps[1].to_string(),
        raw_label: caps[2].to_string(),
    })
}

/// Uppercase `raw` and join its alphabetic runs with `_`.
///
/// `"Dairy and Egg Products"` → `"DAIRY_AND_EGG_PRODUCTS"`. Returns an empty
/// string when `raw` has no ASCII letters.
pub fn category_label(raw: &str) -> String {
    let upper = raw.to_ascii_uppercase();
    ALPHA_RUN
        .find_iter(&upper)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("_")
}

/// Read a whole source file into memory, decoding it lossily.
///
/// USDA exports are Latin-1 in places; stray bytes become U+FFFD instead of
/// failing the run.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run `parse` over every non-blank line of `text`, applying `policy` to
/// lines that fail it. Returns the parsed records and the number of skipped
/// malformed lines.
fn parse_lines<T>(
    text: &str,
    policy: MalformedPolicy,
    parse: impl Fn(usize, &str) -> Result<T>,
) -> Result<(Vec<T>, usize)> {
    let mut records = Vec::new();
    let mut skipped = 0;
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            debug!(line = line_no, "skipping blank line");
            continue;
        }
        match parse(line_no, line) {
            Ok(rec) => records.push(rec),
            Err(e) if policy == MalformedPolicy::Skip => {
                warn!(error = %e, "skipping malformed line");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((records, skipped))
}

/// Parse every food record of `text`.
pub fn parse_food_records(
    text: &str,
    policy: MalformedPolicy,
) -> Result<(Vec<FoodRecord>, usize)> {
    let (records, skipped) = parse_lines(text, policy, parse_food_line)?;
    debug!(records = records.len(), skipped, "parsed food records");
    Ok((records, skipped))
}

/// Parse every category record of `text`.
pub fn parse_category_records(
    text: &str,
    policy: MalformedPolicy,
) -> Result<(Vec<CategoryRecord>, usize)> {
    let (records, skipped) = parse_lines(text, policy, parse_category_line)?;
    debug!(records = records.len(), skipped, "parsed category records");
    Ok((records, skipped))
}

/// Read and parse the primary food file.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn load_food_records(
    path: &Path,
    policy: MalformedPolicy,
) -> Result<(Vec<FoodRecord>, usize)> {
    let text = read_source(path)?;
    parse_food_records(&text, policy)
}

/// Read and parse the category file.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn load_category_records(
    path: &Path,
    policy: MalformedPolicy,
) -> Result<(Vec<CategoryRecord>, usize)> {
    let text = read_source(path)?;
    parse_category_records(&text, policy)
}
