//! Writing document lists to disk.

use crate::document::Document;
use crate::error::Result;
use chrono::Local;
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Separator for list-valued metadata in CSV cells
const LIST_SEPARATOR: &str = "; ";

/// `<dir>/<YYYYmmdd_HHMMSS>_<query>`, with the query reduced to safe characters.
pub fn output_folder(dir: &Path, query: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    dir.join(format!("{}_{}", timestamp, safe_name(query)))
}

fn safe_name(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// Write documents as a pretty-printed JSON array.
pub fn save_json(path: &Path, documents: &[Document]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, documents)?;
    info!(path = %path.display(), count = documents.len(), "Saved JSON");
    Ok(())
}

/// Write documents as CSV: a `text` column followed by every metadata key in
/// first-seen order. Lists are joined with `"; "`, missing keys are empty.
pub fn save_csv(path: &Path, documents: &[Document]) -> Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for doc in documents {
        for key in doc.metadata().keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;

    let mut header = vec!["text"];
    header.extend(columns.iter().copied());
    wtr.write_record(&header)?;

    for doc in documents {
        let mut row = vec![doc.text().to_string()];
        row.extend(columns.iter().map(|key| cell(doc.get(key))));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    info!(path = %path.display(), count = documents.len(), "Saved CSV");
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Some(other) => other.to_string(),
    }
}
