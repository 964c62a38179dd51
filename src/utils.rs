// src/utils.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Read a newline-delimited target list, trimming whitespace and dropping
/// blank lines. File order is preserved.
pub fn read_targets(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            targets.push(trimmed.to_string());
        }
    }
    Ok(targets)
}

/// Prefix bare hosts with `https://` so they can be requested.
pub fn normalize_target(target: &str) -> String {
    let target = target.trim();
    if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}
