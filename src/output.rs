// src/output.rs
use crate::types::{CspStalkerError, OutputConfig, ResultRecord};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn result_path(&self, apex_domain: &str) -> PathBuf {
        self.config
            .results_dir
            .join(format!("{}_results.json", sanitize_filename(apex_domain)))
    }

    /// Write `{apex_domain, subdomains}` to the domain's result file,
    /// replacing any previous run's file.
    pub fn save_results(&self, apex_domain: &str, subdomains: &[String]) -> Result<PathBuf, CspStalkerError> {
        fs::create_dir_all(&self.config.results_dir)
            .map_err(|e| CspStalkerError::OutputError(format!("Failed to create directory: {}", e)))?;

        let record = ResultRecord {
            apex_domain: apex_domain.to_string(),
            subdomains: subdomains.to_vec(),
        };
        let json = to_json_indented(&record)?;

        let path = self.result_path(apex_domain);
        fs::write(&path, json)
            .map_err(|e| CspStalkerError::OutputError(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(path)
    }

    pub fn print_subdomains(&self, subdomains: &[String]) {
        if !self.config.silent {
            println!("Subdomains:");
        }
        for subdomain in subdomains {
            if self.config.silent {
                println!("{}", subdomain);
            } else {
                println!("  - {}", subdomain);
            }
        }
    }
}

fn to_json_indented<T: Serialize>(value: &T) -> Result<Vec<u8>, CspStalkerError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| CspStalkerError::OutputError(format!("Failed to serialize JSON: {}", e)))?;
    Ok(buf)
}
