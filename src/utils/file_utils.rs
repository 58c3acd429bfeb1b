/// File handling utilities
///
/// This module provides utility functions for reading text documents, measurement
/// files and raw station logs from disk, along with basic file metadata.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use log::{debug, warn};
use anyhow::{anyhow, Result, Context};
use chrono::{DateTime, Local};
use serde_json::Value;

use crate::core::document::TextDocument;
use crate::core::measurement::Measurement;

/// Result of reading a file's content
#[derive(Debug)]
pub struct FileContent {
    /// The file content as a document
    pub document: TextDocument,
    /// Whether the file appears to be binary
    pub is_binary: bool,
    /// Additional metadata about the file
    pub metadata: HashMap<String, String>,
}

/// Read a file as a text document.
///
/// Invalid UTF-8 is replaced rather than rejected; such files, and files with control
/// characters other than whitespace, are flagged as binary.
///
/// # Arguments
///
/// * `file_path` - Path to the file
///
/// # Returns
///
/// A result containing the document and file metadata
pub fn read_file_content(file_path: &Path) -> Result<FileContent> {
    let bytes = fs::read(file_path)
        .context(format!("Failed to read file: {}", file_path.display()))?;

    let mut metadata = get_file_metadata(file_path)?;

    let (content, lossy) = match String::from_utf8(bytes) {
        Ok(content) => (content, false),
        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
    };

    let is_binary = lossy || content.chars().any(|c| c.is_control() && !c.is_whitespace());
    if is_binary {
        warn!("File {} looks binary, statistics may be meaningless", file_path.display());
        metadata.insert("binary".to_string(), "true".to_string());
    }

    debug!("Read {} characters from {}", content.chars().count(), file_path.display());

    Ok(FileContent {
        document: TextDocument::new(content),
        is_binary,
        metadata,
    })
}

/// Get file metadata for a given path.
///
/// # Arguments
///
/// * `file_path` - Path to the file
///
/// # Returns
///
/// A hashmap containing file metadata
pub fn get_file_metadata(file_path: &Path) -> Result<HashMap<String, String>> {
    let mut metadata_map = HashMap::new();

    metadata_map.insert("file_name".to_string(), file_path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string()));

    if let Ok(metadata) = fs::metadata(file_path) {
        metadata_map.insert("file_size".to_string(), metadata.len().to_string());

        if let Ok(modified) = metadata.modified() {
            let modified: DateTime<Local> = modified.into();
            metadata_map.insert("modified".to_string(),
                                modified.format("%Y-%m-%d %H:%M:%S").to_string());
        }
    }

    Ok(metadata_map)
}

/// Load measurements from a JSON array file.
///
/// Every element goes through [`Measurement::from_value`], so a wrongly-typed field
/// fails the whole load with the offending index in the error.
///
/// # Arguments
///
/// * `file_path` - Path to a JSON file holding an array of measurement objects
///
/// # Returns
///
/// The measurements in file order
pub fn read_measurements(file_path: &Path) -> Result<Vec<Measurement>> {
    let content = fs::read_to_string(file_path)
        .context(format!("Failed to read measurements file: {}", file_path.display()))?;

    let json: Value = serde_json::from_str(&content)
        .context(format!("Invalid JSON in measurements file: {}", file_path.display()))?;

    let entries = json
        .as_array()
        .ok_or_else(|| anyhow!("Measurements file must contain a JSON array: {}", file_path.display()))?;

    let mut measurements = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let measurement = Measurement::from_value(entry)
            .context(format!("Invalid measurement at index {}", index))?;
        measurements.push(measurement);
    }

    debug!("Loaded {} measurements from {}", measurements.len(), file_path.display());

    Ok(measurements)
}

/// Read a single measurement object from a JSON file
pub fn read_measurement(file_path: &Path) -> Result<Measurement> {
    let content = fs::read_to_string(file_path)
        .context(format!("Failed to read measurement file: {}", file_path.display()))?;

    let json: Value = serde_json::from_str(&content)
        .context(format!("Invalid JSON in measurement file: {}", file_path.display()))?;

    Ok(Measurement::from_value(&json)?)
}
