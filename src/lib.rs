/// Stats Analyzer - Text and weather-measurement statistics
///
/// This library computes descriptive statistics over text documents (characters, words,
/// lines, word patterns, extracted emails and numbers) and over weather measurements
/// (humidity bands, temperature scales, city names, weather conditions), and renders
/// human-readable reports from them.

// Re-export core modules
pub mod core;
pub mod utils;

// Re-export main analyzer types for convenience
pub use crate::core::analyzer::TextAnalyzer;
pub use crate::core::document::TextDocument;
pub use crate::core::error::AnalyzerError;
pub use crate::core::measurement::Measurement;
pub use crate::core::report::{StatValue, StatsReport};
pub use crate::core::station::WeatherStation;
pub use crate::core::stats::Category;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run every text analysis on a string
///
/// # Arguments
///
/// * `text` - Text to analyze
///
/// # Returns
///
/// Reports as `(category, report)` pairs, in report order
pub fn analyze_text(text: &str) -> Vec<(String, StatsReport)> {
    TextAnalyzer::new(text).analyze_all()
}

/// Analyze a single file and return the results
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the file to analyze
///
/// # Returns
///
/// Results of the analysis as a vector of (category, report) tuples
pub fn analyze_file<P: AsRef<std::path::Path>>(
    file_path: P,
) -> anyhow::Result<Vec<(String, StatsReport)>> {
    let content = utils::file_utils::read_file_content(file_path.as_ref())?;
    let mut analyzer = TextAnalyzer::new(content.document);
    Ok(analyzer.analyze_all())
}

/// Library configuration and utilities
pub mod config {
    use log::{error, info};
    use serde::Deserialize;
    use std::path::Path;

    /// Settings read from an optional JSON configuration file
    ///
    /// Every field is optional in the file; missing fields keep their defaults.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(default)]
    pub struct AnalyzerConfig {
        /// Wrap console output in markdown code fences
        pub markdown: bool,
        /// Worker threads for multi-file runs, 0 for one per core
        pub parallel: usize,
        /// Largest file analyzed, in megabytes
        pub max_size_mb: usize,
        pub max_files: usize,
    }

    impl Default for AnalyzerConfig {
        fn default() -> Self {
            Self {
                markdown: false,
                parallel: 0,
                max_size_mb: 50,
                max_files: 1000,
            }
        }
    }

    /// Create default configuration
    pub fn default_config() -> AnalyzerConfig {
        AnalyzerConfig::default()
    }

    /// Load configuration from file if provided
    ///
    /// A missing file or invalid JSON is logged and the defaults are used instead.
    pub fn load_config(config_path: Option<&Path>) -> AnalyzerConfig {
        let path = match config_path {
            Some(path) => path,
            None => return default_config(),
        };

        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return default_config();
        }

        let config_str = match std::fs::read_to_string(path) {
            Ok(config_str) => config_str,
            Err(e) => {
                error!("Could not read configuration file {}: {}", path.display(), e);
                return default_config();
            }
        };

        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                default_config()
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_partial_config_keeps_defaults() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(&path, r#"{"markdown": true, "parallel": 2}"#).unwrap();

            let config = load_config(Some(&path));
            assert!(config.markdown);
            assert_eq!(config.parallel, 2);
            assert_eq!(config.max_files, 1000);
        }

        #[test]
        fn test_invalid_or_missing_config_falls_back() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(&path, "{ not json").unwrap();

            assert_eq!(load_config(Some(&path)), default_config());
            assert_eq!(load_config(Some(&dir.path().join("absent.json"))), default_config());
            assert_eq!(load_config(None), default_config());
        }
    }
}

/// Command-line application functionality
pub mod app {
    use crate::core::analyzer::TextAnalyzer;
    use crate::core::report::StatsReport;
    use crate::utils::file_utils::read_file_content;
    use std::path::Path;

    /// Run the analyzer on multiple files
    ///
    /// # Arguments
    ///
    /// * `file_paths` - Paths to files to analyze
    ///
    /// # Returns
    ///
    /// Results for all files, each with the rendered text report
    pub fn run_analyzer<P: AsRef<Path>>(
        file_paths: &[P],
    ) -> anyhow::Result<Vec<(String, Vec<(String, StatsReport)>, String)>> {
        let mut results = Vec::new();

        for file_path in file_paths {
            let content = read_file_content(file_path.as_ref())?;
            let mut analyzer = TextAnalyzer::new(content.document);
            let file_results = analyzer.analyze_all();
            let report = analyzer.generate_report();
            let path_str = file_path.as_ref().to_string_lossy().to_string();
            results.push((path_str, file_results, report));
        }

        Ok(results)
    }
}
