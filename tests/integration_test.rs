/// Integration tests for the stats analyzer
///
/// These tests drive the public library surface the way the command-line tool does:
/// reading documents and measurement files, running every analysis and exporting the
/// results.

use std::path::Path;
use serde_json::{json, Value};

use stats_analyzer::app::run_analyzer;
use stats_analyzer::utils::{file_utils, output_formatter};
use stats_analyzer::{analyze_file, analyze_text, AnalyzerError, Measurement, TextAnalyzer, WeatherStation};

const MEASUREMENTS: &str = r#"[
    {"temperature": 18.5, "humidity": 65, "pressure": 1013, "city": "Paris", "is_rainy": false},
    {"temperature": 22.3, "humidity": 78, "pressure": 1008, "city": "Lyon", "is_rainy": true},
    {"temperature": 45.0, "humidity": 20, "pressure": 1002, "city": "Lille", "is_rainy": false}
]"#;

#[test]
fn test_analyze_test_file() {
    let test_file = Path::new("tests/test_data.txt");
    let results = analyze_file(test_file).expect("Failed to analyze test file");
    let results_map: std::collections::HashMap<_, _> = results.into_iter().collect();

    for category in ["characters", "words", "lines", "patterns", "regex", "conditions", "word_sizes"] {
        assert!(results_map.contains_key(category), "missing category {}", category);
    }

    let text = std::fs::read_to_string(test_file).unwrap();
    assert_eq!(results_map["characters"].get_int("count"), Some(text.chars().count() as i64));

    let emails: Vec<&str> = results_map["regex"]
        .get_list("emails")
        .expect("No email list")
        .iter()
        .filter_map(|v| v.as_text())
        .collect();
    assert_eq!(emails, vec!["test@example.com", "support@company.org"]);

    let numbers: Vec<&str> = results_map["regex"]
        .get_list("numbers")
        .expect("No number list")
        .iter()
        .filter_map(|v| v.as_text())
        .collect();
    assert_eq!(numbers, vec!["42", "7"]);

    let lines = &results_map["lines"];
    assert_eq!(lines.get_int("line_count"), Some(4));
    assert_eq!(lines.get_int("blank_line_count"), Some(1));
    assert_eq!(lines.get_int("non_blank_line_count"), Some(3));
}

#[test]
fn test_empty_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let empty_file_path = temp_dir.path().join("empty.txt");
    std::fs::write(&empty_file_path, "").expect("Failed to write empty file");

    let results = analyze_file(&empty_file_path).expect("Failed to analyze empty file");

    for (category, report) in &results {
        assert!(report.is_empty(), "Category {} should be empty for empty file", category);
    }
}

#[test]
fn test_run_analyzer_renders_reports() {
    let temp_dir = tempfile::tempdir().unwrap();
    let first = temp_dir.path().join("first.txt");
    let second = temp_dir.path().join("second.txt");
    std::fs::write(&first, "Hello world").unwrap();
    std::fs::write(&second, "").unwrap();

    let results = run_analyzer(&[&first, &second]).expect("Failed to run analyzer");
    assert_eq!(results.len(), 2);

    let (path, _, report) = &results[0];
    assert!(path.ends_with("first.txt"));
    assert!(report.contains("Hello world"));

    let (_, second_results, _) = &results[1];
    assert!(second_results.iter().all(|(_, report)| report.is_empty()));
}

#[test]
fn test_run_analyzer_missing_file_is_an_error() {
    assert!(run_analyzer(&[Path::new("tests/does_not_exist.txt")]).is_err());
}

#[test]
fn test_generate_report_before_and_after_analysis() {
    let mut analyzer = TextAnalyzer::new("The quick brown fox");
    assert_eq!(analyzer.generate_report(), output_formatter::NO_ANALYSIS_MESSAGE);

    analyzer.analyze_words();
    let report = analyzer.generate_report();
    assert!(report.contains("The quick brown fox"));
    assert!(report.contains("quick"));
}

#[test]
fn test_analysis_is_idempotent() {
    let mut analyzer = TextAnalyzer::new("Idempotent analysis, twice.");
    let first = analyzer.analyze_all();
    let second = analyzer.analyze_all();
    assert_eq!(first, second);
    assert_eq!(analyze_text("Idempotent analysis, twice."), first);
}

#[test]
fn test_measurement_rejects_text_temperature() {
    let value = json!({
        "temperature": "18.5",
        "humidity": 65,
        "pressure": 1013,
        "city": "Paris",
        "is_rainy": false
    });

    match Measurement::from_value(&value) {
        Err(AnalyzerError::InvalidArgumentType { field, .. }) => assert_eq!(field, "temperature"),
        other => panic!("expected InvalidArgumentType, got {:?}", other),
    }
}

#[test]
fn test_humidity_examples() {
    let gap = |humidity: i64| {
        Measurement::new(18.5, humidity, 1013, "Paris", false)
            .unwrap()
            .analyze_humidity()
    };

    let normal = gap(65);
    assert_eq!(normal.level, 2);
    assert!(normal.gap_message.contains("15"));
    assert!(normal.gap_message.contains("80"));

    let dry = gap(20);
    assert_eq!(dry.level, 1);
    assert!(dry.gap_message.contains("10"));
    assert!(dry.gap_message.contains("30"));

    let humid = gap(95);
    assert_eq!(humid.level, 3);
    assert!(humid.gap_message.contains("15"));
}

#[test]
fn test_freezing_point_conversion() {
    let temperature = Measurement::new(0.0, 50, 1013, "Oslo", false)
        .unwrap()
        .analyze_temperature();
    assert_eq!(temperature.fahrenheit, 32.0);
    assert!((temperature.kelvin - 273.15).abs() < 1e-9);
    assert!(temperature.freezing);
}

#[test]
fn test_station_from_measurements_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("measurements.json");
    std::fs::write(&path, MEASUREMENTS).unwrap();

    let measurements = file_utils::read_measurements(&path).expect("Failed to read measurements");
    let mut station = WeatherStation::with_measurements(measurements);
    station.configure_thresholds(None, None);

    let summary = station.summarize();
    assert_eq!(summary.get_int("measurement_count"), Some(3));
    assert_eq!(summary.get_int("rainy_count"), Some(1));
    assert_eq!(summary.get_float("max_temperature"), Some(45.0));

    let out_of_range: Vec<&str> = station.out_of_range().iter().map(|m| m.city()).collect();
    assert_eq!(out_of_range, vec!["Lille"]);

    let warm: Vec<&str> = station.filter_by_min_temperature(20.0).iter().map(|m| m.city()).collect();
    assert_eq!(warm, vec!["Lyon", "Lille"]);
    assert_eq!(station.filter_by_city_prefix("L").len(), 2);
    assert_eq!(station.filter_by_rain(true).len(), 1);
}

#[test]
fn test_export_json_and_csv() {
    let temp_dir = tempfile::tempdir().unwrap();
    let results = analyze_text("Mail me at a@b.io about 12 apples.");

    let json_path = temp_dir.path().join("report.json");
    output_formatter::export_results_json(&results, &json_path).expect("Failed to export JSON");
    let exported: Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported["regex"]["emails"], json!(["a@b.io"]));
    assert_eq!(exported["regex"]["numbers"], json!(["12"]));
    assert_eq!(exported["characters"]["is_empty"], json!(false));

    let csv_path = temp_dir.path().join("report.csv");
    output_formatter::create_csv_report(&results, &csv_path).expect("Failed to export CSV");
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert!(rows.iter().any(|row| &row[0] == "words" && &row[1] == "word_count" && &row[2] == "7" && &row[3] == "int"));
}

#[test]
fn test_html_report_lists_categories() {
    let results = analyze_text("Some words here.");
    let html = output_formatter::render_html_report(&results).expect("Failed to render HTML");
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Word Count"));
}
