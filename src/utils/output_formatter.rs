/// Output formatter for analysis results
///
/// This module renders the text report assembled from cached analyses, and formats and
/// exports category reports for the console, JSON, HTML, and CSV.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context};
use colored::Colorize;
use handlebars::Handlebars;
use serde_json::{self, json, Value};

use crate::core::document::TextDocument;
use crate::core::patterns::REPORT_PREVIEW_LEN;
use crate::core::report::{StatValue, StatsReport};
use crate::core::stats::{AnalysisCache, Category};

/// Message returned by report generation when nothing has been analyzed
pub const NO_ANALYSIS_MESSAGE: &str =
    "No statistics to report. Either no analysis has been run yet or the text produced none.";

/// Console groups, in display order
const CATEGORY_GROUPS: [(&str, &[&str]); 6] = [
    ("Text Statistics", &["characters", "words", "lines", "word_sizes"]),
    ("Patterns and Entities", &["patterns", "regex"]),
    ("Text Conditions", &["conditions"]),
    ("Measurement", &["humidity", "temperature", "city", "weather_conditions"]),
    ("Station", &["station_summary", "raw_data"]),
    ("Errors", &["error"]),
];

/// Format a count with `,` thousands separators
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Share of `part` in `whole` with one decimal, `0.0%` when `whole` is zero
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

/// `snake_case` key to a `Title Case` label
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

/// Assemble the human-readable report for a document
///
/// Only cached categories appear, always in the same order. Returns
/// [`NO_ANALYSIS_MESSAGE`] when the cache is empty.
pub fn format_text_report(document: &TextDocument, cache: &AnalysisCache) -> String {
    if cache.is_empty() {
        return NO_ANALYSIS_MESSAGE.to_string();
    }

    let mut output = String::new();
    output.push_str("=== Text Analysis Report ===\n");
    output.push_str(&format!("Source: \"{}\"\n", document.preview(REPORT_PREVIEW_LEN)));

    for category in cache.categories() {
        output.push_str(&format!("\n[{}]\n", category.title()));

        match category {
            Category::Characters => {
                if let Some(stats) = &cache.characters {
                    output.push_str(&format!("  Total characters: {}\n", format_count(stats.count)));
                    output.push_str(&format!("  Letters: {} ({})\n", format_count(stats.letters), format_percent(stats.letters, stats.count)));
                    output.push_str(&format!("  Digits: {} ({})\n", format_count(stats.digits), format_percent(stats.digits, stats.count)));
                    output.push_str(&format!("  Spaces: {} ({})\n", format_count(stats.spaces), format_percent(stats.spaces, stats.count)));
                }
            }
            Category::Words => {
                if let Some(stats) = &cache.words {
                    output.push_str(&format!("  Words: {}\n", format_count(stats.word_count)));
                    output.push_str(&format!(
                        "  Unique words: {} ({})\n",
                        format_count(stats.unique_word_count),
                        format_percent(stats.unique_word_count, stats.word_count)
                    ));
                    output.push_str(&format!("  Longest word: \"{}\"\n", stats.longest_word));
                    output.push_str(&format!("  Average length: {:.1}\n", stats.average_word_length));
                }
            }
            Category::Lines => {
                if let Some(stats) = &cache.lines {
                    let per_line: Vec<String> = stats.words_per_line.iter().map(|n| format_count(*n)).collect();
                    output.push_str(&format!("  Lines: {}\n", format_count(stats.line_count)));
                    output.push_str(&format!(
                        "  Blank lines: {} ({})\n",
                        format_count(stats.blank_line_count),
                        format_percent(stats.blank_line_count, stats.line_count)
                    ));
                    output.push_str(&format!("  Non-blank lines: {}\n", format_count(stats.non_blank_line_count)));
                    output.push_str(&format!("  Longest line: \"{}\"\n", stats.longest_line));
                    output.push_str(&format!("  Words per line: {}\n", join_or_none(&per_line)));
                }
            }
            Category::Patterns => {
                if let Some(stats) = &cache.patterns {
                    output.push_str(&format!("  Starting with a vowel: {}\n", format_count(stats.words_starting_with_vowel)));
                    output.push_str(&format!("  Ending with a period: {}\n", format_count(stats.words_ending_with_period)));
                    output.push_str(&format!("  Starting with uppercase: {}\n", format_count(stats.words_starting_with_uppercase)));
                }
            }
            Category::Regex => {
                if let Some(stats) = &cache.regex {
                    output.push_str(&format!("  Emails ({}): {}\n", format_count(stats.emails.len()), join_or_none(&stats.emails)));
                    output.push_str(&format!("  Numbers ({}): {}\n", format_count(stats.numbers.len()), join_or_none(&stats.numbers)));
                }
            }
            Category::Conditions => {
                if let Some(stats) = &cache.conditions {
                    output.push_str(&format!("  Has digits: {}\n", yes_no(stats.has_digits)));
                    output.push_str(&format!("  Has letters: {}\n", yes_no(stats.has_letters)));
                    output.push_str(&format!("  Has spaces: {}\n", yes_no(stats.has_spaces)));
                    output.push_str(&format!("  All words short: {}\n", yes_no(stats.all_words_short)));
                    output.push_str(&format!("  Any long word: {}\n", yes_no(stats.has_any_long_word)));
                    output.push_str(&format!("  Only letters: {}\n", yes_no(stats.all_chars_alphabetic)));
                }
            }
            Category::WordSizes => {
                if let Some(stats) = &cache.word_sizes {
                    let total = stats.short_word_count + stats.long_word_count + stats.equal_word_count;
                    output.push_str(&format!("  Average length: {:.1}\n", stats.average_word_length));
                    output.push_str(&format!("  Shorter than average: {} ({})\n", format_count(stats.short_word_count), format_percent(stats.short_word_count, total)));
                    output.push_str(&format!("  Longer than average: {} ({})\n", format_count(stats.long_word_count), format_percent(stats.long_word_count, total)));
                    output.push_str(&format!("  Equal to average: {} ({})\n", format_count(stats.equal_word_count), format_percent(stats.equal_word_count, total)));
                }
            }
        }
    }

    output
}

/// Plain rendering of a value for exports
fn render_value(value: &StatValue) -> String {
    match value {
        StatValue::Int(n) if *n >= 0 => format_count(*n as usize),
        other => other.to_string(),
    }
}

/// Format category reports for console output
///
/// # Arguments
///
/// * `results` - Reports organized by category name
/// * `use_markdown` - Whether to format output with markdown triple backticks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_results(
    results: &[(String, StatsReport)],
    use_markdown: &bool,
) -> String {
    let mut output = String::new();

    // Start markdown code block if requested
    if *use_markdown {
        output.push_str("```\n");
    }

    let results_map: HashMap<_, _> = results.iter().map(|(k, v)| (k.as_str(), v)).collect();
    let mut any_results = false;

    for (group_name, categories_in_group) in CATEGORY_GROUPS.iter() {
        let mut group_output = String::new();

        for category in categories_in_group.iter() {
            if let Some(report) = results_map.get(category) {
                if report.is_empty() {
                    continue;
                }

                group_output.push_str(&format!("  {}\n", title_case(category).as_str().cyan().bold()));
                for (key, value) in report.iter() {
                    group_output.push_str(&format!("    {}: {}\n", title_case(key), render_value(value)));
                }
                group_output.push('\n');
            }
        }

        if !group_output.is_empty() {
            any_results = true;
            output.push_str(&format!("{}\n", group_name.yellow().bold()));
            output.push_str(&group_output);
        }
    }

    if !any_results {
        output.push_str("No statistics computed (empty input).\n");
    }

    // End markdown code block if requested
    if *use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Export reports to a JSON file
///
/// # Arguments
///
/// * `results` - Reports organized by category name
/// * `output_path` - Path where the JSON file will be written
pub fn export_results_json(
    results: &[(String, StatsReport)],
    output_path: &Path,
) -> Result<()> {
    let mut json_output = serde_json::Map::new();

    for (category, report) in results {
        json_output.insert(category.clone(), serde_json::to_value(report)?);
    }

    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, &json_output)
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Create an HTML report from category reports
///
/// # Arguments
///
/// * `results` - Reports organized by category name
/// * `output_path` - Path where the HTML file will be written
pub fn create_html_report(
    results: &[(String, StatsReport)],
    output_path: &Path,
) -> Result<()> {
    let html = render_html_report(results)?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create HTML output file: {}", output_path.display()))?;

    file.write_all(html.as_bytes())
        .context("Failed to write HTML data")?;

    Ok(())
}

/// Render the HTML report to a string
pub fn render_html_report(results: &[(String, StatsReport)]) -> Result<String> {
    let mut handlebars = Handlebars::new();

    const HTML_TEMPLATE: &str = r#"
    <!DOCTYPE html>
    <html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>Statistics Report</title>
        <style>
            body {
                font-family: Arial, sans-serif;
                line-height: 1.6;
                color: #333;
                max-width: 1200px;
                margin: 0 auto;
                padding: 20px;
            }
            h1 {
                color: #2c3e50;
                border-bottom: 2px solid #3498db;
                padding-bottom: 10px;
            }
            h2 {
                color: #2980b9;
                margin-top: 30px;
            }
            .category {
                background-color: #f8f9fa;
                border-radius: 5px;
                padding: 15px;
                margin-bottom: 20px;
            }
            table {
                border-collapse: collapse;
                width: 100%;
            }
            td {
                padding: 4px 8px;
                border-bottom: 1px solid #eee;
            }
            .timestamp {
                color: #7f8c8d;
                font-size: 0.9em;
                margin-bottom: 30px;
            }
        </style>
    </head>
    <body>
        <h1>Statistics Report</h1>
        <div class="timestamp">Generated on: {{timestamp}}</div>

        {{#each groups}}
        <h2>{{name}}</h2>
        {{#each categories}}
        <div class="category">
            <h3>{{name}}</h3>
            <table>
                {{#each entries}}
                <tr><td>{{name}}</td><td>{{value}}</td></tr>
                {{/each}}
            </table>
        </div>
        {{/each}}
        {{/each}}
    </body>
    </html>
    "#;

    handlebars.register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let results_map: HashMap<_, _> = results.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let mut groups_data = Vec::new();
    for (group_name, categories_in_group) in CATEGORY_GROUPS.iter() {
        let mut categories_data = Vec::new();

        for category in categories_in_group.iter() {
            let report = match results_map.get(category) {
                Some(report) if !report.is_empty() => report,
                _ => continue,
            };

            let entries: Vec<Value> = report
                .iter()
                .map(|(key, value)| json!({ "name": title_case(key), "value": render_value(value) }))
                .collect();

            categories_data.push(json!({ "name": title_case(category), "entries": entries }));
        }

        if !categories_data.is_empty() {
            groups_data.push(json!({ "name": group_name, "categories": categories_data }));
        }
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let template_data = json!({ "timestamp": timestamp, "groups": groups_data });

    let html = handlebars.render("report", &template_data)
        .context("Failed to render HTML template")?;

    Ok(html)
}

/// CSV cell text; floats keep full precision
fn csv_value(value: &StatValue) -> String {
    match value {
        StatValue::Float(n) => n.to_string(),
        StatValue::List(values) => {
            let rendered: Vec<String> = values.iter().map(csv_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        other => other.to_string(),
    }
}

/// Create a CSV report with one row per metric
///
/// # Arguments
///
/// * `results` - Reports organized by category name
/// * `output_path` - Path where the CSV file will be written
pub fn create_csv_report(
    results: &[(String, StatsReport)],
    output_path: &Path,
) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["Category", "Metric", "Value", "Type"])
        .context("Failed to write CSV header")?;

    for (category, report) in results {
        for (key, value) in report.iter() {
            let rendered = csv_value(value);
            writer.write_record([category.as_str(), key, rendered.as_str(), value.type_name()])
                .context("Failed to write CSV record")?;
        }
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

/// Create a summary across several analyzed inputs
pub fn create_summary(
    all_results: &[(String, Vec<(String, StatsReport)>)],
) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n\n", "Analysis Summary".yellow().bold()));
    output.push_str(&format!("Inputs analyzed: {}\n", format_count(all_results.len())));

    let sum_of = |category: &str, key: &str| -> usize {
        all_results
            .iter()
            .flat_map(|(_, results)| results.iter())
            .filter(|(name, _)| name == category)
            .filter_map(|(_, report)| report.get_int(key))
            .map(|n| n.max(0) as usize)
            .sum()
    };

    let emails: usize = all_results
        .iter()
        .flat_map(|(_, results)| results.iter())
        .filter(|(name, _)| name == "regex")
        .filter_map(|(_, report)| report.get_list("emails").map(|l| l.len()))
        .sum();

    output.push_str(&format!("Total characters: {}\n", format_count(sum_of("characters", "count"))));
    output.push_str(&format!("Total words: {}\n", format_count(sum_of("words", "word_count"))));
    output.push_str(&format!("Total lines: {}\n", format_count(sum_of("lines", "line_count"))));
    output.push_str(&format!("Emails found: {}\n", format_count(emails)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::TextAnalyzer;

    #[test]
    fn test_format_count_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1, 3), "33.3%");
        assert_eq!(format_percent(5, 0), "0.0%");
        assert_eq!(format_percent(2, 2), "100.0%");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("unique_word_count"), "Unique Word Count");
        assert_eq!(title_case("regex"), "Regex");
    }

    #[test]
    fn test_report_only_lists_cached_categories() {
        let mut analyzer = TextAnalyzer::new("Contact: a.b@test.com, count 42");
        analyzer.extract_with_regex();
        analyzer.analyze_characters();

        let report = analyzer.generate_report();
        let characters = report.find("[Characters]").unwrap();
        let entities = report.find("[Extracted Entities]").unwrap();

        assert!(characters < entities);
        assert!(!report.contains("[Words]"));
        assert!(report.contains("Emails (1): a.b@test.com"));
        assert!(report.contains("Numbers (1): 42"));
    }

    #[test]
    fn test_report_truncates_source() {
        let mut analyzer = TextAnalyzer::new("The quick brown fox jumps over the lazy dog");
        analyzer.analyze_words();

        let report = analyzer.generate_report();
        assert!(report.contains("Source: \"The quick brown fox jumps...\""));
        assert!(report.contains("Unique words: 8 (88.9%)"));
    }

    #[test]
    fn test_report_groups_large_counts() {
        let text = "word ".repeat(1500);
        let mut analyzer = TextAnalyzer::new(text);
        analyzer.analyze_characters();

        let report = analyzer.generate_report();
        assert!(report.contains("Total characters: 7,500"));
        assert!(report.contains("Letters: 6,000 (80.0%)"));
    }

    #[test]
    fn test_format_results_markdown_and_empty() {
        let results = vec![("characters".to_string(), StatsReport::new())];
        let output = format_results(&results, &true);
        assert!(output.starts_with("```\n"));
        assert!(output.contains("No statistics computed"));
    }

    #[test]
    fn test_report_after_analyzing_empty_text() {
        let mut analyzer = TextAnalyzer::new("");
        analyzer.analyze_all();
        let report = analyzer.generate_report();
        assert_eq!(report, NO_ANALYSIS_MESSAGE);
        assert!(report.contains("produced none"));
    }

    #[test]
    fn test_csv_keeps_float_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let results = TextAnalyzer::new("a bb bb").analyze_all();
        create_csv_report(&results, &path).unwrap();

        let expected = (5.0f64 / 3.0).to_string();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader
            .records()
            .map(|r| r.unwrap())
            .find(|row| &row[0] == "words" && &row[1] == "average_word_length")
            .unwrap();
        assert_eq!(&row[2], expected.as_str());
        assert_eq!(&row[3], "float");
    }

    #[test]
    fn test_html_report_renders_entries() {
        let results = vec![("words".to_string(), StatsReport::new().with("word_count", 1200usize))];
        let html = render_html_report(&results).unwrap();
        assert!(html.contains("Word Count"));
        assert!(html.contains("1,200"));
    }

    #[test]
    fn test_summary_totals() {
        let mut first = TextAnalyzer::new("one two");
        let mut second = TextAnalyzer::new("three a@b.io");
        let all = vec![
            ("a.txt".to_string(), first.analyze_all()),
            ("b.txt".to_string(), second.analyze_all()),
        ];

        let summary = create_summary(&all);
        assert!(summary.contains("Inputs analyzed: 2"));
        assert!(summary.contains("Total words: 4"));
        assert!(summary.contains("Emails found: 1"));
    }
}
