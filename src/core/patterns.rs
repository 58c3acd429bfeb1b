/// Pattern definitions and fixed thresholds for the analyzers
///
/// This module holds the regex patterns used to extract entities from text, the
/// word-level classifiers used by pattern detection, and every threshold constant the
/// text and weather analyses rely on.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Vowels recognised at the start of a word (compared lowercase)
pub const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'y'];

/// Words with at most this many characters are "short"
pub const SHORT_WORD_MAX_LEN: usize = 3;

/// Number of characters of the source text shown in a report header
pub const REPORT_PREVIEW_LEN: usize = 25;

/// Humidity below this is dry
pub const HUMIDITY_LOW: i64 = 30;
/// Humidity at or above this is humid
pub const HUMIDITY_HIGH: i64 = 80;
/// Humidity above this counts as very humid in condition checks
pub const HUMIDITY_VERY_HIGH: i64 = 85;

pub const FREEZING_CELSIUS: f64 = 0.0;
pub const HEATWAVE_CELSIUS: f64 = 35.5;
pub const COLD_CELSIUS: f64 = 5.0;
pub const HOT_CELSIUS: f64 = 30.0;

/// Comfort band, inclusive on both ends
pub const COMFORT_CELSIUS: (f64, f64) = (18.0, 22.0);
pub const COMFORT_HUMIDITY: (i64, i64) = (45, 65);

/// Default station thresholds when none are configured
pub const DEFAULT_MIN_CELSIUS: f64 = -10.0;
pub const DEFAULT_MAX_CELSIUS: f64 = 40.0;

/// Get regular expressions for entity extraction.
pub fn get_patterns() -> HashMap<String, String> {
    let mut patterns = HashMap::new();

    patterns.insert("email".to_string(), r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b".to_string());
    patterns.insert("number".to_string(), r"\b\d+\b".to_string());

    // Raw station data lines
    patterns.insert("temperature_line".to_string(), r"(?i:temp[eé]rature).*°C$".to_string());

    // Single-character classes, Unicode letters and decimal digits
    patterns.insert("letter".to_string(), r"^\p{L}$".to_string());
    patterns.insert("digit".to_string(), r"^\p{Nd}$".to_string());

    patterns
}

/// Helper function to compile pattern
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Error compiling pattern: {}", e);
            None
        }
    }
}

/// Precompile every pattern once
pub fn precompile_patterns() -> HashMap<String, Regex> {
    let patterns = get_patterns();
    let mut compiled = HashMap::new();

    for (name, pattern) in patterns {
        if let Some(regex) = compile_pattern(&pattern) {
            compiled.insert(name, regex);
        }
    }

    compiled
}

lazy_static! {
    /// Precompiled patterns available globally
    pub static ref COMPILED_PATTERNS: HashMap<String, Regex> = precompile_patterns();
}

/// All matches of a named pattern, in order of appearance
///
/// An unknown pattern name yields no matches.
pub fn find_all(name: &str, text: &str) -> Vec<String> {
    match COMPILED_PATTERNS.get(name) {
        Some(regex) => regex.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        None => {
            log::warn!("Unknown pattern requested: {}", name);
            Vec::new()
        }
    }
}

/// Whether a named pattern matches anywhere in `text`
pub fn is_match(name: &str, text: &str) -> bool {
    COMPILED_PATTERNS
        .get(name)
        .map(|regex| regex.is_match(text))
        .unwrap_or(false)
}

/// Split text into words on runs of whitespace
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Length of a word in characters
pub fn word_len(word: &str) -> usize {
    word.chars().count()
}

pub fn starts_with_vowel(word: &str) -> bool {
    word.chars()
        .next()
        .and_then(|c| c.to_lowercase().next())
        .map(|c| VOWELS.contains(&c))
        .unwrap_or(false)
}

pub fn starts_with_uppercase(word: &str) -> bool {
    word.chars().next().map(char::is_uppercase).unwrap_or(false)
}

pub fn ends_with_period(word: &str) -> bool {
    word.ends_with('.')
}

pub fn is_short_word(word: &str) -> bool {
    word_len(word) <= SHORT_WORD_MAX_LEN
}

/// Unicode letter (general category `L`)
pub fn is_letter(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_match("letter", c.encode_utf8(&mut buf))
}

/// Unicode decimal digit (`Nd`), the class `\d` matches in the number pattern
pub fn is_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_match("digit", c.encode_utf8(&mut buf))
}

/// Kind of a single character, first match wins in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Letter,
    Digit,
    Space,
    Other,
}

pub fn classify_char(c: char) -> CharClass {
    if is_letter(c) {
        CharClass::Letter
    } else if is_digit(c) {
        CharClass::Digit
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}
