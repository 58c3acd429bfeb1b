/// Core text analyzer implementation
///
/// This file contains the implementation of the TextAnalyzer which derives character,
/// word, line and pattern statistics from a document and keeps every computed category
/// for report generation.

use std::cmp::Ordering;
use std::collections::HashSet;

use log::{debug, info};

use crate::core::document::TextDocument;
use crate::core::patterns::{self, CharClass};
use crate::core::report::StatsReport;
use crate::core::stats::{
    AnalysisCache, Category, CharacterStats, ConditionChecks, LineStats, PatternStats,
    RegexExtraction, WordSizeStats, WordStats,
};
use crate::utils::output_formatter;

/// Core text analyzer structure
pub struct TextAnalyzer {
    /// Document under analysis, never modified
    document: TextDocument,

    /// Categories computed so far
    cache: AnalysisCache,
}

impl TextAnalyzer {
    /// Create a new TextAnalyzer instance
    ///
    /// # Arguments
    ///
    /// * `document` - The document to analyze
    ///
    /// # Returns
    ///
    /// A new TextAnalyzer with an empty cache
    pub fn new<D: Into<TextDocument>>(document: D) -> Self {
        Self {
            document: document.into(),
            cache: AnalysisCache::default(),
        }
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    /// Categories analyzed so far
    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn analyzed_categories(&self) -> Vec<Category> {
        self.cache.categories()
    }

    fn text(&self) -> &str {
        self.document.text()
    }

    /// Character statistics, `None` for an empty document
    pub fn character_stats(&self) -> Option<CharacterStats> {
        let text = self.text();
        if text.is_empty() {
            return None;
        }

        let mut stats = CharacterStats {
            count: 0,
            letters: 0,
            digits: 0,
            spaces: 0,
            is_empty: false,
        };

        for c in text.chars() {
            stats.count += 1;
            match patterns::classify_char(c) {
                CharClass::Letter => stats.letters += 1,
                CharClass::Digit => stats.digits += 1,
                CharClass::Space => stats.spaces += 1,
                CharClass::Other => {}
            }
        }

        Some(stats)
    }

    /// Word statistics, `None` when the document has no words
    pub fn word_stats(&self) -> Option<WordStats> {
        let words = patterns::tokenize(self.text());
        if words.is_empty() {
            return None;
        }

        let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let total_len: usize = words.iter().map(|w| patterns::word_len(w)).sum();

        // first word wins ties
        let longest = words.iter().fold("", |best, word| {
            if patterns::word_len(word) > patterns::word_len(best) {
                *word
            } else {
                best
            }
        });

        Some(WordStats {
            word_count: words.len(),
            unique_word_count: unique.len(),
            longest_word: longest.to_string(),
            average_word_length: total_len as f64 / words.len() as f64,
        })
    }

    /// Line statistics, `None` for an empty document
    pub fn line_stats(&self) -> Option<LineStats> {
        let text = self.text();
        if text.is_empty() {
            return None;
        }

        let lines: Vec<&str> = text.lines().collect();
        let blank = lines.iter().filter(|line| line.trim().is_empty()).count();

        let mut longest = "";
        let mut longest_len = 0;
        for line in &lines {
            let len = line.chars().count();
            if len > longest_len {
                longest = *line;
                longest_len = len;
            }
        }

        Some(LineStats {
            line_count: lines.len(),
            blank_line_count: blank,
            non_blank_line_count: lines.len() - blank,
            longest_line: longest.to_string(),
            words_per_line: lines.iter().map(|line| patterns::tokenize(line).len()).collect(),
        })
    }

    /// Word-shape counts, `None` for an empty document
    pub fn pattern_stats(&self) -> Option<PatternStats> {
        if self.document.is_empty() {
            return None;
        }

        let words = patterns::tokenize(self.text());
        let count = |predicate: fn(&str) -> bool| words.iter().filter(|w| predicate(w)).count();

        Some(PatternStats {
            words_starting_with_vowel: count(patterns::starts_with_vowel),
            words_ending_with_period: count(patterns::ends_with_period),
            words_starting_with_uppercase: count(patterns::starts_with_uppercase),
        })
    }

    /// Emails and integer literals, `None` for an empty document
    pub fn regex_extraction(&self) -> Option<RegexExtraction> {
        if self.document.is_empty() {
            return None;
        }

        Some(RegexExtraction {
            emails: patterns::find_all("email", self.text()),
            numbers: patterns::find_all("number", self.text()),
        })
    }

    /// Boolean checks over characters and words, `None` for an empty document
    pub fn condition_checks(&self) -> Option<ConditionChecks> {
        let text = self.text();
        if text.is_empty() {
            return None;
        }

        let words = patterns::tokenize(text);

        Some(ConditionChecks {
            has_digits: text.chars().any(patterns::is_digit),
            has_letters: text.chars().any(patterns::is_letter),
            has_spaces: text.chars().any(char::is_whitespace),
            all_words_short: words.iter().all(|w| patterns::is_short_word(w)),
            has_any_long_word: words.iter().any(|w| !patterns::is_short_word(w)),
            all_chars_alphabetic: text.chars().all(patterns::is_letter),
        })
    }

    /// Word lengths compared to the average, `None` for an empty document
    pub fn word_size_stats(&self) -> Option<WordSizeStats> {
        if self.document.is_empty() {
            return None;
        }

        let lengths: Vec<usize> = patterns::tokenize(self.text())
            .iter()
            .map(|w| patterns::word_len(w))
            .collect();

        let mut stats = WordSizeStats {
            average_word_length: 0.0,
            short_word_count: 0,
            long_word_count: 0,
            equal_word_count: 0,
        };

        if lengths.is_empty() {
            return Some(stats);
        }

        let average = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        stats.average_word_length = average;

        for len in lengths {
            match (len as f64).partial_cmp(&average) {
                Some(Ordering::Less) => stats.short_word_count += 1,
                Some(Ordering::Greater) => stats.long_word_count += 1,
                _ => stats.equal_word_count += 1,
            }
        }

        Some(stats)
    }

    /// Analyze characters and cache the result
    ///
    /// # Returns
    ///
    /// `{count, letters, digits, spaces, is_empty}`, or an empty report for empty text
    pub fn analyze_characters(&mut self) -> StatsReport {
        debug!("Analyzing characters");
        self.cache.characters = self.character_stats();
        self.cache.characters.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    /// Analyze words and cache the result
    ///
    /// # Returns
    ///
    /// `{word_count, unique_word_count, longest_word, average_word_length}`, or an empty
    /// report when the text has no words
    pub fn analyze_words(&mut self) -> StatsReport {
        debug!("Analyzing words");
        self.cache.words = self.word_stats();
        self.cache.words.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    pub fn analyze_lines(&mut self) -> StatsReport {
        debug!("Analyzing lines");
        self.cache.lines = self.line_stats();
        self.cache.lines.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    pub fn detect_patterns(&mut self) -> StatsReport {
        debug!("Detecting word patterns");
        self.cache.patterns = self.pattern_stats();
        self.cache.patterns.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    pub fn extract_with_regex(&mut self) -> StatsReport {
        debug!("Extracting emails and numbers");
        self.cache.regex = self.regex_extraction();
        self.cache.regex.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    pub fn verify_conditions(&mut self) -> StatsReport {
        debug!("Verifying text conditions");
        self.cache.conditions = self.condition_checks();
        self.cache.conditions.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    pub fn analyze_word_sizes(&mut self) -> StatsReport {
        debug!("Analyzing word sizes");
        self.cache.word_sizes = self.word_size_stats();
        self.cache.word_sizes.as_ref().map(StatsReport::from).unwrap_or_default()
    }

    /// Run one category
    pub fn analyze(&mut self, category: Category) -> StatsReport {
        match category {
            Category::Characters => self.analyze_characters(),
            Category::Words => self.analyze_words(),
            Category::Lines => self.analyze_lines(),
            Category::Patterns => self.detect_patterns(),
            Category::Regex => self.extract_with_regex(),
            Category::Conditions => self.verify_conditions(),
            Category::WordSizes => self.analyze_word_sizes(),
        }
    }

    /// Run every category in report order
    ///
    /// # Returns
    ///
    /// `(category name, report)` pairs, one per category
    pub fn analyze_all(&mut self) -> Vec<(String, StatsReport)> {
        info!("Running all analyses on {} characters", self.document.char_count());

        Category::ALL
            .iter()
            .map(|category| (category.as_str().to_string(), self.analyze(*category)))
            .collect()
    }

    /// Human-readable report of the categories analyzed so far
    ///
    /// Returns an explanatory message when nothing has been analyzed yet.
    pub fn generate_report(&self) -> String {
        output_formatter::format_text_report(&self.document, &self.cache)
    }
}
