/// Typed statistics records produced by the text analyzer
///
/// Each record converts into a [`StatsReport`] whose keys are fixed per category, so a
/// category report always carries the same keys with the same value types.

use std::fmt;

use serde::Serialize;

use crate::core::report::StatsReport;

/// Analysis categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Characters,
    Words,
    Lines,
    Patterns,
    Regex,
    Conditions,
    WordSizes,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Characters,
        Category::Words,
        Category::Lines,
        Category::Patterns,
        Category::Regex,
        Category::Conditions,
        Category::WordSizes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Characters => "characters",
            Category::Words => "words",
            Category::Lines => "lines",
            Category::Patterns => "patterns",
            Category::Regex => "regex",
            Category::Conditions => "conditions",
            Category::WordSizes => "word_sizes",
        }
    }

    /// Section heading used in reports
    pub fn title(&self) -> &'static str {
        match self {
            Category::Characters => "Characters",
            Category::Words => "Words",
            Category::Lines => "Lines",
            Category::Patterns => "Patterns",
            Category::Regex => "Extracted Entities",
            Category::Conditions => "Conditions",
            Category::WordSizes => "Word Sizes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterStats {
    pub count: usize,
    pub letters: usize,
    pub digits: usize,
    pub spaces: usize,
    pub is_empty: bool,
}

impl From<&CharacterStats> for StatsReport {
    fn from(stats: &CharacterStats) -> Self {
        StatsReport::new()
            .with("count", stats.count)
            .with("letters", stats.letters)
            .with("digits", stats.digits)
            .with("spaces", stats.spaces)
            .with("is_empty", stats.is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordStats {
    pub word_count: usize,
    pub unique_word_count: usize,
    pub longest_word: String,
    pub average_word_length: f64,
}

impl From<&WordStats> for StatsReport {
    fn from(stats: &WordStats) -> Self {
        StatsReport::new()
            .with("word_count", stats.word_count)
            .with("unique_word_count", stats.unique_word_count)
            .with("longest_word", stats.longest_word.as_str())
            .with("average_word_length", stats.average_word_length)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStats {
    pub line_count: usize,
    pub blank_line_count: usize,
    pub non_blank_line_count: usize,
    pub longest_line: String,
    pub words_per_line: Vec<usize>,
}

impl From<&LineStats> for StatsReport {
    fn from(stats: &LineStats) -> Self {
        StatsReport::new()
            .with("line_count", stats.line_count)
            .with("blank_line_count", stats.blank_line_count)
            .with("non_blank_line_count", stats.non_blank_line_count)
            .with("longest_line", stats.longest_line.as_str())
            .with("words_per_line", stats.words_per_line.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternStats {
    pub words_starting_with_vowel: usize,
    pub words_ending_with_period: usize,
    pub words_starting_with_uppercase: usize,
}

impl From<&PatternStats> for StatsReport {
    fn from(stats: &PatternStats) -> Self {
        StatsReport::new()
            .with("words_starting_with_vowel", stats.words_starting_with_vowel)
            .with("words_ending_with_period", stats.words_ending_with_period)
            .with("words_starting_with_uppercase", stats.words_starting_with_uppercase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegexExtraction {
    pub emails: Vec<String>,
    pub numbers: Vec<String>,
}

impl From<&RegexExtraction> for StatsReport {
    fn from(stats: &RegexExtraction) -> Self {
        StatsReport::new()
            .with("emails", stats.emails.clone())
            .with("numbers", stats.numbers.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionChecks {
    pub has_digits: bool,
    pub has_letters: bool,
    pub has_spaces: bool,
    pub all_words_short: bool,
    pub has_any_long_word: bool,
    pub all_chars_alphabetic: bool,
}

impl From<&ConditionChecks> for StatsReport {
    fn from(stats: &ConditionChecks) -> Self {
        StatsReport::new()
            .with("has_digits", stats.has_digits)
            .with("has_letters", stats.has_letters)
            .with("has_spaces", stats.has_spaces)
            .with("all_words_short", stats.all_words_short)
            .with("has_any_long_word", stats.has_any_long_word)
            .with("all_chars_alphabetic", stats.all_chars_alphabetic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordSizeStats {
    pub average_word_length: f64,
    pub short_word_count: usize,
    pub long_word_count: usize,
    pub equal_word_count: usize,
}

impl From<&WordSizeStats> for StatsReport {
    fn from(stats: &WordSizeStats) -> Self {
        StatsReport::new()
            .with("average_word_length", stats.average_word_length)
            .with("short_word_count", stats.short_word_count)
            .with("long_word_count", stats.long_word_count)
            .with("equal_word_count", stats.equal_word_count)
    }
}

/// Categories computed so far for one document
///
/// Only ever filled in; recomputing a category stores an identical value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisCache {
    pub characters: Option<CharacterStats>,
    pub words: Option<WordStats>,
    pub lines: Option<LineStats>,
    pub patterns: Option<PatternStats>,
    pub regex: Option<RegexExtraction>,
    pub conditions: Option<ConditionChecks>,
    pub word_sizes: Option<WordSizeStats>,
}

impl AnalysisCache {
    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Characters => self.characters.is_some(),
            Category::Words => self.words.is_some(),
            Category::Lines => self.lines.is_some(),
            Category::Patterns => self.patterns.is_some(),
            Category::Regex => self.regex.is_some(),
            Category::Conditions => self.conditions.is_some(),
            Category::WordSizes => self.word_sizes.is_some(),
        }
    }

    /// Cached categories, in report order
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|category| self.contains(*category))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    /// Report for a cached category; `None` if it has not been computed
    pub fn report(&self, category: Category) -> Option<StatsReport> {
        match category {
            Category::Characters => self.characters.as_ref().map(StatsReport::from),
            Category::Words => self.words.as_ref().map(StatsReport::from),
            Category::Lines => self.lines.as_ref().map(StatsReport::from),
            Category::Patterns => self.patterns.as_ref().map(StatsReport::from),
            Category::Regex => self.regex.as_ref().map(StatsReport::from),
            Category::Conditions => self.conditions.as_ref().map(StatsReport::from),
            Category::WordSizes => self.word_sizes.as_ref().map(StatsReport::from),
        }
    }
}
