/// Result mapping shared by every analysis category
///
/// A `StatsReport` keeps the "named statistics" shape of a dictionary while every value
/// stays one of a closed set of types. Keys keep their insertion order so reports render
/// in a stable, documented order.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single statistic value
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<StatValue>),
}

impl StatValue {
    /// Integer view; `None` for any other variant
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StatValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Real view; integers widen to `f64`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StatValue::Float(value) => Some(*value),
            StatValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StatValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StatValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StatValue]> {
        match self {
            StatValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Short name of the value type, written alongside values in CSV exports
    pub fn type_name(&self) -> &'static str {
        match self {
            StatValue::Bool(_) => "bool",
            StatValue::Int(_) => "int",
            StatValue::Float(_) => "float",
            StatValue::Text(_) => "str",
            StatValue::List(_) => "list",
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Bool(value) => write!(f, "{}", value),
            StatValue::Int(value) => write!(f, "{}", value),
            StatValue::Float(value) => write!(f, "{:.2}", value),
            StatValue::Text(value) => write!(f, "{}", value),
            StatValue::List(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<bool> for StatValue {
    fn from(value: bool) -> Self {
        StatValue::Bool(value)
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Int(value)
    }
}

impl From<usize> for StatValue {
    fn from(value: usize) -> Self {
        StatValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Float(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        StatValue::Text(value)
    }
}

impl From<char> for StatValue {
    fn from(value: char) -> Self {
        StatValue::Text(value.to_string())
    }
}

impl<T: Into<StatValue>> From<Vec<T>> for StatValue {
    fn from(values: Vec<T>) -> Self {
        StatValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping of metric name to value for one analysis category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    entries: Vec<(String, StatValue)>,
}

impl StatsReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a metric, replacing any previous value under the same name
    pub fn insert<K: Into<String>, V: Into<StatValue>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`StatsReport::insert`]
    pub fn with<K: Into<String>, V: Into<StatValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(StatValue::as_int)
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(StatValue::as_float)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(StatValue::as_bool)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StatValue::as_text)
    }

    pub fn get_list(&self, key: &str) -> Option<&[StatValue]> {
        self.get(key).and_then(StatValue::as_list)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for StatsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut report = StatsReport::new()
            .with("count", 3usize)
            .with("name", "Paris");
        report.insert("count", 5usize);

        let keys: Vec<_> = report.keys().collect();
        assert_eq!(keys, vec!["count", "name"]);
        assert_eq!(report.get_int("count"), Some(5));
        assert_eq!(report.get_text("name"), Some("Paris"));
    }

    #[test]
    fn test_typed_getters_reject_other_variants() {
        let report = StatsReport::new().with("flag", true).with("ratio", 0.5);
        assert_eq!(report.get_int("flag"), None);
        assert_eq!(report.get_bool("flag"), Some(true));
        assert_eq!(report.get_float("ratio"), Some(0.5));
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_serializes_as_ordered_json_object() {
        let report = StatsReport::new()
            .with("emails", vec!["a@b.io"])
            .with("count", 2usize);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"emails":["a@b.io"],"count":2}"#);
    }

    #[test]
    fn test_display_of_values() {
        assert_eq!(StatValue::from(4.0).to_string(), "4.00");
        assert_eq!(StatValue::from(vec![1usize, 2]).to_string(), "[1, 2]");
    }
}
