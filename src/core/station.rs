/// Weather station: a collection of measurements plus station configuration
///
/// The station owns its measurements and the set of cities they came from. Filters
/// and summaries are pure reads; the only mutations are adding measurements and
/// (re)writing the configuration.

use std::collections::BTreeSet;

use log::{debug, info};
use serde::Serialize;

use crate::core::measurement::Measurement;
use crate::core::patterns::{self, DEFAULT_MAX_CELSIUS, DEFAULT_MIN_CELSIUS};
use crate::core::report::StatsReport;

/// Sensors every station carries
pub const STATION_SENSORS: [&str; 3] = ["temperature", "humidity", "pressure"];

/// Temperature alert bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min: f64,
    pub max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_CELSIUS,
            max: DEFAULT_MAX_CELSIUS,
        }
    }
}

/// Station identity and settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationConfig {
    pub name: String,
    pub altitude: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub sensors: Vec<String>,
    pub thresholds: Option<Thresholds>,
}

impl StationConfig {
    fn new(name: &str, altitude: i64, latitude: f64, longitude: f64, active: bool) -> Self {
        Self {
            name: name.to_string(),
            altitude,
            latitude,
            longitude,
            active,
            sensors: STATION_SENSORS.iter().map(|s| s.to_string()).collect(),
            thresholds: None,
        }
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self::new("unnamed", 0, 0.0, 0.0, true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeatherStation {
    measurements: Vec<Measurement>,
    config: StationConfig,
    observed_cities: BTreeSet<String>,
}

impl WeatherStation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Station holding the given measurements
    pub fn with_measurements<I: IntoIterator<Item = Measurement>>(measurements: I) -> Self {
        let mut station = Self::new();
        for measurement in measurements {
            station.add_measurement(measurement);
        }
        station
    }

    /// Replace the station configuration
    ///
    /// # Arguments
    ///
    /// * `name` - Station name
    /// * `altitude` - Altitude in metres
    /// * `latitude`, `longitude` - Position in decimal degrees
    /// * `active` - Whether the station is reporting
    ///
    /// # Returns
    ///
    /// The new configuration, with the standard sensor list and no thresholds
    pub fn create_config(
        &mut self,
        name: &str,
        altitude: i64,
        latitude: f64,
        longitude: f64,
        active: bool,
    ) -> &StationConfig {
        info!("Configuring station {}", name);
        self.config = StationConfig::new(name, altitude, latitude, longitude, active);
        &self.config
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Set temperature thresholds, defaulting to -10.0 and 40.0
    pub fn configure_thresholds(&mut self, min: Option<f64>, max: Option<f64>) -> &StationConfig {
        let thresholds = Thresholds {
            min: min.unwrap_or(DEFAULT_MIN_CELSIUS),
            max: max.unwrap_or(DEFAULT_MAX_CELSIUS),
        };
        debug!("Thresholds set to {:?}", thresholds);
        self.config.thresholds = Some(thresholds);
        &self.config
    }

    /// Configured thresholds, or the defaults
    pub fn thresholds(&self) -> Thresholds {
        self.config.thresholds.unwrap_or_default()
    }

    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.observed_cities.insert(measurement.city().to_string());
        self.measurements.push(measurement);
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn observed_cities(&self) -> &BTreeSet<String> {
        &self.observed_cities
    }

    /// Measurement at `index`, or the latest one when `index` is `None`
    pub fn measurement_or_default(&self, index: Option<usize>) -> Option<&Measurement> {
        match index {
            Some(index) => self.measurements.get(index),
            None => self.measurements.last(),
        }
    }

    /// Measurements outside the configured thresholds
    pub fn out_of_range(&self) -> Vec<&Measurement> {
        let Thresholds { min, max } = self.thresholds();
        self.measurements
            .iter()
            .filter(|m| m.temperature() < min || m.temperature() > max)
            .collect()
    }

    pub fn filter_by_min_temperature(&self, min: f64) -> Vec<&Measurement> {
        self.measurements.iter().filter(|m| m.temperature() >= min).collect()
    }

    /// Case-insensitive city prefix match
    pub fn filter_by_city_prefix(&self, prefix: &str) -> Vec<&Measurement> {
        let prefix = prefix.to_lowercase();
        self.measurements
            .iter()
            .filter(|m| m.city().to_lowercase().starts_with(&prefix))
            .collect()
    }

    pub fn filter_by_rain(&self, rainy: bool) -> Vec<&Measurement> {
        self.measurements.iter().filter(|m| m.is_rainy() == rainy).collect()
    }

    /// Aggregate statistics over every measurement; empty station gives an empty report
    pub fn summarize(&self) -> StatsReport {
        if self.measurements.is_empty() {
            return StatsReport::new();
        }

        let temperatures: Vec<f64> = self.measurements.iter().map(Measurement::temperature).collect();
        let average = temperatures.iter().sum::<f64>() / temperatures.len() as f64;
        let min = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let rainy = self.measurements.iter().filter(|m| m.is_rainy()).count();
        let cities: Vec<String> = self.observed_cities.iter().cloned().collect();

        StatsReport::new()
            .with("measurement_count", self.measurements.len())
            .with("average_temperature", average)
            .with("min_temperature", min)
            .with("max_temperature", max)
            .with("rainy_count", rainy)
            .with("cities", cities)
    }

    pub fn cities_in_common(&self, other: &BTreeSet<String>) -> BTreeSet<String> {
        self.observed_cities.intersection(other).cloned().collect()
    }

    pub fn all_cities(&self, other: &BTreeSet<String>) -> BTreeSet<String> {
        self.observed_cities.union(other).cloned().collect()
    }

    pub fn is_disjoint(&self, other: &BTreeSet<String>) -> bool {
        self.observed_cities.is_disjoint(other)
    }

    /// Classify the lines of a raw station log
    ///
    /// Lines are trimmed and blank lines dropped. Comments start with `#`, temperature
    /// lines mention a temperature and end in `°C`, alert lines contain `!`.
    ///
    /// # Returns
    ///
    /// `{total_lines, comment_lines, temperature_lines, alert_lines}`, or an empty report
    /// for empty input
    pub fn analyze_raw_data(raw: &str) -> StatsReport {
        if raw.is_empty() {
            return StatsReport::new();
        }

        let lines: Vec<&str> = raw.lines().map(str::trim).filter(|line| !line.is_empty()).collect();

        let comments = lines.iter().filter(|line| line.starts_with('#')).count();
        let temperatures = lines
            .iter()
            .filter(|line| patterns::is_match("temperature_line", line))
            .count();
        let alerts = lines.iter().filter(|line| line.contains('!')).count();

        StatsReport::new()
            .with("total_lines", lines.len())
            .with("comment_lines", comments)
            .with("temperature_lines", temperatures)
            .with("alert_lines", alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_station() -> WeatherStation {
        WeatherStation::with_measurements(vec![
            Measurement::new(18.5, 65, 1013, "Paris", false).unwrap(),
            Measurement::new(22.3, 78, 1008, "Lyon", true).unwrap(),
            Measurement::new(-12.0, 40, 1020, "Berlin", false).unwrap(),
            Measurement::new(15.0, 70, 1011, "Paris", true).unwrap(),
        ])
    }

    #[test]
    fn test_create_config() {
        let mut station = WeatherStation::new();
        let config = station.create_config("Station-Paris", 35, 48.8566, 2.3522, true);

        assert_eq!(config.name, "Station-Paris");
        assert_eq!(config.sensors.len(), 3);
        assert!(config.thresholds.is_none());
    }

    #[test]
    fn test_thresholds_defaults() {
        let mut station = sample_station();
        assert_eq!(station.thresholds(), Thresholds { min: -10.0, max: 40.0 });

        station.configure_thresholds(Some(0.0), None);
        assert_eq!(station.thresholds(), Thresholds { min: 0.0, max: 40.0 });

        let out: Vec<&str> = station.out_of_range().iter().map(|m| m.city()).collect();
        assert_eq!(out, vec!["Berlin"]);
    }

    #[test]
    fn test_measurement_or_default() {
        let station = sample_station();
        assert_eq!(station.measurement_or_default(None).map(|m| m.temperature()), Some(15.0));
        assert_eq!(station.measurement_or_default(Some(1)).map(|m| m.city()), Some("Lyon"));
        assert!(station.measurement_or_default(Some(10)).is_none());
        assert!(WeatherStation::new().measurement_or_default(None).is_none());
    }

    #[test]
    fn test_observed_cities_are_deduplicated() {
        let station = sample_station();
        let cities: Vec<&str> = station.observed_cities().iter().map(String::as_str).collect();
        assert_eq!(cities, vec!["Berlin", "Lyon", "Paris"]);

        let france: BTreeSet<String> = ["Paris", "Lyon", "Marseille"].iter().map(|s| s.to_string()).collect();
        assert_eq!(station.cities_in_common(&france).len(), 2);
        assert_eq!(station.all_cities(&france).len(), 4);
        assert!(!station.is_disjoint(&france));
    }

    #[test]
    fn test_filters() {
        let station = sample_station();
        assert_eq!(station.filter_by_min_temperature(18.0).len(), 2);
        assert_eq!(station.filter_by_city_prefix("pa").len(), 2);
        assert_eq!(station.filter_by_rain(true).len(), 2);
        assert!(WeatherStation::new().filter_by_rain(true).is_empty());
    }

    #[test]
    fn test_summarize() {
        let summary = sample_station().summarize();
        assert_eq!(summary.get_int("measurement_count"), Some(4));
        assert_eq!(summary.get_float("min_temperature"), Some(-12.0));
        assert_eq!(summary.get_float("max_temperature"), Some(22.3));
        assert_eq!(summary.get_int("rainy_count"), Some(2));
        assert_eq!(summary.get_list("cities").map(|c| c.len()), Some(3));

        assert!(WeatherStation::new().summarize().is_empty());
    }

    #[test]
    fn test_analyze_raw_data() {
        let raw = "\n# Weather data\n# Station readings\nTemperature: 18.5°C\nHumidity: 65%\nPressure: 1013 hPa\nStrong wind alert !\n# End of readings\n";
        let stats = WeatherStation::analyze_raw_data(raw);

        assert_eq!(stats.get_int("total_lines"), Some(7));
        assert_eq!(stats.get_int("comment_lines"), Some(3));
        assert_eq!(stats.get_int("temperature_lines"), Some(1));
        assert_eq!(stats.get_int("alert_lines"), Some(1));

        assert!(WeatherStation::analyze_raw_data("").is_empty());
    }
}
