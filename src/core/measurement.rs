/// Weather measurement model and its analyses
///
/// A `Measurement` is validated once at construction and never changes afterwards;
/// every analysis here is a pure function of its fields.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{AnalyzerError, Result};
use crate::core::patterns::{
    COLD_CELSIUS, COMFORT_CELSIUS, COMFORT_HUMIDITY, FREEZING_CELSIUS, HEATWAVE_CELSIUS,
    HOT_CELSIUS, HUMIDITY_HIGH, HUMIDITY_LOW, HUMIDITY_VERY_HIGH,
};
use crate::core::report::StatsReport;

/// One weather observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    temperature: f64,
    humidity: i64,
    pressure: i64,
    city: String,
    is_rainy: bool,
}

impl Measurement {
    /// Create a validated measurement
    ///
    /// # Arguments
    ///
    /// * `temperature` - Temperature in degrees Celsius
    /// * `humidity` - Relative humidity in percent, 0 to 100
    /// * `pressure` - Atmospheric pressure in hPa
    /// * `city` - Where the measurement was taken, non-empty
    /// * `is_rainy` - Whether it is raining
    ///
    /// # Returns
    ///
    /// The measurement, or `InvalidMeasurement` for out-of-range values
    pub fn new<S: Into<String>>(
        temperature: f64,
        humidity: i64,
        pressure: i64,
        city: S,
        is_rainy: bool,
    ) -> Result<Self> {
        let city = city.into();

        if !temperature.is_finite() {
            return Err(AnalyzerError::InvalidMeasurement(format!(
                "temperature must be finite, got {}",
                temperature
            )));
        }
        if !(0..=100).contains(&humidity) {
            return Err(AnalyzerError::InvalidMeasurement(format!(
                "humidity must be between 0 and 100, got {}",
                humidity
            )));
        }
        if city.trim().is_empty() {
            return Err(AnalyzerError::InvalidMeasurement("city must not be empty".to_string()));
        }

        Ok(Self {
            temperature,
            humidity,
            pressure,
            city,
            is_rainy,
        })
    }

    /// Build a measurement from loosely-typed input
    ///
    /// Expects an object with `temperature` (int or float), `humidity` (int),
    /// `pressure` (int), `city` (str) and `is_rainy` (bool). A field of the wrong type
    /// fails with `InvalidArgumentType`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AnalyzerError::wrong_type("measurement", "object", value))?;

        let field = |name: &str| {
            object
                .get(name)
                .ok_or_else(|| AnalyzerError::MissingField(name.to_string()))
        };

        let temperature = field("temperature")?;
        let temperature = temperature
            .as_f64()
            .ok_or_else(|| AnalyzerError::wrong_type("temperature", "int or float", temperature))?;

        let humidity = field("humidity")?;
        let humidity = humidity
            .as_i64()
            .ok_or_else(|| AnalyzerError::wrong_type("humidity", "int", humidity))?;

        let pressure = field("pressure")?;
        let pressure = pressure
            .as_i64()
            .ok_or_else(|| AnalyzerError::wrong_type("pressure", "int", pressure))?;

        let city = field("city")?;
        let city = city
            .as_str()
            .ok_or_else(|| AnalyzerError::wrong_type("city", "str", city))?;

        let is_rainy = field("is_rainy")?;
        let is_rainy = is_rainy
            .as_bool()
            .ok_or_else(|| AnalyzerError::wrong_type("is_rainy", "bool", is_rainy))?;

        Self::new(temperature, humidity, pressure, city, is_rainy)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> i64 {
        self.humidity
    }

    pub fn pressure(&self) -> i64 {
        self.pressure
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn is_rainy(&self) -> bool {
        self.is_rainy
    }

    /// Classify humidity against the 30 / 80 thresholds
    pub fn analyze_humidity(&self) -> HumidityAnalysis {
        let humidity = self.humidity;

        let (level, gap_message) = if humidity < HUMIDITY_LOW {
            (
                HumidityLevel::Dry,
                format!(
                    "Missing {} to reach the low threshold of {}.",
                    HUMIDITY_LOW - humidity,
                    HUMIDITY_LOW
                ),
            )
        } else if humidity < HUMIDITY_HIGH {
            (
                HumidityLevel::Normal,
                format!(
                    "Missing {} to reach the high threshold of {}.",
                    HUMIDITY_HIGH - humidity,
                    HUMIDITY_HIGH
                ),
            )
        } else {
            (
                HumidityLevel::Humid,
                format!(
                    "Exceeds the high threshold of {} by {}.",
                    HUMIDITY_HIGH,
                    humidity - HUMIDITY_HIGH
                ),
            )
        };

        HumidityAnalysis {
            level: level.value(),
            description: level.description().to_string(),
            gap_message,
        }
    }

    /// Temperature in the three usual scales
    pub fn analyze_temperature(&self) -> TemperatureAnalysis {
        let celsius = self.temperature;

        TemperatureAnalysis {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + 273.15,
            rounded: (celsius * 10.0).round_ties_even() / 10.0,
            rounded_whole: celsius.round_ties_even() as i64,
            freezing: celsius <= FREEZING_CELSIUS,
            heatwave: celsius >= HEATWAVE_CELSIUS,
        }
    }

    /// Properties and case transformations of the city name
    pub fn analyze_city_name(&self) -> CityAnalysis {
        let name = self.city.as_str();
        let cased: Vec<char> = name.chars().filter(|c| c.is_lowercase() || c.is_uppercase()).collect();

        CityAnalysis {
            name: name.to_string(),
            length: name.chars().count(),
            first_char: name.chars().next().map(String::from).unwrap_or_default(),
            last_char: name.chars().last().map(String::from).unwrap_or_default(),
            has_spaces: name.contains(' '),
            alphabetic: !name.is_empty() && name.chars().all(char::is_alphabetic),
            all_uppercase: !cased.is_empty() && cased.iter().all(|c| c.is_uppercase()),
            uppercase: name.to_uppercase(),
            lowercase: name.to_lowercase(),
            capitalized: capitalize(name),
        }
    }

    /// Boolean weather flags from the fixed thresholds
    pub fn analyze_conditions(&self) -> WeatherConditions {
        let cold = self.temperature < COLD_CELSIUS;
        let hot = self.temperature > HOT_CELSIUS;
        let very_humid = self.humidity > HUMIDITY_VERY_HIGH;
        let extreme = cold || hot;

        WeatherConditions {
            rain: self.is_rainy,
            cold,
            hot,
            pleasant: !self.is_rainy && !extreme,
            very_humid,
            cold_and_humid: cold && very_humid,
            extreme,
            comfortable: self.is_comfortable(),
        }
    }

    /// Within the 18–22 °C and 45–65 % comfort band
    pub fn is_comfortable(&self) -> bool {
        let (min_c, max_c) = COMFORT_CELSIUS;
        let (min_h, max_h) = COMFORT_HUMIDITY;
        (min_c..=max_c).contains(&self.temperature) && (min_h..=max_h).contains(&self.humidity)
    }

    /// Every measurement analysis as `(category name, report)` pairs
    pub fn analyze_all(&self) -> Vec<(String, StatsReport)> {
        vec![
            ("humidity".to_string(), StatsReport::from(&self.analyze_humidity())),
            ("temperature".to_string(), StatsReport::from(&self.analyze_temperature())),
            ("city".to_string(), StatsReport::from(&self.analyze_city_name())),
            ("weather_conditions".to_string(), StatsReport::from(&self.analyze_conditions())),
        ]
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1}°C, {}% humidity, {} hPa, {}",
            self.city,
            self.temperature,
            self.humidity,
            self.pressure,
            if self.is_rainy { "rainy" } else { "dry" }
        )
    }
}

/// First character uppercased, the rest lowercased
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Humidity level bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumidityLevel {
    Dry,
    Normal,
    Humid,
}

impl HumidityLevel {
    pub fn value(&self) -> u8 {
        match self {
            HumidityLevel::Dry => 1,
            HumidityLevel::Normal => 2,
            HumidityLevel::Humid => 3,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HumidityLevel::Dry => "Dry",
            HumidityLevel::Normal => "Normal",
            HumidityLevel::Humid => "Humid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidityAnalysis {
    pub level: u8,
    pub description: String,
    pub gap_message: String,
}

impl From<&HumidityAnalysis> for StatsReport {
    fn from(analysis: &HumidityAnalysis) -> Self {
        StatsReport::new()
            .with("level", i64::from(analysis.level))
            .with("description", analysis.description.as_str())
            .with("gap_message", analysis.gap_message.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureAnalysis {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
    pub rounded: f64,
    pub rounded_whole: i64,
    pub freezing: bool,
    pub heatwave: bool,
}

impl From<&TemperatureAnalysis> for StatsReport {
    fn from(analysis: &TemperatureAnalysis) -> Self {
        StatsReport::new()
            .with("celsius", analysis.celsius)
            .with("fahrenheit", analysis.fahrenheit)
            .with("kelvin", analysis.kelvin)
            .with("rounded", analysis.rounded)
            .with("rounded_whole", analysis.rounded_whole)
            .with("freezing", analysis.freezing)
            .with("heatwave", analysis.heatwave)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityAnalysis {
    pub name: String,
    pub length: usize,
    pub first_char: String,
    pub last_char: String,
    pub has_spaces: bool,
    pub alphabetic: bool,
    pub all_uppercase: bool,
    pub uppercase: String,
    pub lowercase: String,
    pub capitalized: String,
}

impl From<&CityAnalysis> for StatsReport {
    fn from(analysis: &CityAnalysis) -> Self {
        StatsReport::new()
            .with("name", analysis.name.as_str())
            .with("length", analysis.length)
            .with("first_char", analysis.first_char.as_str())
            .with("last_char", analysis.last_char.as_str())
            .with("has_spaces", analysis.has_spaces)
            .with("alphabetic", analysis.alphabetic)
            .with("all_uppercase", analysis.all_uppercase)
            .with("uppercase", analysis.uppercase.as_str())
            .with("lowercase", analysis.lowercase.as_str())
            .with("capitalized", analysis.capitalized.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherConditions {
    pub rain: bool,
    pub cold: bool,
    pub hot: bool,
    pub pleasant: bool,
    pub very_humid: bool,
    pub cold_and_humid: bool,
    pub extreme: bool,
    pub comfortable: bool,
}

impl From<&WeatherConditions> for StatsReport {
    fn from(conditions: &WeatherConditions) -> Self {
        StatsReport::new()
            .with("rain", conditions.rain)
            .with("cold", conditions.cold)
            .with("hot", conditions.hot)
            .with("pleasant", conditions.pleasant)
            .with("very_humid", conditions.very_humid)
            .with("cold_and_humid", conditions.cold_and_humid)
            .with("extreme", conditions.extreme)
            .with("comfortable", conditions.comfortable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paris(humidity: i64) -> Measurement {
        Measurement::new(18.5, humidity, 1013, "Paris", false).unwrap()
    }

    #[test]
    fn test_humidity_bands() {
        let normal = paris(65).analyze_humidity();
        assert_eq!(normal.level, 2);
        assert_eq!(normal.description, "Normal");
        assert!(normal.gap_message.contains("15"));
        assert!(normal.gap_message.contains("80"));

        let dry = paris(20).analyze_humidity();
        assert_eq!((dry.level, dry.description.as_str()), (1, "Dry"));
        assert!(dry.gap_message.contains("10") && dry.gap_message.contains("30"));

        let humid = paris(95).analyze_humidity();
        assert_eq!((humid.level, humid.description.as_str()), (3, "Humid"));
        assert!(humid.gap_message.contains("15"));
    }

    #[test]
    fn test_humidity_threshold_edges() {
        assert_eq!(paris(30).analyze_humidity().level, 2);
        assert_eq!(paris(29).analyze_humidity().level, 1);
        assert_eq!(paris(80).analyze_humidity().level, 3);
    }

    #[test]
    fn test_temperature_conversion() {
        let zero = Measurement::new(0.0, 50, 1013, "Oslo", false).unwrap().analyze_temperature();
        assert_eq!(zero.fahrenheit, 32.0);
        assert_eq!(zero.kelvin, 273.15);
        assert!(zero.freezing);
        assert!(!zero.heatwave);

        let warm = Measurement::new(36.04, 20, 1010, "Seville", false).unwrap().analyze_temperature();
        assert_eq!(warm.rounded, 36.0);
        assert_eq!(warm.rounded_whole, 36);
        assert!(warm.heatwave);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        let quarter = Measurement::new(18.25, 50, 1013, "Nice", false).unwrap().analyze_temperature();
        assert_eq!(quarter.rounded, 18.2);

        let half = Measurement::new(18.5, 50, 1013, "Nice", false).unwrap().analyze_temperature();
        assert_eq!(half.rounded, 18.5);
        assert_eq!(half.rounded_whole, 18);

        let odd_half = Measurement::new(19.5, 50, 1013, "Nice", false).unwrap().analyze_temperature();
        assert_eq!(odd_half.rounded_whole, 20);
    }

    #[test]
    fn test_city_name() {
        let city = Measurement::new(10.0, 50, 1000, "new york", true).unwrap().analyze_city_name();
        assert_eq!(city.length, 8);
        assert_eq!(city.first_char, "n");
        assert_eq!(city.last_char, "k");
        assert!(city.has_spaces);
        assert!(!city.alphabetic);
        assert!(!city.all_uppercase);
        assert_eq!(city.uppercase, "NEW YORK");
        assert_eq!(city.capitalized, "New york");

        let upper = Measurement::new(10.0, 50, 1000, "LYON", true).unwrap().analyze_city_name();
        assert!(upper.all_uppercase);
        assert!(upper.alphabetic);
    }

    #[test]
    fn test_conditions() {
        let conditions = paris(50).analyze_conditions();
        assert!(conditions.pleasant);
        assert!(conditions.comfortable);
        assert!(!conditions.extreme);

        let freezing = Measurement::new(2.0, 90, 1000, "Reykjavik", false).unwrap().analyze_conditions();
        assert!(freezing.cold);
        assert!(freezing.cold_and_humid);
        assert!(!freezing.pleasant);

        let rainy = Measurement::new(20.0, 50, 1000, "Lyon", true).unwrap().analyze_conditions();
        assert!(rainy.rain);
        assert!(!rainy.pleasant);
    }

    #[test]
    fn test_from_value_type_checks() {
        let ok = Measurement::from_value(&json!({
            "temperature": 18.5, "humidity": 65, "pressure": 1013,
            "city": "Paris", "is_rainy": false
        }));
        assert!(ok.is_ok());

        let int_temperature = Measurement::from_value(&json!({
            "temperature": 18, "humidity": 65, "pressure": 1013,
            "city": "Paris", "is_rainy": false
        }));
        assert_eq!(int_temperature.unwrap().temperature(), 18.0);

        let err = Measurement::from_value(&json!({
            "temperature": "18.5", "humidity": 65, "pressure": 1013,
            "city": "Paris", "is_rainy": false
        }))
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidArgumentType { ref field, .. } if field == "temperature"));

        let err = Measurement::from_value(&json!({
            "temperature": 18.5, "humidity": 65.5, "pressure": 1013,
            "city": "Paris", "is_rainy": false
        }))
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidArgumentType { ref field, .. } if field == "humidity"));

        let err = Measurement::from_value(&json!({
            "temperature": 18.5, "humidity": 65, "pressure": 1013,
            "city": "Paris", "is_rainy": "no"
        }))
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidArgumentType { ref field, .. } if field == "is_rainy"));
    }

    #[test]
    fn test_semantic_validation() {
        assert!(matches!(
            Measurement::new(18.5, 120, 1013, "Paris", false),
            Err(AnalyzerError::InvalidMeasurement(_))
        ));
        assert!(matches!(
            Measurement::new(18.5, 65, 1013, "  ", false),
            Err(AnalyzerError::InvalidMeasurement(_))
        ));
        assert!(matches!(
            Measurement::new(f64::NAN, 65, 1013, "Paris", false),
            Err(AnalyzerError::InvalidMeasurement(_))
        ));

        let missing = Measurement::from_value(&json!({"temperature": 1.0}));
        assert_eq!(missing.unwrap_err(), AnalyzerError::MissingField("humidity".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(paris(65).to_string(), "Paris: 18.5°C, 65% humidity, 1013 hPa, dry");
    }

    #[test]
    fn test_analyze_all_categories() {
        let categories: Vec<String> = paris(65).analyze_all().into_iter().map(|(name, _)| name).collect();
        assert_eq!(categories, vec!["humidity", "temperature", "city", "weather_conditions"]);

        let reports = paris(65).analyze_all();
        assert_eq!(reports[0].1.get_int("level"), Some(2));
        assert_eq!(reports[1].1.get_float("celsius"), Some(18.5));
    }
}
