use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ForecastError;
use crate::summary::Condition;

/// A city name as typed by the user: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City(String);

impl City {
    pub fn parse(input: &str) -> Result<Self, ForecastError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ForecastError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `cod` field arrives as `"200"` on success and sometimes as a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Text(String),
    Number(i64),
}

impl StatusCode {
    pub const SUCCESS: &'static str = "200";

    pub fn is_success(&self) -> bool {
        match self {
            StatusCode::Text(s) => s.trim() == Self::SUCCESS,
            StatusCode::Number(n) => n.to_string() == Self::SUCCESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// Parsed body of `/data/2.5/forecast`.
///
/// Entries under `list` stay untyped here so that a structurally broken
/// sample is reported by the summarizer, not by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub cod: Option<StatusCode>,
    /// A string on errors; OpenWeather sends `0` on success.
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub list: Option<Vec<Value>>,
    #[serde(default)]
    pub city: Option<CityInfo>,
}

impl RawForecast {
    pub fn is_success(&self) -> bool {
        self.cod.as_ref().is_some_and(StatusCode::is_success)
    }

    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// "Name, CC" when the response carries a city block.
    pub fn location_name(&self) -> Option<String> {
        let city = self.city.as_ref()?;
        Some(match city.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", city.name, country),
            _ => city.name.clone(),
        })
    }

    fn list(&self) -> Result<&[Value], ForecastError> {
        self.list.as_deref().ok_or_else(|| {
            ForecastError::MalformedResponse("response has no `list` field".to_string())
        })
    }

    /// Every entry parsed in full; any broken entry fails the whole list.
    pub fn samples(&self) -> Result<Vec<ForecastSample>, ForecastError> {
        self.list()?
            .iter()
            .enumerate()
            .map(|(idx, entry)| ForecastSample::from_entry(entry).map_err(|e| reindex(e, idx)))
            .collect()
    }

    /// Entries with only `dt` read; the rest is parsed on demand via [`RawEntry::parse`].
    pub fn entries(&self) -> Result<Vec<RawEntry<'_>>, ForecastError> {
        self.list()?
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let dt = value.get("dt").and_then(Value::as_i64).ok_or_else(|| {
                    ForecastError::MalformedResponse("missing or non-integer `dt`".to_string())
                });
                dt.and_then(timestamp_from_unix)
                    .map(|timestamp| RawEntry { index, timestamp, value })
                    .map_err(|e| reindex(e, index))
            })
            .collect()
    }
}

/// Anything that can be placed on a calendar date.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// A `list` entry whose timestamp has been read but whose body has not.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry<'a> {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    value: &'a Value,
}

impl RawEntry<'_> {
    pub fn parse(&self) -> Result<ForecastSample, ForecastError> {
        ForecastSample::from_entry(self.value).map_err(|e| reindex(e, self.index))
    }
}

impl Timestamped for RawEntry<'_> {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn timestamp_from_unix(dt: i64) -> Result<DateTime<Utc>, ForecastError> {
    DateTime::from_timestamp(dt, 0).ok_or_else(|| {
        ForecastError::MalformedResponse(format!("timestamp {dt} out of range"))
    })
}

fn reindex(err: ForecastError, idx: usize) -> ForecastError {
    match err {
        ForecastError::MalformedResponse(msg) => {
            ForecastError::MalformedResponse(format!("list[{idx}]: {msg}"))
        }
        other => other,
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// One 3-hour reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub condition_code: u32,
    pub description: String,
}

impl ForecastSample {
    pub fn from_entry(entry: &Value) -> Result<Self, ForecastError> {
        let parsed = OwForecastEntry::deserialize(entry)
            .map_err(|e| ForecastError::MalformedResponse(e.to_string()))?;

        let weather = parsed.weather.into_iter().next().ok_or_else(|| {
            ForecastError::MalformedResponse("`weather` array is empty".to_string())
        })?;

        let timestamp = timestamp_from_unix(parsed.dt)?;

        Ok(Self {
            timestamp,
            temperature_c: parsed.main.temp,
            condition_code: weather.id,
            description: weather.description,
        })
    }
}

impl Timestamped for ForecastSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// All samples that fall on one calendar date, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGroup<T = ForecastSample> {
    pub date: NaiveDate,
    pub samples: Vec<T>,
}

/// One rendered day.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastLine {
    pub date: NaiveDate,
    pub condition: Condition,
    pub description: String,
    pub temperature_c: f64,
}

impl fmt::Display for ForecastLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} {}, {:.1}°C",
            self.date.format("%Y-%m-%d"),
            self.condition.glyph(),
            self.description,
            self.temperature_c,
        )
    }
}
