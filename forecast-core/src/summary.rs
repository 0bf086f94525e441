//! Reduces the 3-hourly forecast list to one line per calendar day.

use chrono::{Local, TimeZone};
use tracing::debug;

use crate::{
    error::ForecastError,
    model::{DailyGroup, ForecastLine, RawForecast, Timestamped},
};

/// Number of days shown.
pub const MAX_DAYS: usize = 5;

/// Groups at least this large use their midpoint sample instead of the first.
pub const MIDPOINT_THRESHOLD: usize = 5;

/// Weather category derived from an OpenWeather condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    VolcanicAsh,
    Squall,
    Tornado,
    Clear,
    Clouds,
    Unknown,
}

impl Condition {
    /// Ranges are checked in order; the first match wins.
    pub fn from_code(code: u32) -> Self {
        match code {
            200..=232 => Condition::Thunderstorm,
            300..=321 => Condition::Drizzle,
            500..=531 => Condition::Rain,
            600..=622 => Condition::Snow,
            701..=741 => Condition::Atmosphere,
            762 => Condition::VolcanicAsh,
            771 => Condition::Squall,
            781 => Condition::Tornado,
            800 => Condition::Clear,
            801..=804 => Condition::Clouds,
            _ => Condition::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Condition::Thunderstorm => "\u{1F329}",
            Condition::Drizzle => "\u{1F326}",
            Condition::Rain => "\u{1F327}",
            Condition::Snow => "\u{1F328}",
            Condition::Atmosphere => "\u{1F32B}",
            Condition::VolcanicAsh => "\u{1F30B}",
            Condition::Squall => "\u{1F4A8}",
            Condition::Tornado => "\u{1F32A}",
            Condition::Clear => "\u{2600}",
            Condition::Clouds => "\u{2601}",
            Condition::Unknown => "\u{2753}",
        }
    }
}

/// Buckets items by calendar date in `tz`, keeping first-seen date order.
pub fn group_by_date<T, Tz>(samples: &[T], tz: &Tz) -> Vec<DailyGroup<T>>
where
    T: Timestamped + Clone,
    Tz: TimeZone,
{
    let mut groups: Vec<DailyGroup<T>> = Vec::new();

    for sample in samples {
        let date = sample.timestamp().with_timezone(tz).date_naive();

        match groups.iter_mut().rev().find(|g| g.date == date) {
            Some(group) => group.samples.push(sample.clone()),
            None => groups.push(DailyGroup { date, samples: vec![sample.clone()] }),
        }
    }

    groups
}

/// The sample that stands in for a whole day.
///
/// Groups are never empty by construction, so indexing is in bounds.
pub fn representative<T>(group: &DailyGroup<T>) -> &T {
    let count = group.samples.len();
    if count >= MIDPOINT_THRESHOLD { &group.samples[count / 2] } else { &group.samples[0] }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Rounds half away from zero to one decimal; never yields negative zero.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

/// Summarizes using the machine's local timezone.
pub fn summarize(raw: &RawForecast) -> Result<Vec<ForecastLine>, ForecastError> {
    summarize_in(raw, &Local)
}

pub fn summarize_in<Tz: TimeZone>(
    raw: &RawForecast,
    tz: &Tz,
) -> Result<Vec<ForecastLine>, ForecastError> {
    // Grouping needs every `dt`; only the entries actually shown are parsed in full.
    let entries = raw.entries()?;
    let groups = group_by_date(&entries, tz);

    debug!(samples = entries.len(), days = groups.len(), "grouped forecast samples");

    groups
        .iter()
        .take(MAX_DAYS)
        .map(|group| -> Result<ForecastLine, ForecastError> {
            let sample = representative(group).parse()?;
            Ok(ForecastLine {
                date: group.date,
                condition: Condition::from_code(sample.condition_code),
                description: capitalize(&sample.description),
                temperature_c: round_tenths(sample.temperature_c),
            })
        })
        .collect()
}

/// Joins lines into the text shown on the display surface.
pub fn render(lines: &[ForecastLine]) -> String {
    let mut output = String::new();
    for line in lines {
        output.push_str(&line.to_string());
        output.push_str("\n\n");
    }
    output.trim().to_string()
}
