//! Core library for the `forecast` five-day weather tool.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeather forecast fetcher behind the [`ForecastSource`] seam
//! - The summarizer that reduces 3-hourly samples to one line per day
//! - A UI-independent controller driving fetch → summarize → display
//!
//! It is used by `forecast-cli`, but can also be driven from a GUI or a test harness.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod summary;

pub use config::Config;
pub use controller::{CityInput, ForecastController, ForecastDisplay, Outcome};
pub use error::{ErrorKind, ForecastError};
pub use model::{
    City, DailyGroup, ForecastLine, ForecastSample, RawEntry, RawForecast, Timestamped,
};
pub use provider::{ForecastSource, openweather::OpenWeatherClient, source_from_config};
pub use summary::{Condition, render, summarize, summarize_in};
