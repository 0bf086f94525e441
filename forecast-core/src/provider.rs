use async_trait::async_trait;
use std::fmt::Debug;

use crate::{City, Config, ForecastError, RawForecast, provider::openweather::OpenWeatherClient};

pub mod openweather;

/// Something that can produce a raw 5-day forecast for a city.
///
/// Implementations make at most one outbound request per call and never retry.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, city: &City) -> Result<RawForecast, ForecastError>;
}

#[async_trait]
impl<T: ForecastSource + ?Sized> ForecastSource for Box<T> {
    async fn fetch_forecast(&self, city: &City) -> Result<RawForecast, ForecastError> {
        (**self).fetch_forecast(city).await
    }
}

/// Construct the OpenWeather source from config, resolving the API key.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let client = OpenWeatherClient::from_config(config)?;
    Ok(Box::new(client))
}
