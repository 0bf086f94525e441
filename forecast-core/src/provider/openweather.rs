use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::{City, Config, ForecastError, RawForecast};

use super::ForecastSource;

const FORECAST_PATH: &str = "/data/2.5/forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    /// Client with the transport's default timeout unless `timeout` is given.
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ForecastError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { api_key, base_url: base_url.into(), http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key()?;
        let client = Self::new(
            api_key,
            config.base_url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(client)
    }

    fn forecast_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), FORECAST_PATH)
    }

    /// Validates `city` before touching the network.
    pub async fn fetch(&self, city: &str) -> Result<RawForecast, ForecastError> {
        let city = City::parse(city)?;
        self.fetch_forecast(&city).await
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherClient {
    #[instrument(skip_all, fields(city = %city))]
    async fn fetch_forecast(&self, city: &City) -> Result<RawForecast, ForecastError> {
        let res = self
            .http
            .get(self.forecast_url())
            .query(&[("q", city.as_str()), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(classify)?;

        let status = res.status();
        let body = res.text().await.map_err(classify)?;

        debug!(%status, bytes = body.len(), "OpenWeather forecast response");

        if !status.is_success() {
            let message = serde_json::from_str::<RawForecast>(&body)
                .ok()
                .and_then(|parsed| parsed.message_text());
            info!(%status, ?message, "OpenWeather forecast request failed");
            return Err(ForecastError::HttpError { status: status.as_u16(), message });
        }

        let parsed: RawForecast = serde_json::from_str(&body).map_err(|e| {
            ForecastError::MalformedResponse(format!("{e} (body: {})", truncate_body(&body)))
        })?;

        if !parsed.is_success() {
            let message = parsed.message_text().unwrap_or_else(|| "unknown error".to_string());
            info!(cod = ?parsed.cod, %message, "OpenWeather reported an error");
            return Err(ForecastError::ApiError(message));
        }

        Ok(parsed)
    }
}

fn classify(err: reqwest::Error) -> ForecastError {
    // reqwest embeds the full URL, query string included, in its messages.
    let err = err.without_url();
    let classified = ForecastError::from(err);
    debug!(kind = %classified.kind(), "transport error");
    classified
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
