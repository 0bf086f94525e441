use std::fmt;

use thiserror::Error;

/// Everything that can end a fetch-and-render attempt.
///
/// None of these are retried; each one is shown to the user as inline text.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Please enter a city name")]
    EmptyInput,

    #[error("Connection error: check your internet")]
    ConnectionError,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error {status}{}", detail(.message))]
    HttpError {
        status: u16,
        message: Option<String>,
    },

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyInput,
    ConnectionError,
    Timeout,
    HttpError,
    RequestError,
    ApiError,
    MalformedResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::ConnectionError => "connection_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::HttpError => "http_error",
            ErrorKind::RequestError => "request_error",
            ErrorKind::ApiError => "api_error",
            ErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ForecastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::EmptyInput => ErrorKind::EmptyInput,
            ForecastError::ConnectionError => ErrorKind::ConnectionError,
            ForecastError::Timeout => ErrorKind::Timeout,
            ForecastError::HttpError { .. } => ErrorKind::HttpError,
            ForecastError::RequestError(_) => ErrorKind::RequestError,
            ForecastError::ApiError(_) => ErrorKind::ApiError,
            ForecastError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    /// Text written to the display surface in place of a forecast.
    pub fn to_display_text(&self) -> String {
        format!("ERROR:\n{self}")
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForecastError::Timeout
        } else if err.is_connect() {
            ForecastError::ConnectionError
        } else {
            ForecastError::RequestError(err.to_string())
        }
    }
}
