//! Integration tests for the OpenWeather fetcher using wiremock
//!
//! These exercise request construction and every failure classification
//! against a mock HTTP server.

use std::time::Duration;

use chrono::Utc;
use forecast_core::{
    ErrorKind, ForecastController, ForecastDisplay, ForecastError, OpenWeatherClient, Outcome,
    render, summarize_in,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "test-key";
// Nothing listens on port 1 locally.
const CLOSED_PORT_URI: &str = "http://127.0.0.1:1";
// 2024-03-10T00:00:00Z
const START: i64 = 1_710_028_800;

/// Five days of 3-hourly samples; the midpoint of each day is "scattered clouds".
fn sample_forecast_response() -> serde_json::Value {
    let list: Vec<_> = (0..40)
        .map(|i| {
            let slot = i % 8;
            let (id, description) =
                if slot == 4 { (802, "scattered clouds") } else { (500, "light rain") };
            serde_json::json!({
                "dt": START + i * 3 * 3_600,
                "main": {"temp": 10.0 + slot as f64, "humidity": 70},
                "weather": [{"id": id, "main": "x", "description": description, "icon": "01d"}],
                "wind": {"speed": 3.1},
                "dt_txt": "ignored"
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": 40,
        "list": list,
        "city": {"id": 2643743, "name": "London", "country": "GB"}
    })
}

fn create_test_client(mock_server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(API_KEY.to_string(), mock_server.uri(), Some(Duration::from_secs(5)))
        .expect("Failed to create client")
}

async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn sends_city_key_and_metric_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch("  London ").await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let raw = result.unwrap();
    assert_eq!(raw.list.as_ref().map(Vec::len), Some(40));
    assert_eq!(raw.location_name().as_deref(), Some("London, GB"));
}

#[tokio::test]
async fn forecast_summarizes_to_five_midday_lines() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let raw = client.fetch("London").await.unwrap();
    let lines = summarize_in(&raw, &Utc).unwrap();

    assert_eq!(lines.len(), 5);
    for line in &lines {
        assert_eq!(line.description, "Scattered clouds");
        assert_eq!(line.temperature_c, 14.0);
    }

    let text = render(&lines);
    assert!(text.starts_with("2024-03-10\n\u{2601} Scattered clouds, 14.0°C"), "{text}");
    assert!(text.ends_with("2024-03-14\n\u{2601} Scattered clouds, 14.0°C"), "{text}");
}

#[tokio::test]
async fn numeric_cod_is_accepted() {
    let mock_server = MockServer::start().await;
    let mut body = sample_forecast_response();
    body["cod"] = serde_json::json!(200);
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(body)).await;

    let client = create_test_client(&mock_server);
    assert!(client.fetch("London").await.is_ok());
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn empty_city_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch(" \t ").await;

    assert!(matches!(result, Err(ForecastError::EmptyInput)), "got: {result:?}");
}

#[tokio::test]
async fn api_error_in_body_is_reported() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch("Atlantis").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ApiError);
    assert!(err.to_display_text().contains("city not found"), "{err}");
}

#[tokio::test]
async fn not_found_status_is_http_error_with_message() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(404)
            .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch("Atlantis").await;

    match result {
        Err(ForecastError::HttpError { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("city not found"));
        }
        other => panic!("Expected HttpError, got: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_http_error() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch("London").await;

    assert!(
        matches!(result, Err(ForecastError::HttpError { status: 500, message: None })),
        "Expected HttpError, got: {result:?}"
    );
}

#[tokio::test]
async fn invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_string("not json"))
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch("London").await;

    assert!(
        matches!(result, Err(ForecastError::MalformedResponse(_))),
        "Expected MalformedResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_forecast_response())
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let client = OpenWeatherClient::new(
        API_KEY.to_string(),
        mock_server.uri(),
        Some(Duration::from_millis(200)),
    )
    .expect("Failed to create client");
    let result = client.fetch("London").await;

    assert!(matches!(result, Err(ForecastError::Timeout)), "Expected Timeout, got: {result:?}");
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    let client = OpenWeatherClient::new(API_KEY.to_string(), CLOSED_PORT_URI, None)
        .expect("Failed to create client");
    let result = client.fetch("London").await;

    assert!(
        matches!(result, Err(ForecastError::ConnectionError)),
        "Expected ConnectionError, got: {result:?}"
    );
}

#[tokio::test]
async fn unbuildable_request_is_request_error() {
    let client = OpenWeatherClient::new(API_KEY.to_string(), "not a url", None)
        .expect("Failed to create client");
    let result = client.fetch("London").await;

    match &result {
        Err(ForecastError::RequestError(message)) => {
            assert!(message.contains("builder error"), "{message}");
            assert!(!message.contains(API_KEY), "{message}");
        }
        other => panic!("Expected RequestError, got: {other:?}"),
    }

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestError);
    assert!(err.to_display_text().starts_with("ERROR:\nRequest error: "));
}

#[tokio::test]
async fn error_text_never_leaks_api_key() {
    let client = OpenWeatherClient::new(API_KEY.to_string(), CLOSED_PORT_URI, None)
        .expect("Failed to create client");
    let err = client.fetch("London").await.unwrap_err();

    assert!(!err.to_display_text().contains(API_KEY));
}

// ============================================================================
// Controller end to end
// ============================================================================

#[derive(Debug, Default)]
struct Screen(std::sync::Mutex<String>);

impl ForecastDisplay for Screen {
    fn show(&self, text: &str) {
        *self.0.lock().unwrap() = text.to_string();
    }
}

#[tokio::test]
async fn controller_shows_api_error() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
    )
    .await;

    let ctl =
        ForecastController::new(create_test_client(&mock_server), "Atlantis", Screen::default());

    assert_eq!(ctl.execute().await, Outcome::Failed(ErrorKind::ApiError));
    assert_eq!(*ctl.display().0.lock().unwrap(), "ERROR:\nAPI error: city not found");
}

#[tokio::test]
async fn controller_shows_forecast() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
    )
    .await;

    let ctl =
        ForecastController::new(create_test_client(&mock_server), "London", Screen::default());

    // Five UTC days span at least five local dates in any timezone.
    assert_eq!(ctl.execute().await, Outcome::Displayed { days: 5 });

    let screen = ctl.display().0.lock().unwrap().clone();
    assert!(screen.contains("Scattered clouds") || screen.contains("Light rain"), "{screen}");
}
