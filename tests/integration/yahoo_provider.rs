//! YahooClient against a mock HTTP server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use tick_stocks::api::{MarketDataProvider, YahooClient};
use tick_stocks::models::Config;
use tick_stocks::PipelineError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{chart_payload, not_found_payload};
use crate::common::test_data;

fn client_for(server: &MockServer) -> YahooClient {
    let config = Config {
        market_data_base_url: server.uri(),
        http_timeout_secs: 5,
        ..Config::default()
    };
    YahooClient::new(&config).expect("client should build")
}

#[tokio::test]
async fn test_fetch_parses_daily_bars() {
    let server = MockServer::start().await;
    let bars = test_data::create_test_series(21);

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .and(query_param("range", "1mo"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload(&bars)))
        .expect(1)
        .mount(&server)
        .await;

    let series = client_for(&server).fetch("AAPL", "1mo").await.unwrap();
    assert_eq!(series, bars);
}

#[tokio::test]
async fn test_ticker_cannot_rewrite_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL%23X"))
        .and(query_param("range", "1mo"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_payload()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload(&test_data::create_test_series(5))))
        .expect(0)
        .mount(&server)
        .await;

    let series = client_for(&server).fetch("AAPL#X", "1mo").await.unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn test_unknown_symbol_is_empty_series() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_payload()))
        .mount(&server)
        .await;

    let series = client_for(&server).fetch("NOPE", "1mo").await.unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn test_server_error_is_source_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).fetch("AAPL", "1y").await.unwrap_err();
    assert_matches!(err, PipelineError::SourceUnavailable { ref ticker, .. } if ticker == "AAPL");
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_source_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch("AAPL", "3mo").await;
    assert_matches!(result, Err(PipelineError::SourceUnavailable { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_source_unavailable() {
    let config = Config {
        market_data_base_url: "http://127.0.0.1:1".to_string(),
        http_timeout_secs: 2,
        ..Config::default()
    };
    let client = YahooClient::new(&config).unwrap();

    let result = client.fetch("AAPL", "1mo").await;
    assert_matches!(result, Err(PipelineError::SourceUnavailable { .. }));
}
