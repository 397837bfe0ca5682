//! Integration tests for the Polymarket API clients against a mock server.
//!
//! Verifies market resolution fallbacks, holder/trade/position fetching
//! with envelope and field-name variants, order book parsing, and retry
//! behavior on transient server errors.

use edge_scan_polymarket::{ClobClient, DataApiClient, GammaClient, RetryPolicy};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    }
}

// =============================================================================
// Gamma API
// =============================================================================

#[tokio::test]
async fn resolves_market_by_slug() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/slug/acme-q3-earnings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conditionId": "0xabc",
            "question": "Will ACME beat Q3 earnings?",
            "endDate": "2025-10-24T13:00:00Z",
            "clobTokenIds": ["no-token", "yes-token"]
        })))
        .mount(&server)
        .await;

    let client = GammaClient::new().with_base_url(server.uri());
    let market = client.resolve_market("acme-q3-earnings").await.unwrap();

    assert_eq!(market.condition_id, "0xabc");
    assert_eq!(market.title, "Will ACME beat Q3 earnings?");
    assert_eq!(market.yes_token_id.as_deref(), Some("yes-token"));
    assert_eq!(market.slug.as_deref(), Some("acme-q3-earnings"));
}

#[tokio::test]
async fn resolves_market_from_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/slug/acme-q3-earnings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conditionId": "0xabc",
            "question": "Will ACME beat Q3 earnings?"
        })))
        .mount(&server)
        .await;

    let client = GammaClient::new().with_base_url(server.uri());
    let market = client
        .resolve_market("https://polymarket.com/event/acme-q3-earnings?tid=42")
        .await
        .unwrap();

    assert_eq!(market.condition_id, "0xabc");
}

#[tokio::test]
async fn resolves_market_by_condition_id_from_list_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("condition_id", "0xabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"conditionId": "0xabc", "question": "Will ACME beat Q3 earnings?"}
        ])))
        .mount(&server)
        .await;

    let client = GammaClient::new().with_base_url(server.uri());
    let market = client.resolve_market("0xabc").await.unwrap();

    assert_eq!(market.condition_id, "0xabc");
}

#[tokio::test]
async fn unresolvable_market_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = GammaClient::new().with_base_url(server.uri());
    let result = client.resolve_market("no-such-market").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn retries_transient_server_errors() {
    let server = MockServer::start().await;

    // First attempt fails with a 500, the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/markets/slug/acme-q3-earnings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/markets/slug/acme-q3-earnings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conditionId": "0xabc",
            "question": "Will ACME beat Q3 earnings?"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GammaClient::new()
        .with_base_url(server.uri())
        .with_retry_policy(fast_retry());
    let market = client.get_market_by_slug("acme-q3-earnings").await.unwrap();

    assert_eq!(market.condition_id, "0xabc");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/slug/bad-slug"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GammaClient::new()
        .with_base_url(server.uri())
        .with_retry_policy(fast_retry());
    let result = client.get_market_by_slug("bad-slug").await;

    assert!(result.is_err());
}

// =============================================================================
// Data API
// =============================================================================

#[tokio::test]
async fn fetches_holders_from_token_groups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/holders"))
        .and(query_param("market", "0xabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "token": "yes-token",
                "holders": [
                    {"proxyWallet": "0x1", "outcomeIndex": 1, "amountUSD": 6000.0},
                    {"proxyWallet": "0x2", "outcomeIndex": 1, "amountUSD": "1500.25"}
                ]
            },
            {
                "token": "no-token",
                "holders": [
                    {"user": "0x3", "outcome_index": 0, "value_usd": 4000.0},
                    {"noAddressHere": true}
                ]
            }
        ])))
        .mount(&server)
        .await;

    let client = DataApiClient::new().with_base_url(server.uri());
    let holders = client.get_holders("0xabc", 500).await.unwrap();

    // The record without an address is skipped, not fatal.
    assert_eq!(holders.len(), 3);
    assert_eq!(holders[0].address, "0x1");
    assert!((holders[1].amount_usd - 1500.25).abs() < 1e-9);
    assert_eq!(holders[2].address, "0x3");
}

#[tokio::test]
async fn fetches_closed_positions_with_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/closed-positions"))
        .and(query_param("user", "0x1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "title": "ACME quarterly earnings",
                    "pnlUSD": 800.0,
                    "wasWinner": true,
                    "resolvedAt": "2025-07-25T20:00:00Z",
                    "amountRisked": 1000.0
                },
                {
                    "marketTitle": "ACME EPS beat",
                    "pnl": -2000.0,
                    "won": false,
                    "closedAt": 1_730_000_000,
                    "investment": 2000.0
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = DataApiClient::new().with_base_url(server.uri());
    let positions = client.get_closed_positions("0x1", None, 500).await.unwrap();

    assert_eq!(positions.len(), 2);
    assert!(positions[0].was_winner);
    assert!(!positions[1].was_winner);
    assert!((positions[1].risked_stake() - 2000.0).abs() < 1e-9);
}

#[tokio::test]
async fn fetches_trades_for_market_and_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("market", "0xabc"))
        .and(query_param("user", "0x1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"timestamp": 1_730_000_000, "side": "buy", "price": 0.6, "size": 100.0}
        ])))
        .mount(&server)
        .await;

    let client = DataApiClient::new().with_base_url(server.uri());
    let trades = client
        .get_trades(Some("0xabc"), Some("0x1"), 1000)
        .await
        .unwrap();

    assert_eq!(trades.len(), 1);
    assert!((trades[0].amount_usd - 60.0).abs() < 1e-9);
}

// =============================================================================
// CLOB API
// =============================================================================

#[tokio::test]
async fn fetches_order_book_and_computes_mid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/book"))
        .and(query_param("token_id", "yes-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bids": [
                {"price": "0.70", "size": "100"},
                {"price": "0.72", "size": "50"}
            ],
            "asks": [
                {"price": "0.78", "size": "80"},
                {"price": "0.76", "size": "40"}
            ]
        })))
        .mount(&server)
        .await;

    let client = ClobClient::new().with_base_url(server.uri());
    let book = client.get_order_book("yes-token").await.unwrap();

    assert_eq!(book.bids.len(), 2);
    assert_eq!(book.asks.len(), 2);
    let mid = book.mid_price_f64().unwrap();
    assert!((mid - 0.74).abs() < 1e-9);
}

#[tokio::test]
async fn empty_order_book_has_no_mid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/book"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bids": [],
            "asks": []
        })))
        .mount(&server)
        .await;

    let client = ClobClient::new().with_base_url(server.uri());
    let book = client.get_order_book("thin-token").await.unwrap();

    assert!(book.mid_price_f64().is_none());
}
