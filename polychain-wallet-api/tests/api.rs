//! HTTP API tests
//!
//! Every request goes through the full router with `oneshot`. The Ethereum
//! provider points at a closed local port, so enrichment always fails fast.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use polychain_wallet::rpc::{EthereumRpc, ProviderConfig};
use polychain_wallet::Network;
use polychain_wallet_api::router;
use polychain_wallet_api::state::AppState;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn app(network: Network) -> Router {
    let provider = ProviderConfig {
        url: "http://127.0.0.1:9".to_string(),
        timeout: 2,
        ..ProviderConfig::default()
    };
    let rpc = EthereumRpc::new(&provider).unwrap();
    router(Arc::new(AppState::new(network, rpc)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(Network::Testnet), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["network"], "testnet");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_create_wallet() {
    let (status, body) = send(app(Network::Testnet), get("/create-wallet")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mnemonic"].as_str().unwrap().split(' ').count(), 12);
    assert_eq!(body["network"], "testnet");

    let wallets = body["wallets"].as_object().unwrap();
    assert_eq!(wallets.len(), 5);
    for wallet in wallets.values() {
        assert_eq!(wallet["status"], "derived");
    }
    assert_eq!(body["addresses"].as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn test_create_wallet_with_word_count() {
    let (status, body) = send(app(Network::Testnet), get("/create-wallet?words=24")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mnemonic"].as_str().unwrap().split(' ').count(), 24);

    let (status, body) = send(app(Network::Testnet), get("/create-wallet?words=13")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("13"));
}

#[tokio::test]
async fn test_restore_wallet_known_vectors() {
    let (status, body) = send(
        app(Network::Mainnet),
        post_json("/restore-wallet", json!({ "mnemonic": ABANDON })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mnemonic"], ABANDON);
    assert_eq!(body["network"], "mainnet");

    let bitcoin = &body["wallets"]["Bitcoin"];
    assert_eq!(bitcoin["status"], "derived");
    assert_eq!(bitcoin["address"], "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    assert_eq!(bitcoin["privateKey"], "L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf");
    assert_eq!(bitcoin["derivationPath"], "m/44'/0'/0'/0/0");
    assert_eq!(
        bitcoin["accountXpub"],
        "xpub6BosfCnifzxcFwrSzQiqu2DBVTshkCXacvNsWGYJVVhhawA7d4R5WSWGFNbi8Aw6ZRc1brxMyWMzG3DSSSSoekkudhUd9yLb6qx39T9nMdj"
    );

    let ethereum = &body["wallets"]["Ethereum"];
    assert_eq!(ethereum["address"], "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert!(ethereum.get("balance").is_none());

    assert_eq!(body["addresses"]["Ethereum"], "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
}

#[tokio::test]
async fn test_restore_wallet_is_deterministic() {
    let request = || post_json("/restore-wallet", json!({ "mnemonic": ABANDON, "passphrase": "TREZOR" }));

    let (_, first) = send(app(Network::Testnet), request()).await;
    let (_, second) = send(app(Network::Testnet), request()).await;

    assert_eq!(first, second);

    // A passphrase selects a different wallet set
    let (_, plain) = send(app(Network::Testnet), post_json("/restore-wallet", json!({ "mnemonic": ABANDON }))).await;
    assert_ne!(first["addresses"], plain["addresses"]);
}

#[tokio::test]
async fn test_restore_wallet_normalizes_input() {
    let messy = format!("  {}  ", ABANDON.to_uppercase().replace(' ', "   "));
    let (status, body) = send(
        app(Network::Mainnet),
        post_json("/restore-wallet", json!({ "mnemonic": messy })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["addresses"]["Bitcoin"], "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
}

#[tokio::test]
async fn test_restore_wallet_rejects_invalid_mnemonic() {
    // Bad checksum
    let bad_checksum = ABANDON.replace("about", "abandon");
    let (status, body) = send(
        app(Network::Testnet),
        post_json("/restore-wallet", json!({ "mnemonic": bad_checksum })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid mnemonic"));

    // Unknown word
    let (status, _) = send(
        app(Network::Testnet),
        post_json("/restore-wallet", json!({ "mnemonic": ABANDON.replace("about", "zzzz") })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty phrase
    let (status, _) = send(
        app(Network::Testnet),
        post_json("/restore-wallet", json!({ "mnemonic": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restore_wallet_with_unavailable_enrichment() {
    let (status, body) = send(
        app(Network::Mainnet),
        post_json("/restore-wallet?enrich=true", json!({ "mnemonic": ABANDON })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let ethereum = &body["wallets"]["Ethereum"];
    assert_eq!(ethereum["address"], "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert_eq!(ethereum["balance"]["status"], "unavailable");
    assert!(ethereum["balance"]["reason"].is_string());

    // The rest of the set is untouched
    assert_eq!(body["wallets"]["Bitcoin"]["address"], "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    assert!(body["wallets"]["Bitcoin"].get("balance").is_none());
}

#[tokio::test]
async fn test_enrichment_route_reports_bad_gateway() {
    let (status, body) = send(app(Network::Mainnet), get("/ethereum/enrichment")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_enrichment_route_rejects_bad_address() {
    let (status, _) = send(app(Network::Mainnet), get("/ethereum/enrichment?address=0x1234")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restore_wallet_rejects_malformed_body() {
    // Missing field
    let (status, body) = send(app(Network::Testnet), post_json("/restore-wallet", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("mnemonic"));

    // Wrong type
    let (status, body) = send(
        app(Network::Testnet),
        post_json("/restore-wallet", json!({ "mnemonic": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Not JSON at all
    let request = Request::builder()
        .method(Method::POST)
        .uri("/restore-wallet")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(app(Network::Testnet), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // No content type
    let request = Request::builder()
        .method(Method::POST)
        .uri("/restore-wallet")
        .body(Body::from(json!({ "mnemonic": ABANDON }).to_string()))
        .unwrap();
    let (status, body) = send(app(Network::Testnet), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_query_strings() {
    let (status, body) = send(app(Network::Testnet), get("/create-wallet?words=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    let (status, body) = send(
        app(Network::Testnet),
        post_json("/restore-wallet?enrich=yes", json!({ "mnemonic": ABANDON })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
