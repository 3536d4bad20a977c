use crate::settled;
use dashboard::hooks::{
    ApiConfig, FetchError, FetchOptions, FetchState, use_api,
};
use payloads::TransportError;
use reqwest::Method;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::{StubResponse, spawn_backend};

#[tokio::test]
async fn success_sends_json_accept_header() -> anyhow::Result<()> {
    let backend = spawn_backend([(
        "/api/spaces",
        StubResponse::json(test_helpers::mock::spaces()),
    )])
    .await;
    let client = Arc::new(backend.client.clone());

    let handle = use_api(client, "/api/spaces", ApiConfig::default());
    let state = settled(&handle).await?;

    assert_eq!(state.error, None);
    assert_eq!(
        state.data,
        FetchState::Fetched(test_helpers::mock::spaces())
    );
    let hits = backend.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].method, "GET");
    assert_eq!(hits[0].accept.as_deref(), Some("application/json"));
    Ok(())
}

#[tokio::test]
async fn error_detail_is_extracted_from_json_or_text() -> anyhow::Result<()> {
    let backend = spawn_backend([
        (
            "/api/busy",
            StubResponse::status(429, r#"{"detail":"rate limited"}"#),
        ),
        ("/api/gateway", StubResponse::status(502, "bad gateway")),
    ])
    .await;
    let client = Arc::new(backend.client.clone());

    let busy = use_api(client.clone(), "/api/busy", ApiConfig::default());
    let state = settled(&busy).await?;
    assert_eq!(state.error_message().as_deref(), Some("Error 429: rate limited"));
    assert_eq!(state.data, FetchState::NotFetched);

    let gateway = use_api(client.clone(), "/api/gateway", ApiConfig::default());
    let state = settled(&gateway).await?;
    assert_eq!(state.error_message().as_deref(), Some("Error 502: bad gateway"));

    let missing = use_api(client, "/api/nowhere", ApiConfig::default());
    let state = settled(&missing).await?;
    assert_eq!(
        state.error,
        Some(FetchError::Status {
            status: 404,
            detail: "Not Found".into()
        })
    );
    Ok(())
}

#[tokio::test]
async fn no_content_resolves_to_null() -> anyhow::Result<()> {
    let backend =
        spawn_backend([("/api/ack", StubResponse::status(204, ""))]).await;

    let handle = use_api(
        Arc::new(backend.client.clone()),
        "/api/ack",
        ApiConfig::default(),
    );
    let state = settled(&handle).await?;

    assert_eq!(state.data, FetchState::Fetched(Value::Null));
    assert_eq!(state.error, None);
    Ok(())
}

#[tokio::test]
async fn request_options_reach_the_backend() -> anyhow::Result<()> {
    let backend = spawn_backend([(
        "/api/orders",
        StubResponse::json(json!({"ok": true})),
    )])
    .await;
    let config = ApiConfig {
        options: FetchOptions {
            method: Method::POST,
            headers: [("X-Client".to_string(), "dashboard".to_string())].into(),
            body: Some(json!({"sku": "ALU-PURO", "qty": 3})),
            timeout: None,
        },
        ..ApiConfig::default()
    };

    let handle = use_api(Arc::new(backend.client.clone()), "/api/orders", config);
    let state = settled(&handle).await?;
    assert_eq!(state.data, FetchState::Fetched(json!({"ok": true})));

    let hits = backend.hits();
    assert_eq!(hits[0].method, "POST");
    assert_eq!(hits[0].content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&hits[0].body)?;
    assert_eq!(body, json!({"sku": "ALU-PURO", "qty": 3}));
    Ok(())
}

#[tokio::test]
async fn slow_responses_time_out() -> anyhow::Result<()> {
    let backend = spawn_backend([(
        "/api/slow",
        StubResponse::json(json!([])).after(Duration::from_secs(2)),
    )])
    .await;
    let config = ApiConfig {
        options: FetchOptions {
            timeout: Some(Duration::from_millis(100)),
            ..FetchOptions::default()
        },
        ..ApiConfig::default()
    };

    let handle = use_api(Arc::new(backend.client.clone()), "/api/slow", config);
    let state = settled(&handle).await?;

    assert_eq!(
        state.error,
        Some(FetchError::Transport(TransportError::Timeout))
    );
    assert_eq!(
        state.error_message().as_deref(),
        Some("Request timed out. Please try again.")
    );
    Ok(())
}

#[tokio::test]
async fn incremental_polling_sends_the_cursor() -> anyhow::Result<()> {
    let backend = spawn_backend([(
        "/api/events",
        StubResponse::json(json!({"lastUpdated": "c-1", "items": [1]})),
    )])
    .await;
    let config = ApiConfig {
        polling_interval: Duration::from_millis(100),
        incremental: true,
        ..ApiConfig::default()
    };

    let _handle = use_api(Arc::new(backend.client.clone()), "/api/events", config);

    tokio::time::timeout(Duration::from_secs(5), async {
        while backend.hits().len() < 2 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await?;

    let hits = backend.hits();
    assert_eq!(hits[0].path_and_query, "/api/events");
    assert_eq!(hits[1].path_and_query, "/api/events?since=c-1");
    Ok(())
}
