mod hook;
mod screen;

use dashboard::hooks::{ApiHandle, ApiState};
use std::time::Duration;
use test_helpers::spawn_factory_backend;

/// Wait until the hook has no request in flight and return its state.
pub async fn settled(handle: &ApiHandle) -> anyhow::Result<ApiState> {
    let mut state = handle.subscribe();
    let settled = tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|state| !state.loading),
    )
    .await??
    .clone();
    Ok(settled)
}

#[tokio::test]
async fn typed_client_reads_spaces_and_balance() -> anyhow::Result<()> {
    let backend = spawn_factory_backend().await;

    let spaces = backend.client.spaces().await?;
    assert_eq!(spaces.spaces.len(), 2);
    assert_eq!(spaces.spaces[0].kind, "kitchen");

    let statement = backend.client.bank_statement().await?;
    assert_eq!(statement.values.balance, rust_decimal::Decimal::from(1234567));

    let hits = backend.hits_for("/api/spaces");
    assert_eq!(hits[0].accept.as_deref(), Some("application/json"));
    Ok(())
}
