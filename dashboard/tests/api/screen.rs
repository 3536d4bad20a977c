use dashboard::app::{Route, Screen};
use dashboard::config::DashboardConfig;
use jiff::tz::TimeZone;
use std::sync::Arc;
use std::time::Duration;
use test_helpers::{mock, spawn_factory_backend};

async fn render_settled(route: Route) -> anyhow::Result<String> {
    let backend = spawn_factory_backend().await;
    let config = DashboardConfig {
        api_url: backend.address.clone(),
        ..DashboardConfig::default()
    };
    let mut screen = Screen::mount_in(
        &route,
        Arc::new(backend.client.clone()),
        &config,
        TimeZone::UTC,
    );

    tokio::time::timeout(Duration::from_secs(5), async {
        while !screen.settled() {
            if !screen.changed().await {
                break;
            }
        }
    })
    .await?;
    Ok(screen.render())
}

#[tokio::test]
async fn home_renders_every_panel() -> anyhow::Result<()> {
    let rendered = render_settled(Route::Home).await?;

    assert!(rendered.starts_with("== Spaces ==\nKitchen        42 / 120"));
    assert!(rendered.contains("Check in       3 / 10"));
    assert!(rendered.contains("== Stock ==\nALU-PURO [18]\n  Kitchen (5a7a)           12"));
    assert!(rendered.contains("  unknown-space-0001       2"));
    assert!(rendered.contains("MICRO-BAS      2 units"));
    assert!(rendered.contains("10:00     8 orders  100%  very high"));
    assert!(rendered.contains("Current balance: $1.234.567 (positive)"));
    assert!(rendered.contains("ord-001    grupo-5"));
    assert!(!rendered.contains("Error loading"));
    Ok(())
}

#[tokio::test]
async fn order_route_renders_the_invoiced_order() -> anyhow::Result<()> {
    let rendered = render_settled(Route::Order {
        invoice_id: mock::INVOICE_ID.into(),
    })
    .await?;

    assert!(rendered.starts_with("== Order ==\nID           ord-001"));
    assert!(rendered.contains(&format!("Invoice {}", mock::INVOICE_ID)));
    assert!(rendered.contains("  Total        $4.200"));
    Ok(())
}

#[tokio::test]
async fn invoices_route_flattens_pages() -> anyhow::Result<()> {
    let rendered = render_settled(Route::Invoices {
        from: Some(jiff::civil::date(2025, 5, 3)),
        to: Some(jiff::civil::date(2025, 5, 6)),
    })
    .await?;

    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines[0], "== Issued invoices ==");
    assert_eq!(lines[1], "Issued invoices 2025-05-03 to 2025-05-06");
    assert_eq!(lines.len(), 4);
    assert!(lines[2].starts_with(mock::INVOICE_ID));
    assert!(lines[3].contains("paid       $990"));
    Ok(())
}
