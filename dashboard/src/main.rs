use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dashboard::{
    app::{Cli, Screen},
    config::DashboardConfig,
    telemetry::{get_subscriber, init_subscriber, log_error},
    utils::currency::format_clp,
};
use payloads::APIClient;

/// Factory dashboard
///
/// Environment variables can be set directly or loaded from a .env file in
/// the working directory. All of them are optional:
/// - DASHBOARD_API_URL: backend base URL (default http://localhost:8000)
/// - DASHBOARD_POLL_SPACES_MS, DASHBOARD_POLL_STOCK_MS,
///   DASHBOARD_POLL_OBSOLETOS_MS, DASHBOARD_POLL_ORDERS_PER_HOUR_MS,
///   DASHBOARD_POLL_BANK_MS, DASHBOARD_POLL_ORDERS_MS: refresh periods,
///   0 to fetch once
/// - DASHBOARD_REQUEST_TIMEOUT_MS: per-request timeout
/// - DASHBOARD_LOG: log filter when RUST_LOG is unset (default "warn")
///
/// Example:
/// DASHBOARD_API_URL=http://localhost:8000 cargo run -p dashboard -- order <invoice-id>
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silently ignored if the file doesn't exist
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = DashboardConfig::from_env()?;
    init_subscriber(get_subscriber(config.log_filter.clone()))?;

    let client = Arc::new(APIClient::new(config.api_url.clone()));

    if cli.check {
        if let Err(e) = check(&client).await {
            log_error(e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let route = cli.route.unwrap_or_default();
    tracing::info!(api_url = %config.api_url, ?route, "starting dashboard");
    let mut screen = Screen::mount(&route, client, &config);

    if cli.once {
        while !screen.settled() {
            if !screen.changed().await {
                break;
            }
        }
        println!("{}", screen.render());
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    loop {
        // Clear and home the cursor before each redraw
        writeln!(stdout, "\x1b[2J\x1b[H{}", screen.render())?;
        stdout.flush()?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            alive = screen.changed() => {
                if !alive {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn check(client: &APIClient) -> anyhow::Result<()> {
    let spaces = client
        .spaces()
        .await
        .with_context(|| format!("backend at {} is not answering", client.address))?;
    let statement = client
        .bank_statement()
        .await
        .context("failed to read the bank statement")?;
    println!(
        "{}: {} spaces, balance {}",
        client.address,
        spaces.spaces.len(),
        format_clp(statement.values.balance)
    );
    Ok(())
}
