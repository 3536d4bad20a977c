//! Routes and the screen that mounts one hook per panel.

use crate::config::DashboardConfig;
use crate::hooks::{ApiConfig, ApiHandle, ApiState, FetchOptions, use_api};
use crate::views::{
    bank_statement, invoices, obsoletos, order_details, orders,
    orders_per_hour, spaces, stock,
};
use clap::{Parser, Subcommand};
use futures::future::select_all;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use payloads::Transport;
use payloads::requests::InvoiceRange;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Live terminal view of the factory backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub route: Option<Route>,

    /// Print the screen once every panel has loaded, then exit
    #[arg(long, global = true)]
    pub once: bool,

    /// Check that the backend answers, then exit
    #[arg(long)]
    pub check: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Warehouse, stock, orders and balance overview
    #[default]
    Home,
    /// The order behind an invoice
    Order { invoice_id: String },
    /// Invoices issued in a date range (default: the last three days)
    Invoices {
        #[arg(long)]
        from: Option<Date>,
        #[arg(long)]
        to: Option<Date>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PanelKind {
    Spaces,
    Stock,
    Obsoletos,
    OrdersPerHour,
    Bank,
    Orders,
    OrderDetail(String),
    Invoices(InvoiceRange),
}

impl PanelKind {
    fn title(&self) -> &'static str {
        match self {
            Self::Spaces => "Spaces",
            Self::Stock => "Stock",
            Self::Obsoletos => "Close to expiry",
            Self::OrdersPerHour => "Orders per hour",
            Self::Bank => "Balance",
            Self::Orders => "Recent orders",
            Self::OrderDetail(_) => "Order",
            Self::Invoices(_) => "Issued invoices",
        }
    }
}

struct Panel {
    kind: PanelKind,
    // Held to keep the hook mounted
    _handle: ApiHandle,
    state: watch::Receiver<ApiState>,
}

/// Every panel of one route, each backed by its own hook instance.
/// Dropping the screen unmounts all of them.
pub struct Screen {
    panels: Vec<Panel>,
    tz: TimeZone,
}

impl Screen {
    pub fn mount<T: Transport>(
        route: &Route,
        transport: Arc<T>,
        config: &DashboardConfig,
    ) -> Self {
        Self::mount_in(route, transport, config, TimeZone::system())
    }

    pub fn mount_in<T: Transport>(
        route: &Route,
        transport: Arc<T>,
        config: &DashboardConfig,
        tz: TimeZone,
    ) -> Self {
        let polling = &config.polling;
        let panels: Vec<(PanelKind, String, Duration)> = match route {
            Route::Home => vec![
                (PanelKind::Spaces, spaces::PATH.into(), polling.spaces),
                (PanelKind::Stock, stock::PATH.into(), polling.stock),
                (PanelKind::Obsoletos, obsoletos::PATH.into(), polling.obsoletos),
                (
                    PanelKind::OrdersPerHour,
                    orders_per_hour::PATH.into(),
                    polling.orders_per_hour,
                ),
                (PanelKind::Bank, bank_statement::PATH.into(), polling.bank),
                (PanelKind::Orders, orders::PATH.into(), polling.orders),
            ],
            Route::Order { invoice_id } => vec![(
                PanelKind::OrderDetail(invoice_id.clone()),
                order_details::path(invoice_id),
                Duration::ZERO,
            )],
            Route::Invoices { from, to } => {
                let mut range = InvoiceRange::ending_today();
                if let Some(from) = from {
                    range.from = *from;
                }
                if let Some(to) = to {
                    range.to = *to;
                }
                vec![(PanelKind::Invoices(range), range.path(), Duration::ZERO)]
            }
        };

        let options = FetchOptions {
            timeout: config.request_timeout,
            ..FetchOptions::default()
        };
        let panels = panels
            .into_iter()
            .map(|(kind, path, interval)| {
                tracing::debug!(%path, ?interval, "mounting panel");
                let hook_config = ApiConfig {
                    options: options.clone(),
                    polling_interval: interval,
                    incremental: false,
                };
                let handle = use_api(transport.clone(), path, hook_config);
                Panel {
                    kind,
                    state: handle.subscribe(),
                    _handle: handle,
                }
            })
            .collect();

        Self { panels, tz }
    }

    /// Render every panel from its latest state, marking it seen.
    pub fn render(&mut self) -> String {
        let states: Vec<ApiState> = self
            .panels
            .iter_mut()
            .map(|panel| panel.state.borrow_and_update().clone())
            .collect();
        let known_spaces = self
            .panels
            .iter()
            .zip(&states)
            .find(|(panel, _)| panel.kind == PanelKind::Spaces)
            .map(|(_, state)| spaces::known_spaces(state))
            .unwrap_or_default();

        self.panels
            .iter()
            .zip(&states)
            .map(|(panel, state)| {
                let body = match &panel.kind {
                    PanelKind::Spaces => spaces::render(state),
                    PanelKind::Stock => stock::render(state, &known_spaces),
                    PanelKind::Obsoletos => obsoletos::render(state),
                    PanelKind::OrdersPerHour => {
                        orders_per_hour::render(state, &self.tz)
                    }
                    PanelKind::Bank => bank_statement::render(state),
                    PanelKind::Orders => orders::render(state, &self.tz),
                    PanelKind::OrderDetail(invoice_id) => {
                        order_details::render(state, invoice_id, &self.tz)
                    }
                    PanelKind::Invoices(range) => {
                        invoices::render(state, range, &self.tz)
                    }
                };
                format!("== {} ==\n{body}", panel.kind.title())
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Wait until any panel publishes a new state. Returns false once no
    /// panel can publish anymore.
    pub async fn changed(&mut self) -> bool {
        if self.panels.is_empty() {
            return false;
        }
        let waits = self
            .panels
            .iter_mut()
            .map(|panel| Box::pin(panel.state.changed()));
        let (result, _, _) = select_all(waits).await;
        result.is_ok()
    }

    /// True when no panel has a request in flight.
    pub fn settled(&self) -> bool {
        self.panels.iter().all(|panel| !panel.state.borrow().loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_helpers::{Reply, ScriptedTransport};

    #[test]
    fn cli_defaults_to_home() {
        let cli = Cli::try_parse_from(["dashboard"]).unwrap();
        assert_eq!(cli.route.unwrap_or_default(), Route::Home);
        assert!(!cli.once);
    }

    #[test]
    fn cli_parses_routes() {
        let cli =
            Cli::try_parse_from(["dashboard", "order", "f-9", "--once"]).unwrap();
        assert_eq!(
            cli.route,
            Some(Route::Order {
                invoice_id: "f-9".into()
            })
        );
        assert!(cli.once);

        let cli = Cli::try_parse_from([
            "dashboard",
            "invoices",
            "--from",
            "2025-05-01",
        ])
        .unwrap();
        assert_eq!(
            cli.route,
            Some(Route::Invoices {
                from: Some(jiff::civil::date(2025, 5, 1)),
                to: None
            })
        );
    }

    #[tokio::test]
    async fn order_route_mounts_a_single_panel() {
        let transport =
            Arc::new(ScriptedTransport::always(Reply::json(serde_json::Value::Null)));
        let mut screen = Screen::mount_in(
            &Route::Order {
                invoice_id: "f-9".into(),
            },
            transport.clone(),
            &DashboardConfig::default(),
            TimeZone::UTC,
        );

        while !screen.settled() {
            assert!(screen.changed().await);
        }
        assert_eq!(
            screen.render(),
            "== Order ==\nNo order found for invoice f-9."
        );
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/api/order-from-invoice/f-9");
    }

    #[tokio::test]
    async fn invoices_route_uses_the_requested_range() {
        let transport =
            Arc::new(ScriptedTransport::always(Reply::json(serde_json::json!([]))));
        let route = Route::Invoices {
            from: Some(jiff::civil::date(2025, 5, 1)),
            to: Some(jiff::civil::date(2025, 5, 4)),
        };
        let mut screen = Screen::mount_in(
            &route,
            transport.clone(),
            &DashboardConfig::default(),
            TimeZone::UTC,
        );

        while !screen.settled() {
            assert!(screen.changed().await);
        }
        assert_eq!(
            transport.requests()[0].path,
            "/api/facturas-emitidas?fromDate=01-05-2025&toDate=04-05-2025"
        );
        assert!(screen.render().ends_with("No invoices to show for this range."));
    }
}
