use super::{pad, render_with};
use crate::hooks::ApiState;
use crate::utils::time::format_optional;
use jiff::tz::TimeZone;
use payloads::responses::{Order, OrdersResponse};

/// The ten most recent orders.
pub const PATH: &str = "/api/orders?skip=0&limit=10";

const COLUMNS: [(&str, usize); 7] = [
    ("ID", 10),
    ("Client", 10),
    ("Supplier", 10),
    ("Channel", 8),
    ("Status", 10),
    ("Created", 17),
    ("Updated", 17),
];

pub fn render(state: &ApiState, tz: &TimeZone) -> String {
    render_with(state, "orders", |response: &OrdersResponse| {
        render_orders(&response.orders, tz)
    })
}

pub fn render_orders(orders: &[Order], tz: &TimeZone) -> String {
    if orders.is_empty() {
        return "No orders.".to_string();
    }
    let header = row(COLUMNS.map(|(title, _)| title.to_string()));
    let mut lines = vec![header];
    for order in orders {
        lines.push(row([
            order.order_id.to_string(),
            order.client.clone(),
            order.supplier.clone(),
            order.channel.clone(),
            order.status.clone(),
            format_optional(order.payload.created_at, tz),
            format_optional(order.payload.updated_at, tz),
        ]));
    }
    lines.join("\n")
}

fn row(cells: [String; 7]) -> String {
    cells
        .iter()
        .zip(COLUMNS)
        .map(|(cell, (_, width))| pad(cell, width))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}
