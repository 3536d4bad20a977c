use super::{pad, render_with, spaces::space_label};
use crate::hooks::ApiState;
use payloads::responses::StockSummary;
use payloads::{Space, SpaceId};

pub const PATH: &str = "/api/stock_summary";

/// `spaces` is used to label space ids; unknown ids are shown verbatim.
pub fn render(state: &ApiState, spaces: &[Space]) -> String {
    render_with(state, "stock", |summary: &StockSummary| {
        render_stock(summary, spaces)
    })
}

pub fn render_stock(summary: &StockSummary, spaces: &[Space]) -> String {
    if summary.is_empty() {
        return "No stock.".to_string();
    }
    let mut lines = Vec::new();
    for (sku, entry) in summary {
        lines.push(format!("{} [{}]", sku, entry.total));
        for (space_id, quantity) in &entry.por_espacio {
            lines.push(format!(
                "  {} {}",
                pad(&location_label(space_id, spaces), 24),
                quantity
            ));
        }
    }
    lines.join("\n")
}

fn location_label(space_id: &SpaceId, spaces: &[Space]) -> String {
    match spaces.iter().find(|space| &space.space_id == space_id) {
        Some(space) => {
            format!("{} ({})", space_label(&space.kind), space_id.short())
        }
        None => space_id.to_string(),
    }
}
