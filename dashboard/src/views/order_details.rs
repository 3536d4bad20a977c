use super::{pad, render_with};
use crate::hooks::{ApiState, FetchState};
use crate::utils::currency::format_clp;
use crate::utils::time::format_optional;
use jiff::tz::TimeZone;
use payloads::{Invoice, OrderDetail};

/// Backend path resolving the order behind an invoice.
pub fn path(invoice_id: &str) -> String {
    format!("/api/order-from-invoice/{invoice_id}")
}

pub fn render(state: &ApiState, invoice_id: &str, tz: &TimeZone) -> String {
    if let FetchState::Fetched(value) = &state.data
        && value.is_null()
        && state.error.is_none()
    {
        return format!("No order found for invoice {invoice_id}.");
    }
    render_with(state, "order", |detail: &OrderDetail| {
        render_detail(detail, tz)
    })
}

pub fn render_detail(detail: &OrderDetail, tz: &TimeZone) -> String {
    let fields = [
        ("ID", detail.id.to_string()),
        ("SKU", detail.sku.to_string()),
        ("Client", detail.cliente.clone()),
        ("Supplier", detail.proveedor.clone()),
        ("Quantity", detail.cantidad.to_string()),
        ("Unit price", format_clp(detail.precio_unitario)),
        ("Created", format_optional(detail.creada, tz)),
        ("Due", format_optional(detail.vencimiento, tz)),
        ("Status", detail.estado.clone()),
        ("Updated", format_optional(detail.actualizado, tz)),
        ("Invoiced", if detail.facturado { "yes" } else { "no" }.to_string()),
    ];

    let mut lines: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("{} {value}", pad(name, 12)))
        .collect();

    if !detail.historial.is_empty() {
        lines.push(String::new());
        lines.push("History".to_string());
        for change in &detail.historial {
            lines.push(format!(
                "  {} {}",
                pad(&change.nombre, 12),
                format_optional(change.fecha, tz)
            ));
        }
    }

    if let Some(invoice) = detail.factura.as_ref().and_then(|f| f.values.as_ref()) {
        lines.push(String::new());
        lines.push(render_invoice(invoice, tz));
    }

    lines.join("\n")
}

fn render_invoice(invoice: &Invoice, tz: &TimeZone) -> String {
    [
        format!("Invoice {}", invoice.id),
        format!("  {} {}", pad("Status", 12), invoice.status),
        format!("  {} {}", pad("Price", 12), format_clp(invoice.price)),
        format!("  {} {}", pad("Interest", 12), format_clp(invoice.interest)),
        format!("  {} {}", pad("Total", 12), format_clp(invoice.total_price)),
        format!("  {} {}", pad("Issued", 12), format_optional(invoice.created_at, tz)),
    ]
    .join("\n")
}
