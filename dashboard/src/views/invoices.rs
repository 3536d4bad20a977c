use super::{ErrorNotice, pad};
use crate::hooks::{ApiState, FetchState};
use crate::utils::currency::format_clp;
use crate::utils::time::format_optional;
use jiff::tz::TimeZone;
use payloads::Invoice;
use serde::Deserialize;
use serde_json::Value;

pub use payloads::requests::InvoiceRange;

pub const MALFORMED: &str = "The server response does not have the expected format";

/// Flatten the backend's invoice listing into records.
///
/// The payload is an array whose items are either wrapped invoices or
/// arrays of them. Falsy entries are skipped and so are entries without a
/// `__values__` object. A payload that is not an array, or that contains a
/// `null` at the top level, is rejected.
pub fn extract_invoices(payload: &Value) -> Option<Vec<Invoice>> {
    let items = payload.as_array()?;
    if items.iter().any(Value::is_null) {
        return None;
    }

    let flattened = items.iter().flat_map(|item| match item {
        Value::Array(inner) => inner.iter().collect::<Vec<_>>(),
        other => vec![other],
    });

    Some(
        flattened
            .filter(|item| is_truthy(item))
            .filter_map(|item| item.get("__values__"))
            .filter_map(|values| {
                Invoice::deserialize(values)
                    .inspect_err(|error| {
                        tracing::warn!(%error, "skipping malformed invoice")
                    })
                    .ok()
            })
            .collect(),
    )
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn render(state: &ApiState, range: &InvoiceRange, tz: &TimeZone) -> String {
    let context = "invoices";
    let notice = state
        .error
        .as_ref()
        .map(|error| ErrorNotice::classify(error).render(context));

    let body = match (&state.data, notice.as_ref()) {
        (FetchState::NotFetched, Some(notice)) => return notice.clone(),
        (FetchState::NotFetched, None) if state.loading => {
            return format!("Loading {context}...");
        }
        (FetchState::NotFetched, None) => render_invoices(&[], range, tz),
        (FetchState::Fetched(value), _) => match extract_invoices(value) {
            Some(invoices) => render_invoices(&invoices, range, tz),
            None => MALFORMED.to_string(),
        },
    };

    match notice {
        Some(notice) => format!("{notice}\n{body}"),
        None => body,
    }
}

pub fn render_invoices(
    invoices: &[Invoice],
    range: &InvoiceRange,
    tz: &TimeZone,
) -> String {
    let heading = format!("Issued invoices {} to {}", range.from, range.to);
    if invoices.is_empty() {
        return format!("{heading}\nNo invoices to show for this range.");
    }
    let mut lines = vec![heading];
    for invoice in invoices {
        lines.push(format!(
            "{} {} {} {}",
            pad(&invoice.id.to_string(), 26),
            pad(&invoice.status, 10),
            pad(&format_clp(invoice.total_price), 12),
            format_optional(invoice.created_at, tz)
        ));
    }
    lines.join("\n")
}
