//! Plain-text renderings of hook state, one module per dashboard panel.
//!
//! Views never fail: a missing or oddly shaped payload renders as a notice
//! rather than an error.

pub mod bank_statement;
pub mod invoices;
pub mod obsoletos;
pub mod order_details;
pub mod orders;
pub mod orders_per_hour;
pub mod spaces;
pub mod stock;

use crate::hooks::{ApiState, FetchError, FetchState};
use serde::de::DeserializeOwned;

/// How a failed fetch is presented. Rate limiting and server errors get a
/// retry hint instead of the raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNotice {
    RateLimited,
    ServerBusy,
    Failed(String),
}

impl ErrorNotice {
    pub fn classify(error: &FetchError) -> Self {
        match error.status() {
            Some(429) => Self::RateLimited,
            Some(500) => Self::ServerBusy,
            _ => Self::Failed(error.to_string()),
        }
    }

    pub fn render(&self, context: &str) -> String {
        match self {
            Self::RateLimited => "Too many requests. Please wait a few \
                                  seconds before retrying."
                .to_string(),
            Self::ServerBusy => {
                "The server is busy. Hold on a moment.".to_string()
            }
            Self::Failed(message) => {
                format!("Error loading {context}: {message}")
            }
        }
    }
}

/// Render based on fetch state with contextual loading/error messages.
///
/// - No data + loading: `Loading {context}...`
/// - No data + error: the error notice
/// - Has data: `render_fn` output, preceded by the notice if the latest
///   refresh failed (the previous data is still shown)
///
/// A `null` payload renders as `No {context} found.`; a payload that does
/// not decode as `T` renders as a notice naming the decode problem.
pub fn render_with<T, F>(state: &ApiState, context: &str, render_fn: F) -> String
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> String,
{
    let notice = state
        .error
        .as_ref()
        .map(|error| ErrorNotice::classify(error).render(context));

    let value = match &state.data {
        FetchState::NotFetched => {
            return match notice {
                Some(notice) => notice,
                None if state.loading => format!("Loading {context}..."),
                None => format!("No {context} found."),
            };
        }
        FetchState::Fetched(value) => value,
    };

    let body = if value.is_null() {
        format!("No {context} found.")
    } else {
        match T::deserialize(value) {
            Ok(payload) => render_fn(&payload),
            Err(error) => {
                tracing::warn!(%context, %error, "unexpected payload shape");
                format!("Unexpected {context} data: {error}")
            }
        }
    };

    match notice {
        Some(notice) => format!("{notice}\n{body}"),
        None => body,
    }
}

/// Pad `text` on the right to `width` characters.
pub(crate) fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
