//! Wire types for the factory backend and the HTTP client used to reach it.

pub mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{
    APIClient, ApiRequest, ClientError, RawResponse, Transport,
    TransportError, error_detail, resolve_url,
};
pub use responses::{
    BankStatement, HourlyOrders, Invoice, Order, OrderDetail, Space,
    SpacesResponse, StockEntry,
};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Warehouse space identifier as assigned by the backend.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct SpaceId(pub String);

impl SpaceId {
    /// The trailing four characters, used as a short label in listings.
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.0[start..]
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Sku(pub String);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct OrderId(pub String);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct InvoiceId(pub String);
