//! Shapes returned by the factory backend.
//!
//! The backend owns these shapes and does not version them, so every field
//! is defaulted: a view renders whatever subset arrives rather than failing
//! on a missing key.

use crate::{InvoiceId, OrderId, SpaceId, Sku};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesResponse {
    pub spaces: Vec<Space>,
}

/// A warehouse area and how full it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Space {
    pub space_id: SpaceId,
    /// e.g. "buffer", "kitchen", "check-in"
    #[serde(rename = "type")]
    pub kind: String,
    pub used_space: u64,
    pub total_space: u64,
}

/// Units of one SKU, in total and per space.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockEntry {
    pub total: u64,
    pub por_espacio: BTreeMap<SpaceId, u64>,
}

pub type StockSummary = BTreeMap<Sku, StockEntry>;

/// Products close to expiry, grouped by SKU. Items are opaque.
pub type Obsoletos = BTreeMap<Sku, Vec<serde_json::Value>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_id: OrderId,
    pub client: String,
    pub supplier: String,
    pub channel: String,
    pub status: String,
    pub payload: OrderPayload,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderPayload {
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyOrders {
    pub hour: Timestamp,
    pub order_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BankStatement {
    pub values: BankValues,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BankValues {
    pub balance: Decimal,
}

/// An order resolved from one of its invoices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDetail {
    pub id: OrderId,
    pub sku: Sku,
    pub cliente: String,
    pub proveedor: String,
    pub cantidad: u64,
    pub precio_unitario: Decimal,
    pub creada: Option<Timestamp>,
    pub vencimiento: Option<Timestamp>,
    pub estado: String,
    pub actualizado: Option<Timestamp>,
    pub facturado: bool,
    pub historial: Vec<StatusChange>,
    pub factura: Option<InvoiceEnvelope>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusChange {
    pub nombre: String,
    pub fecha: Option<Timestamp>,
}

/// The backend wraps invoice records in a `__values__` object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceEnvelope {
    #[serde(rename = "__values__")]
    pub values: Option<Invoice>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub client: String,
    pub supplier: String,
    pub channel: String,
    pub status: String,
    pub price: Decimal,
    pub interest: Decimal,
    pub total_price: Decimal,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}
