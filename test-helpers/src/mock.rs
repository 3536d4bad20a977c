//! Canned factory data served by the stub backend.
//!
//! The payloads mirror what the production backend returns: two warehouse
//! spaces, stock for three SKUs, a near-expiry group, a short order list,
//! hourly order counts, a cash balance, and one invoiced order.

use serde_json::{Value, json};

pub const KITCHEN_SPACE: &str = "67f5c75a7763d08f07085a7a";
pub const BUFFER_SPACE: &str = "67f5c75a7763d08f07085a7e";
pub const INVOICE_ID: &str = "681a4c2f9d1e2a0012ab34cd";
/// Order lookup for [`INVOICE_ID`].
pub const ORDER_FROM_INVOICE_PATH: &str =
    "/api/order-from-invoice/681a4c2f9d1e2a0012ab34cd";

pub fn spaces() -> Value {
    json!({
        "spaces": [
            {
                "space_id": KITCHEN_SPACE,
                "type": "kitchen",
                "used_space": 42,
                "total_space": 120
            },
            {
                "space_id": BUFFER_SPACE,
                "type": "check-in",
                "used_space": 3,
                "total_space": 10
            }
        ]
    })
}

pub fn stock_summary() -> Value {
    json!({
        "ALU-PURO": {
            "total": 18,
            "por_espacio": { KITCHEN_SPACE: 12, BUFFER_SPACE: 6 }
        },
        "PCB-BAS": {
            "total": 4,
            "por_espacio": { KITCHEN_SPACE: 4 }
        },
        "VIDRIO-AER": {
            "total": 2,
            "por_espacio": { "unknown-space-0001": 2 }
        }
    })
}

pub fn obsoletos() -> Value {
    json!({
        "MICRO-BAS": [
            { "_id": "p-1", "expiration": "2025-05-06T12:00:00Z" },
            { "_id": "p-2", "expiration": "2025-05-06T12:30:00Z" }
        ]
    })
}

pub fn orders() -> Value {
    json!({
        "orders": [
            {
                "order_id": "ord-001",
                "client": "grupo-5",
                "supplier": "grupo-3",
                "channel": "b2b",
                "status": "aceptada",
                "payload": {
                    "createdAt": "2025-05-06T10:00:00Z",
                    "updatedAt": "2025-05-06T10:15:00Z"
                }
            }
        ]
    })
}

pub fn orders_per_hour() -> Value {
    json!([
        { "hour": "2025-05-06T09:00:00Z", "order_count": 2 },
        { "hour": "2025-05-06T10:00:00Z", "order_count": 8 },
        { "hour": "2025-05-06T11:00:00Z", "order_count": 5 }
    ])
}

pub fn bank_statement() -> Value {
    json!({ "values": { "balance": 1234567 } })
}

pub fn order_from_invoice() -> Value {
    json!({
        "id": "ord-001",
        "sku": "ALU-PURO",
        "cliente": "grupo-5",
        "proveedor": "grupo-3",
        "cantidad": 12,
        "precio_unitario": 350,
        "creada": "2025-05-06T10:00:00Z",
        "vencimiento": "2025-05-07T10:00:00Z",
        "estado": "facturada",
        "actualizado": "2025-05-06T11:00:00Z",
        "facturado": true,
        "historial": [
            { "nombre": "creada", "fecha": "2025-05-06T10:00:00Z" },
            { "nombre": "facturada", "fecha": "2025-05-06T11:00:00Z" }
        ],
        "factura": {
            "__values__": {
                "id": INVOICE_ID,
                "client": "grupo-5",
                "supplier": "grupo-3",
                "channel": "b2b",
                "status": "pending",
                "price": 4200,
                "interest": 0,
                "totalPrice": 4200,
                "createdAt": "2025-05-06T11:00:00Z",
                "updatedAt": "2025-05-06T11:00:00Z"
            }
        }
    })
}

/// Issued invoices as the backend sends them: pages of wrapped records.
pub fn issued_invoices() -> Value {
    json!([
        [
            {
                "__values__": {
                    "id": INVOICE_ID,
                    "status": "pending",
                    "totalPrice": 4200,
                    "createdAt": "2025-05-06T11:00:00Z"
                }
            }
        ],
        [
            {
                "__values__": {
                    "id": "681a4c2f9d1e2a0012ab34ce",
                    "status": "paid",
                    "totalPrice": 990,
                    "createdAt": "2025-05-05T08:30:00Z"
                }
            }
        ]
    ])
}
