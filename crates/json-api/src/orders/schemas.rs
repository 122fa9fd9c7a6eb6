//! Order request and response bodies.

use bazaar::orders::{LineItem, Note, OrderStatus, PaymentStatus, StatusChange, TaggedNote, TrackingInfo};
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::orders::{
    data::{CustomerInfo, ShippingAddress},
    records::OrderRecord,
};

use crate::extensions::*;

/// Delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        ShippingAddress {
            line1: body.line1,
            line2: body.line2,
            city: body.city,
            region: body.region,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        ShippingAddressBody {
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            region: address.region,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Who placed the order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddressBody>,
}

impl From<CustomerBody> for CustomerInfo {
    fn from(body: CustomerBody) -> Self {
        CustomerInfo {
            name: body.name,
            email: body.email,
            phone: body.phone,
            shipping_address: body.shipping_address.map(Into::into),
        }
    }
}

impl From<CustomerInfo> for CustomerBody {
    fn from(customer: CustomerInfo) -> Self {
        CustomerBody {
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            shipping_address: customer.shipping_address.map(Into::into),
        }
    }
}

/// A product line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineItemBody {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    #[salvo(schema(value_type = f64))]
    pub unit_price: Decimal,
}

impl From<LineItemBody> for LineItem {
    fn from(body: LineItemBody) -> Self {
        LineItem {
            product_id: body.product_id,
            name: body.name,
            quantity: body.quantity,
            unit_price: body.unit_price,
        }
    }
}

impl From<LineItem> for LineItemBody {
    fn from(item: LineItem) -> Self {
        LineItemBody {
            product_id: item.product_id,
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Shipment tracking. Omitted fields are left as they are on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackingBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
}

impl TrackingBody {
    pub(crate) fn into_tracking(self) -> Result<TrackingInfo, StatusError> {
        let estimated_delivery = self
            .estimated_delivery
            .map(|value| {
                value.parse::<Timestamp>().map_err(|_ignored| {
                    StatusError::bad_request()
                        .brief("estimatedDelivery must be an RFC 3339 timestamp")
                })
            })
            .transpose()?;

        Ok(TrackingInfo {
            carrier: self.carrier,
            tracking_number: self.tracking_number,
            tracking_url: self.tracking_url,
            estimated_delivery,
        })
    }
}

impl From<TrackingInfo> for TrackingBody {
    fn from(tracking: TrackingInfo) -> Self {
        TrackingBody {
            carrier: tracking.carrier,
            tracking_number: tracking.tracking_number,
            tracking_url: tracking.tracking_url,
            estimated_delivery: tracking.estimated_delivery.map(|at| at.to_string()),
        }
    }
}

/// Note Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteResponse {
    pub text: String,
    pub created_by: String,
    pub created_at: String,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        NoteResponse {
            text: note.text,
            created_by: note.created_by,
            created_at: note.created_at.to_string(),
        }
    }
}

/// A note tagged with the list it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaggedNoteResponse {
    /// `admin` or `customer`
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub created_by: String,
    pub created_at: String,
}

impl From<TaggedNote> for TaggedNoteResponse {
    fn from(tagged: TaggedNote) -> Self {
        TaggedNoteResponse {
            kind: tagged.kind.as_str().to_string(),
            text: tagged.note.text,
            created_by: tagged.note.created_by,
            created_at: tagged.note.created_at.to_string(),
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub order_number: String,
    pub customer_info: CustomerBody,
    pub items: Vec<LineItemBody>,
    #[salvo(schema(value_type = f64))]
    pub subtotal: Decimal,
    #[salvo(schema(value_type = f64))]
    pub discount: Decimal,
    #[salvo(schema(value_type = f64))]
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub tracking_info: Option<TrackingBody>,
    pub admin_notes: Vec<NoteResponse>,
    pub customer_notes: Vec<NoteResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(record: OrderRecord) -> Self {
        let lifecycle = record.lifecycle;

        OrderResponse {
            uuid: record.uuid.into(),
            order_number: record.order_number.to_string(),
            customer_info: record.customer.into(),
            items: record.items.into_iter().map(Into::into).collect(),
            subtotal: record.totals.subtotal,
            discount: record.totals.discount,
            total: record.totals.total,
            coupon_code: record.coupon_code.map(|code| code.as_str().to_string()),
            status: lifecycle.status.as_str().to_string(),
            payment_status: lifecycle.payment_status.as_str().to_string(),
            tracking_info: lifecycle.tracking.map(Into::into),
            admin_notes: lifecycle.notes.admin().iter().cloned().map(Into::into).collect(),
            customer_notes: lifecycle
                .notes
                .customer()
                .iter()
                .cloned()
                .map(Into::into)
                .collect(),
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// What a status update changed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeResponse {
    pub order_status_changed: bool,
    pub payment_status_changed: bool,
    pub tracking_info_added: bool,
    pub tracking_info_updated: bool,
    pub admin_note_added: bool,
    pub previous_order_status: String,
    pub previous_payment_status: String,
    /// The status move is outside the regular lifecycle
    pub unlisted_transition: bool,
}

impl From<StatusChange> for ChangeResponse {
    fn from(change: StatusChange) -> Self {
        ChangeResponse {
            order_status_changed: change.order_status_changed,
            payment_status_changed: change.payment_status_changed,
            tracking_info_added: change.tracking_info_added,
            tracking_info_updated: change.tracking_info_updated,
            admin_note_added: change.admin_note_added,
            previous_order_status: change.previous_order_status.as_str().to_string(),
            previous_payment_status: change.previous_payment_status.as_str().to_string(),
            unlisted_transition: change.unlisted_transition,
        }
    }
}

pub(crate) fn parse_status(value: &str) -> Result<OrderStatus, StatusError> {
    value.parse::<OrderStatus>().or_400()
}

pub(crate) fn parse_payment_status(value: &str) -> Result<PaymentStatus, StatusError> {
    value.parse::<PaymentStatus>().or_400()
}
