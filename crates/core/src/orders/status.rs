//! Order Status Machine
//!
//! Applies admin patches to an order's lifecycle state and reports exactly
//! what changed, so callers only notify customers about real changes.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::orders::{
    notes::{Note, NoteKind, NoteLedger},
    tracking::TrackingInfo,
};

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, not yet looked at.
    #[default]
    Pending,

    /// Accepted by staff.
    Confirmed,

    /// Being picked and packed.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Called off before delivery.
    Cancelled,

    /// Money returned.
    Refunded,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Whether moving from `self` to `next` follows the regular lifecycle.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Confirmed | Self::Processing | Self::Cancelled
            ) | (
                Self::Confirmed,
                Self::Processing | Self::Shipped | Self::Cancelled
            ) | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
                | (Self::Delivered | Self::Cancelled, Self::Refunded)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment.
    #[default]
    Pending,

    /// Paid in full.
    #[serde(alias = "paid")]
    Completed,

    /// Payment attempt failed.
    Failed,

    /// Payment returned.
    Refunded,
}

impl PaymentStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" | "paid" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// How transitions outside [`OrderStatus::can_transition_to`] are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransitionPolicy {
    /// Accept any transition, flagging irregular ones.
    #[default]
    Permissive,

    /// Reject irregular transitions.
    Strict,
}

impl TransitionPolicy {
    /// Configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }

    /// Decide on a move from `from` to `to`.
    ///
    /// Returns `true` when the move is accepted despite being irregular.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] for irregular moves
    /// under [`TransitionPolicy::Strict`].
    pub fn check(self, from: OrderStatus, to: OrderStatus) -> Result<bool, TransitionError> {
        if from == to || from.can_transition_to(to) {
            return Ok(false);
        }

        match self {
            Self::Permissive => Ok(true),
            Self::Strict => Err(TransitionError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a transition policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transition policy: {0} (expected permissive or strict)")]
pub struct UnknownPolicy(pub String);

impl FromStr for TransitionPolicy {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            _ => Err(UnknownPolicy(value.to_string())),
        }
    }
}

/// Errors raised while applying a status patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The move is not part of the regular lifecycle.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },
}

/// The mutable lifecycle part of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLifecycle {
    /// Fulfilment state.
    pub status: OrderStatus,

    /// Payment state.
    pub payment_status: PaymentStatus,

    /// Shipment tracking, once assigned.
    pub tracking: Option<TrackingInfo>,

    /// Admin and customer notes.
    pub notes: NoteLedger,
}

/// A partial update to an order's lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPatch {
    /// New fulfilment state.
    pub status: Option<OrderStatus>,

    /// New payment state.
    pub payment_status: Option<PaymentStatus>,

    /// Tracking fields to set or merge.
    pub tracking: Option<TrackingInfo>,

    /// Admin note to append. Blank notes are ignored.
    pub admin_note: Option<String>,
}

/// Which parts of an order a patch actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// Fulfilment state differs from before.
    pub order_status_changed: bool,

    /// Payment state differs from before.
    pub payment_status_changed: bool,

    /// Tracking was assigned for the first time.
    pub tracking_info_added: bool,

    /// Existing tracking had a field changed.
    pub tracking_info_updated: bool,

    /// An admin note was appended.
    pub admin_note_added: bool,

    /// Fulfilment state before the patch.
    pub previous_order_status: OrderStatus,

    /// Payment state before the patch.
    pub previous_payment_status: PaymentStatus,

    /// The status move was outside the regular lifecycle.
    pub unlisted_transition: bool,
}

/// Customer-facing messages a change warrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Fulfilment state changed.
    OrderStatusUpdated,

    /// Payment state changed.
    PaymentStatusUpdated,

    /// The order shipped with tracking details.
    TrackingAdded,

    /// Tracking details changed.
    TrackingUpdated,
}

impl NotificationKind {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderStatusUpdated => "order_status_updated",
            Self::PaymentStatusUpdated => "payment_status_updated",
            Self::TrackingAdded => "tracking_added",
            Self::TrackingUpdated => "tracking_updated",
        }
    }
}

impl StatusChange {
    /// A change record with nothing flagged.
    #[must_use]
    pub const fn unchanged(lifecycle: &OrderLifecycle) -> Self {
        Self {
            order_status_changed: false,
            payment_status_changed: false,
            tracking_info_added: false,
            tracking_info_updated: false,
            admin_note_added: false,
            previous_order_status: lifecycle.status,
            previous_payment_status: lifecycle.payment_status,
            unlisted_transition: false,
        }
    }

    /// Whether anything at all changed.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.order_status_changed
            || self.payment_status_changed
            || self.tracking_info_added
            || self.tracking_info_updated
            || self.admin_note_added
    }

    /// Notifications to send. Admin notes are internal and never notify.
    #[must_use]
    pub fn notification_kinds(&self) -> SmallVec<[NotificationKind; 4]> {
        let mut kinds = SmallVec::new();

        if self.order_status_changed {
            kinds.push(NotificationKind::OrderStatusUpdated);
        }

        if self.payment_status_changed {
            kinds.push(NotificationKind::PaymentStatusUpdated);
        }

        if self.tracking_info_added {
            kinds.push(NotificationKind::TrackingAdded);
        } else if self.tracking_info_updated {
            kinds.push(NotificationKind::TrackingUpdated);
        }

        kinds
    }
}

/// Result of applying a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPatch {
    /// What changed.
    pub change: StatusChange,

    /// The admin note appended, if any.
    pub admin_note: Option<Note>,
}

/// Applies [`StatusPatch`]es under a [`TransitionPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusMachine {
    policy: TransitionPolicy,
}

impl StatusMachine {
    /// Machine enforcing `policy`.
    #[must_use]
    pub const fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    /// Apply `patch` to `lifecycle`, crediting any admin note to `author`.
    ///
    /// Writing a value equal to the current one is not a change, so applying
    /// the same patch twice flags nothing the second time. Nothing is
    /// modified when the patch is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] when the policy rejects
    /// the status move.
    pub fn apply(
        &self,
        lifecycle: &mut OrderLifecycle,
        patch: StatusPatch,
        author: &str,
        now: Timestamp,
    ) -> Result<AppliedPatch, TransitionError> {
        let mut change = StatusChange::unchanged(lifecycle);

        if let Some(next) = patch.status {
            change.unlisted_transition = self.policy.check(lifecycle.status, next)?;

            if next != lifecycle.status {
                lifecycle.status = next;
                change.order_status_changed = true;
            }
        }

        if let Some(next) = patch.payment_status
            && next != lifecycle.payment_status
        {
            lifecycle.payment_status = next;
            change.payment_status_changed = true;
        }

        match (lifecycle.tracking.as_mut(), patch.tracking) {
            (Some(current), Some(update)) => {
                change.tracking_info_updated = current.merge(update);
            }
            (None, Some(update)) if !update.is_empty() => {
                lifecycle.tracking = Some(update);
                change.tracking_info_added = true;
            }
            _ => {}
        }

        // Blank text is the only way append fails; such notes are skipped.
        let admin_note = patch.admin_note.and_then(|text| {
            lifecycle
                .notes
                .append(NoteKind::Admin, &text, author, now)
                .ok()
        });

        change.admin_note_added = admin_note.is_some();

        Ok(AppliedPatch { change, admin_note })
    }
}
