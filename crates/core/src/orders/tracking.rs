//! Shipment Tracking

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Carrier details for a shipped order. Every field is optional so partial
/// updates can be merged in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    /// Shipping carrier name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    /// Carrier's tracking number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,

    /// Public tracking page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,

    /// Expected delivery time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<Timestamp>,
}

impl TrackingInfo {
    /// `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carrier.is_none()
            && self.tracking_number.is_none()
            && self.tracking_url.is_none()
            && self.estimated_delivery.is_none()
    }

    /// Overwrite the fields `patch` sets, leaving the rest alone.
    ///
    /// Returns `true` when any stored value changed.
    pub fn merge(&mut self, patch: TrackingInfo) -> bool {
        let before = self.clone();

        if patch.carrier.is_some() {
            self.carrier = patch.carrier;
        }

        if patch.tracking_number.is_some() {
            self.tracking_number = patch.tracking_number;
        }

        if patch.tracking_url.is_some() {
            self.tracking_url = patch.tracking_url;
        }

        if patch.estimated_delivery.is_some() {
            self.estimated_delivery = patch.estimated_delivery;
        }

        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ups(number: &str) -> TrackingInfo {
        TrackingInfo {
            carrier: Some("UPS".to_string()),
            tracking_number: Some(number.to_string()),
            ..TrackingInfo::default()
        }
    }

    #[test]
    fn merge_keeps_fields_missing_from_patch() {
        let mut tracking = ups("1Z999");

        let changed = tracking.merge(TrackingInfo {
            tracking_url: Some("https://track.example/1Z999".to_string()),
            ..TrackingInfo::default()
        });

        assert!(changed);
        assert_eq!(tracking.carrier.as_deref(), Some("UPS"));
        assert_eq!(tracking.tracking_number.as_deref(), Some("1Z999"));
        assert_eq!(
            tracking.tracking_url.as_deref(),
            Some("https://track.example/1Z999")
        );
    }

    #[test]
    fn merging_same_values_reports_no_change() {
        let mut tracking = ups("1Z999");

        assert!(!tracking.merge(ups("1Z999")));
        assert!(!tracking.merge(TrackingInfo::default()));
    }

    #[test]
    fn default_is_empty() {
        assert!(TrackingInfo::default().is_empty());
        assert!(!ups("1").is_empty());
    }
}
