//! Detail record and fetch outcome types.

/// The structured payload describing one app.
///
/// The remote API returns a deeply nested object whose shape steamdex
/// never interprets; it is carried opaquely from the wire to the
/// detail-map artifact.
pub type DetailRecord = serde_json::Value;

/// Classification of a single detail-fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    /// The app exists and the API returned its detail record.
    Found(DetailRecord),
    /// The API explicitly reported no entry / no usable data for this
    /// ID. This is a terminal answer, not an error.
    Absent,
}

impl DetailOutcome {
    /// Returns true if this outcome is a confirmed absence.
    pub fn is_absent(&self) -> bool {
        matches!(self, DetailOutcome::Absent)
    }
}

/// The outcome of a fully retried fetch for one app ID.
///
/// This is the contract the retry policy exposes upward: absence and
/// hard failure are distinct terminal states and must never be
/// conflated.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The detail record was fetched successfully.
    Resolved(DetailRecord),
    /// The API confirmed the app does not exist. Not retried again.
    Absent,
    /// Every retry attempt ended in a retryable error. Remembered for
    /// a later sweep.
    Failed,
}

impl Resolution {
    /// Returns true if a detail record was obtained.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_classification() {
        assert!(DetailOutcome::Absent.is_absent());
        assert!(!DetailOutcome::Found(json!({"name": "Dota 2"})).is_absent());
    }

    #[test]
    fn test_resolution_distinguishes_absent_from_failed() {
        assert!(Resolution::Resolved(json!({})).is_resolved());
        assert_ne!(Resolution::Absent, Resolution::Failed);
    }
}
