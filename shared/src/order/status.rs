//! Order status vocabularies and the per-order status history
//!
//! Dine-in and delivery orders progress through disjoint, fixed vocabularies:
//!
//! - Dine-in:   Order Placed -> Being Prepared -> Table Ready -> Completed
//! - Delivery:  Order Placed -> Being Prepared -> In Transit  -> Delivered
//!
//! The backend reports status as a bare numeric code; only the delivery
//! vocabulary has a code mapping. Codes outside the known range translate to
//! [`DeliveryStatus::Unknown`], which renders as "Unknown Status" and counts
//! as no progress rather than an error.

use serde::{Deserialize, Serialize};

use crate::util::now_millis;

// ============================================================================
// Vocabularies
// ============================================================================

/// A fixed, ordered set of fulfillment stages.
///
/// `position` is the zero-based index within the vocabulary, or `None` when
/// the status sits outside it (nothing reached yet). Progress math only ever
/// goes through this trait, so the two vocabularies can never be mixed on one
/// order.
pub trait StatusVocabulary: Copy + std::fmt::Display {
    /// Number of stages in the vocabulary
    const LEN: usize;

    /// Zero-based position within the vocabulary, `None` if outside it
    fn position(self) -> Option<usize>;
}

/// Fulfillment stages for dine-in orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DineInStatus {
    #[default]
    OrderPlaced,
    BeingPrepared,
    TableReady,
    Completed,
}

impl DineInStatus {
    /// All stages, in fulfillment order
    pub const VOCABULARY: [DineInStatus; 4] = [
        DineInStatus::OrderPlaced,
        DineInStatus::BeingPrepared,
        DineInStatus::TableReady,
        DineInStatus::Completed,
    ];
}

impl std::fmt::Display for DineInStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DineInStatus::OrderPlaced => write!(f, "Order Placed"),
            DineInStatus::BeingPrepared => write!(f, "Being Prepared"),
            DineInStatus::TableReady => write!(f, "Table Ready"),
            DineInStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl StatusVocabulary for DineInStatus {
    const LEN: usize = Self::VOCABULARY.len();

    fn position(self) -> Option<usize> {
        Self::VOCABULARY.iter().position(|s| *s == self)
    }
}

/// Fulfillment stages for delivery orders.
///
/// `Unknown` is not a stage: it is the total-translation fallback for backend
/// codes this client does not recognize, kept displayable so history screens
/// survive backend additions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    #[default]
    OrderPlaced,
    BeingPrepared,
    InTransit,
    Delivered,
    Unknown,
}

impl DeliveryStatus {
    /// All stages, in fulfillment order (`Unknown` excluded)
    pub const VOCABULARY: [DeliveryStatus; 4] = [
        DeliveryStatus::OrderPlaced,
        DeliveryStatus::BeingPrepared,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
    ];

    /// Translate a backend status code.
    ///
    /// The backend stores delivery progress as 0..=3; anything else maps to
    /// `Unknown`. Dine-in orders have no code mapping at all, so history rows
    /// are always translated through this vocabulary.
    pub fn from_backend_code(code: i64) -> Self {
        match code {
            0 => DeliveryStatus::OrderPlaced,
            1 => DeliveryStatus::BeingPrepared,
            2 => DeliveryStatus::InTransit,
            3 => DeliveryStatus::Delivered,
            _ => DeliveryStatus::Unknown,
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::OrderPlaced => write!(f, "Order Placed"),
            DeliveryStatus::BeingPrepared => write!(f, "Being Prepared"),
            DeliveryStatus::InTransit => write!(f, "In Transit"),
            DeliveryStatus::Delivered => write!(f, "Delivered"),
            DeliveryStatus::Unknown => write!(f, "Unknown Status"),
        }
    }
}

impl StatusVocabulary for DeliveryStatus {
    const LEN: usize = Self::VOCABULARY.len();

    fn position(self) -> Option<usize> {
        Self::VOCABULARY.iter().position(|s| *s == self)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Fraction of the vocabulary completed, in `0.0..=1.0`.
///
/// An out-of-vocabulary status (`position == None`) counts as nothing
/// reached, not as an error, so tracker widgets render an empty bar instead
/// of failing.
pub fn progress_fraction(position: Option<usize>, vocabulary_len: usize) -> f64 {
    if vocabulary_len < 2 {
        return 0.0;
    }
    match position {
        Some(idx) => idx.min(vocabulary_len - 1) as f64 / (vocabulary_len - 1) as f64,
        None => 0.0,
    }
}

// ============================================================================
// Status history
// ============================================================================

/// One recorded status transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusHistoryEntry<S> {
    /// Status reached
    pub status: S,
    /// When it was recorded (Unix milliseconds)
    pub at_millis: i64,
}

/// Append-only status log for a single order.
///
/// Transitions only move forward: an entry whose position is lower than the
/// current one is logged and dropped, so the visible status never regresses
/// even when updates arrive out of order. Re-recording the current stage is
/// allowed and refreshes its timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StatusHistory<S> {
    entries: Vec<StatusHistoryEntry<S>>,
}

impl<S: StatusVocabulary> StatusHistory<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Start a history at `status`, timestamped now.
    pub fn starting_at(status: S) -> Self {
        let mut history = Self::new();
        history.record(status);
        history
    }

    /// Record `status` now.
    pub fn record(&mut self, status: S) -> bool {
        self.record_at(status, now_millis())
    }

    /// Record `status` at an explicit timestamp.
    ///
    /// Returns `false` (and keeps the history unchanged) when the transition
    /// would move backwards.
    pub fn record_at(&mut self, status: S, at_millis: i64) -> bool {
        let incoming = status.position();
        if let (Some(new_pos), Some(cur_pos)) = (incoming, self.current_position()) {
            if new_pos < cur_pos {
                tracing::warn!(
                    status = %status,
                    current = %self.current().map(|s| s.to_string()).unwrap_or_default(),
                    "Ignoring backwards status transition"
                );
                return false;
            }
        }
        self.entries.push(StatusHistoryEntry { status, at_millis });
        true
    }

    /// Current status: the latest entry at the highest position reached.
    pub fn current(&self) -> Option<S> {
        // max_by_key keeps the last maximal element, i.e. the newest entry
        // when the same stage was recorded twice
        self.entries
            .iter()
            .max_by_key(|e| e.status.position())
            .map(|e| e.status)
    }

    /// Position of the current status within its vocabulary
    pub fn current_position(&self) -> Option<usize> {
        self.current().and_then(|s| s.position())
    }

    /// Progress of the current status through the vocabulary, `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        progress_fraction(self.current_position(), S::LEN)
    }

    pub fn entries(&self) -> &[StatusHistoryEntry<S>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
