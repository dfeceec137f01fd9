use serde::{Deserialize, Serialize};
use validator::Validate;

/// One booking's feature tuple, used both for training and inference.
///
/// All eight fields are required; categorical fields are validated against
/// the fitted vocabulary at encoding time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookingRecord {
    /// Day-of-week label, e.g. "Friday"
    #[validate(length(min = 1))]
    pub day_of_week: String,

    /// Hour the booking was placed (0-23)
    #[validate(range(max = 23))]
    pub booking_hour: u8,

    /// Route segment label, e.g. "Ahmedabad-Mumbai"
    #[validate(length(min = 1))]
    pub route_segment: String,

    /// Seat type label (lower/upper/side)
    #[validate(length(min = 1))]
    pub seat_type: String,

    /// Party size
    #[validate(range(min = 1))]
    pub num_seats: u32,

    /// Meal included flag (0 or 1)
    #[validate(range(max = 1))]
    pub has_meal: u8,

    /// Days between booking and travel
    pub advance_days: u32,

    /// Travel month (1-12)
    #[validate(range(min = 1, max = 12))]
    pub month: u8,
}

/// A booking row with its confirmation label, as produced by the
/// synthetic dataset generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBooking {
    pub record: BookingRecord,
    pub confirmed: bool,
}

/// Three-tier bucketing of the confirmation probability for
/// operator-facing guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a rounded probability (0-100 scale).
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 80.0 {
            RiskLevel::Low
        } else if probability >= 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Operator guidance text for this tier.
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Low => "High confidence booking - likely to be confirmed",
            RiskLevel::Medium => "Moderate confidence - consider sending reminder",
            RiskLevel::High => "Low confidence - consider overbooking strategy",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}
