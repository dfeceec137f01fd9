use crate::error::{AppError, Result};
use crate::models::{BookingRecord, LabeledBooking};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Day-of-week labels sampled by the generator.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Route segments served by the booking platform.
pub const ROUTE_SEGMENTS: [&str; 6] = [
    "Ahmedabad-Mumbai",
    "Ahmedabad-Surat",
    "Ahmedabad-Vadodara",
    "Mumbai-Surat",
    "Surat-Vadodara",
    "Vadodara-Mumbai",
];

/// Seat type labels.
pub const SEAT_TYPES: [&str; 3] = ["lower", "upper", "side"];

/// Generates a bounded table of historical-looking bookings with a
/// confirmation label correlated with the feature values.
///
/// The label rule is hand-specified: long advance purchase, off-peak
/// booking hours and meal inclusion raise the confirmation probability,
/// large parties and weekend travel lower it. The label is then sampled
/// from that probability, so the signal is learnable but noisy.
///
/// The generator performs no I/O; persisting the table is a caller
/// concern.
#[derive(Debug, Clone)]
pub struct SyntheticDataGenerator {
    seed: u64,
}

impl SyntheticDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate `n_samples` labeled booking rows.
    ///
    /// Identical seeds produce identical tables. Fails with
    /// `InsufficientData` when `n_samples` is zero.
    pub fn generate(&self, n_samples: usize) -> Result<Vec<LabeledBooking>> {
        if n_samples == 0 {
            return Err(AppError::InsufficientData(
                "n_samples must be positive".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut rows = Vec::with_capacity(n_samples);

        for _ in 0..n_samples {
            let record = BookingRecord {
                day_of_week: DAY_NAMES[rng.gen_range(0..DAY_NAMES.len())].to_string(),
                booking_hour: rng.gen_range(0..24),
                route_segment: ROUTE_SEGMENTS[rng.gen_range(0..ROUTE_SEGMENTS.len())].to_string(),
                seat_type: SEAT_TYPES[rng.gen_range(0..SEAT_TYPES.len())].to_string(),
                num_seats: rng.gen_range(1..=6),
                has_meal: rng.gen_range(0..=1),
                advance_days: rng.gen_range(0..=60),
                month: rng.gen_range(1..=12),
            };

            let p = confirmation_probability(&record);
            let confirmed = rng.gen_bool(p);
            rows.push(LabeledBooking { record, confirmed });
        }

        Ok(rows)
    }
}

/// Hand-specified probability that a booking with these attributes is
/// confirmed. Clamped away from 0 and 1 so every combination stays noisy.
pub(crate) fn confirmation_probability(record: &BookingRecord) -> f64 {
    let mut p = 0.5;

    // Early purchases stick; the effect saturates at 30 days out.
    p += 0.25 * (record.advance_days.min(30) as f64 / 30.0);

    // Morning and evening rush bookings churn more.
    let peak = matches!(record.booking_hour, 7..=9 | 17..=21);
    if peak {
        p -= 0.10;
    } else {
        p += 0.05;
    }

    if record.has_meal == 1 {
        p += 0.10;
    }

    // Larger parties fall through more often.
    p -= 0.04 * (record.num_seats.saturating_sub(1)) as f64;

    if record.day_of_week == "Saturday" || record.day_of_week == "Sunday" {
        p -= 0.08;
    }

    p.clamp(0.05, 0.95)
}
