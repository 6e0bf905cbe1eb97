use crate::availability::utility::round2;
use std::fmt;

/// A classification attached to an availability record.
///
/// | Note              | Condition                                          |
/// |-------------------|----------------------------------------------------|
/// | `Anomaly`         | observed > expected (expected > 0)                 |
/// | `NoData`          | observed == 0                                      |
/// | `BelowHalf`       | observed < 50% of expected                         |
/// | `RestrictedHours` | operating hours < 24, unless `Anomaly` fired       |
/// | `Complete`        | none of the above                                  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Anomaly { operating_hours: u32 },
    NoData,
    BelowHalf,
    RestrictedHours(u32),
    Complete,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Anomaly { operating_hours } => write!(
                f,
                "⚠️ Data anomali, melebihi ekspektasi ({operating_hours} jam)."
            ),
            Note::NoData => write!(f, "❌ Tidak ada data"),
            Note::BelowHalf => write!(f, "⚠️ Kurang dari 50%"),
            Note::RestrictedHours(hours) => write!(f, "🕒 Op: {hours} jam"),
            Note::Complete => write!(f, "✅ Lengkap"),
        }
    }
}

/// Derives the notes for one (day, station) cell.
///
/// The anomaly note suppresses the restricted-hours note: a station that
/// over-reports is flagged only as anomalous.
pub fn classify(observed: u32, expected: u32, operating_hours: u32) -> Vec<Note> {
    let mut notes = Vec::new();
    let anomalous = expected > 0 && observed > expected;

    if anomalous {
        notes.push(Note::Anomaly { operating_hours });
    } else if observed == 0 {
        notes.push(Note::NoData);
    } else if (observed as f64) < expected as f64 * 0.5 {
        notes.push(Note::BelowHalf);
    }

    if operating_hours < 24 && !anomalous {
        notes.push(Note::RestrictedHours(operating_hours));
    }

    if notes.is_empty() {
        notes.push(Note::Complete);
    }

    notes
}

/// Rounds a ratio to a percentage with two decimals. Zero expected yields 0.
pub fn availability_pct(observed: u32, expected: u32) -> f64 {
    if expected == 0 {
        return 0.0;
    }
    round2(observed as f64 / expected as f64 * 100.0)
}
