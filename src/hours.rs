//! Working-hours configuration.
//!
//! A [`WorkingHours`] record describes one provider's daily rhythm: opening
//! hour, closing hour, slot length, and an optional lunch break. An
//! [`HoursBook`] holds the clinic-wide default plus per-provider overrides.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits;
use crate::model::Minute;

/// One provider's daily schedule shape.
///
/// Hours are whole wall-clock hours (`9` = 09:00); slot length is in
/// minutes. The break, when present, blanks out every slot that *starts*
/// within `[break_start_hour, break_end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub open_hour: u8,
    pub close_hour: u8,
    pub slot_minutes: Minute,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start_hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end_hour: Option<u8>,
}

impl WorkingHours {
    /// Hours with no break. Use [`with_break`](Self::with_break) to add one.
    pub fn new(open_hour: u8, close_hour: u8, slot_minutes: Minute) -> Self {
        Self {
            open_hour,
            close_hour,
            slot_minutes,
            break_start_hour: None,
            break_end_hour: None,
        }
    }

    pub fn with_break(mut self, start_hour: u8, end_hour: u8) -> Self {
        self.break_start_hour = Some(start_hour);
        self.break_end_hour = Some(end_hour);
        self
    }

    pub(crate) fn break_window(&self) -> Option<(u8, u8)> {
        match (self.break_start_hour, self.break_end_hour) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    /// Whether this config can produce any slots at all.
    ///
    /// Half-specified or inverted breaks count as malformed, same as an
    /// inverted open/close pair: slot generation yields an empty day rather
    /// than guessing what was meant.
    pub fn is_well_formed(&self) -> bool {
        if self.open_hour > 23 || self.close_hour > 24 || self.close_hour <= self.open_hour {
            return false;
        }
        if self.slot_minutes <= 0 || self.slot_minutes > limits::MAX_SLOT_MINUTES {
            return false;
        }
        match (self.break_start_hour, self.break_end_hour) {
            (None, None) => true,
            (Some(s), Some(e)) => s < e && s <= 23 && e <= 24,
            _ => false,
        }
    }
}

impl Default for WorkingHours {
    /// The shipped clinic defaults: 09:00–17:00, 30-minute slots,
    /// lunch 13:00–14:00.
    fn default() -> Self {
        Self::new(9, 17, 30).with_break(13, 14)
    }
}

/// Clinic-wide hours plus per-provider overrides.
///
/// Lookups never fail: a provider without an override gets the default.
#[derive(Debug)]
pub struct HoursBook {
    default: WorkingHours,
    overrides: DashMap<Ulid, WorkingHours>,
}

impl HoursBook {
    pub fn new(default: WorkingHours) -> Self {
        Self {
            default,
            overrides: DashMap::new(),
        }
    }

    /// Hours in effect for `provider`: its override, or the book default.
    pub fn resolve(&self, provider: &Ulid) -> WorkingHours {
        self.overrides
            .get(provider)
            .map(|h| *h.value())
            .unwrap_or(self.default)
    }

    pub fn set_override(&self, provider: Ulid, hours: WorkingHours) -> Result<(), EngineError> {
        if !self.overrides.contains_key(&provider)
            && self.overrides.len() >= limits::MAX_HOURS_OVERRIDES
        {
            return Err(EngineError::LimitExceeded("hours override cap reached"));
        }
        self.overrides.insert(provider, hours);
        Ok(())
    }

    pub fn clear_override(&self, provider: &Ulid) {
        self.overrides.remove(provider);
    }
}

impl Default for HoursBook {
    fn default() -> Self {
        Self::new(WorkingHours::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hours_shape() {
        let h = WorkingHours::default();
        assert_eq!(h.open_hour, 9);
        assert_eq!(h.close_hour, 17);
        assert_eq!(h.slot_minutes, 30);
        assert_eq!(h.break_window(), Some((13, 14)));
        assert!(h.is_well_formed());
    }

    #[test]
    fn no_break_is_well_formed() {
        assert!(WorkingHours::new(8, 12, 15).is_well_formed());
    }

    #[test]
    fn malformed_configs() {
        // Inverted or empty day.
        assert!(!WorkingHours::new(17, 9, 30).is_well_formed());
        assert!(!WorkingHours::new(9, 9, 30).is_well_formed());
        // Out-of-range hours.
        assert!(!WorkingHours::new(24, 25, 30).is_well_formed());
        // Bad slot length.
        assert!(!WorkingHours::new(9, 17, 0).is_well_formed());
        assert!(!WorkingHours::new(9, 17, -30).is_well_formed());
        assert!(!WorkingHours::new(9, 17, 24 * 60 + 1).is_well_formed());
        // Inverted break.
        assert!(!WorkingHours::new(9, 17, 30).with_break(14, 13).is_well_formed());
        assert!(!WorkingHours::new(9, 17, 30).with_break(13, 13).is_well_formed());
    }

    #[test]
    fn half_specified_break_is_malformed() {
        let mut h = WorkingHours::new(9, 17, 30);
        h.break_start_hour = Some(13);
        assert!(!h.is_well_formed());
        assert_eq!(h.break_window(), None);
    }

    #[test]
    fn close_at_midnight_allowed() {
        assert!(WorkingHours::new(22, 24, 30).is_well_formed());
    }

    #[test]
    fn book_resolves_default_then_override() {
        let book = HoursBook::default();
        let dentist = Ulid::new();
        assert_eq!(book.resolve(&dentist), WorkingHours::default());

        let late = WorkingHours::new(12, 20, 20);
        book.set_override(dentist, late).unwrap();
        assert_eq!(book.resolve(&dentist), late);
        // Other providers still see the default.
        assert_eq!(book.resolve(&Ulid::new()), WorkingHours::default());

        book.clear_override(&dentist);
        assert_eq!(book.resolve(&dentist), WorkingHours::default());
    }

    #[test]
    fn override_cap() {
        let book = HoursBook::default();
        let hours = WorkingHours::new(8, 16, 30);
        let first = Ulid::new();
        book.set_override(first, hours).unwrap();
        for _ in 1..limits::MAX_HOURS_OVERRIDES {
            book.set_override(Ulid::new(), hours).unwrap();
        }
        assert!(matches!(
            book.set_override(Ulid::new(), hours),
            Err(EngineError::LimitExceeded(_))
        ));
        // Replacing an existing override is still fine at the cap.
        book.set_override(first, WorkingHours::new(7, 15, 30)).unwrap();
    }

    #[test]
    fn hours_serde_omits_absent_break() {
        let json = serde_json::to_value(WorkingHours::new(9, 17, 30)).unwrap();
        assert!(json.get("break_start_hour").is_none());

        let h: WorkingHours =
            serde_json::from_str(r#"{"open_hour":9,"close_hour":17,"slot_minutes":45}"#).unwrap();
        assert_eq!(h, WorkingHours::new(9, 17, 45));
    }
}
