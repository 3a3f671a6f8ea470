//! Pure slot arithmetic: working hours in, candidate slots out.
//! Nothing here touches engine state or takes locks.

use crate::hours::WorkingHours;
use crate::model::{Booking, Minute, Slot, Span};

use super::conflict::span_is_free;

/// Expand a working-hours config into the day's slot grid.
///
/// Slots march from opening in `slot_minutes` steps. Two rules prune the
/// grid: a slot that would run past closing is dropped (no partial slot at
/// the end of day), and a slot *starting* within the break window is
/// dropped. Skipping a slot never shifts the grid; the cadence resumes on
/// the same arithmetic after the break.
///
/// A malformed config produces an empty day, never an error.
///
/// Break pruning goes by start hour only: a slot that starts before the
/// break but runs into it survives. Callers that need the break airtight
/// should pick slot lengths that divide the hour.
pub fn generate_slots(hours: &WorkingHours) -> Vec<Slot> {
    if !hours.is_well_formed() {
        return Vec::new();
    }
    let open: Minute = hours.open_hour as Minute * 60;
    let close: Minute = hours.close_hour as Minute * 60;
    let step = hours.slot_minutes;
    let brk = hours.break_window();

    let mut slots = Vec::with_capacity(((close - open) / step) as usize);
    let mut start = open;
    loop {
        let end = start + step;
        if end > close {
            break;
        }
        let start_hour = (start / 60) as u8;
        let in_break = brk.is_some_and(|(b_start, b_end)| start_hour >= b_start && start_hour < b_end);
        if !in_break {
            slots.push(Slot {
                span: Span::new(start, end),
                available: true,
            });
        }
        start = end;
    }
    slots
}

/// Recompute the `available` flag on each slot against a booking list.
///
/// Incoming flags are ignored, so annotating twice with the same bookings
/// is a no-op and callers may pass a freshly generated or stale grid alike.
pub fn annotate_slots(mut slots: Vec<Slot>, bookings: &[Booking]) -> Vec<Slot> {
    for slot in &mut slots {
        slot.available = span_is_free(&slot.span, bookings);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{fmt_hhmm, BookingStatus, DAY_END};
    use chrono::NaiveDate;
    use ulid::Ulid;

    fn booking(start: Minute, end: Minute, status: BookingStatus) -> Booking {
        Booking {
            id: Ulid::new(),
            provider: Ulid::new(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            span: Span::new(start, end),
            status,
        }
    }

    fn starts(slots: &[Slot]) -> Vec<String> {
        slots.iter().map(|s| fmt_hhmm(s.span.start)).collect()
    }

    #[test]
    fn plain_grid_bounds_and_spacing() {
        let slots = generate_slots(&WorkingHours::new(9, 17, 30));
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].span, Span::new(9 * 60, 9 * 60 + 30));
        assert_eq!(slots[15].span, Span::new(16 * 60 + 30, 17 * 60));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
        assert!(slots.iter().all(|s| s.available));
        // Pure function of config: a second call yields the same grid.
        assert_eq!(slots, generate_slots(&WorkingHours::new(9, 17, 30)));
    }

    #[test]
    fn default_hours_skip_lunch() {
        let slots = generate_slots(&WorkingHours::default());
        // 8 morning + 6 afternoon; the two 13:xx slots are pruned.
        assert_eq!(slots.len(), 14);
        assert!(slots.iter().all(|s| s.span.start / 60 != 13));
        // The grid is not shifted: the afternoon resumes exactly at 14:00.
        assert!(slots.iter().any(|s| s.span.start == 14 * 60));
    }

    #[test]
    fn non_dividing_slot_length_drops_partial_tail() {
        let slots = generate_slots(&WorkingHours::new(9, 12, 50));
        assert_eq!(
            starts(&slots),
            ["09:00", "09:50", "10:40"],
            "last grid point 11:30 would end 12:20, past close"
        );
        assert_eq!(fmt_hhmm(slots[2].span.end), "11:30");
    }

    #[test]
    fn slot_longer_than_window_yields_empty() {
        assert!(generate_slots(&WorkingHours::new(9, 10, 120)).is_empty());
    }

    #[test]
    fn break_pruning_is_by_start_hour_only() {
        // 45-minute cadence around a 13:00-14:00 break: the 12:45 slot starts
        // in hour 12, so it survives even though it runs to 13:30.
        let slots = generate_slots(&WorkingHours::new(9, 17, 45).with_break(13, 14));
        assert_eq!(
            starts(&slots),
            ["09:00", "09:45", "10:30", "11:15", "12:00", "12:45", "14:15", "15:00", "15:45"]
        );
        let leaker = slots.iter().find(|s| s.span.start == 12 * 60 + 45).unwrap();
        assert_eq!(fmt_hhmm(leaker.span.end), "13:30");
        // The 13:30 grid point is pruned; cadence resumes at 14:15, not 14:00.
        assert!(slots.iter().all(|s| s.span.start != 13 * 60 + 30));
    }

    #[test]
    fn multi_hour_break() {
        let slots = generate_slots(&WorkingHours::new(8, 18, 60).with_break(12, 15));
        assert_eq!(
            starts(&slots),
            ["08:00", "09:00", "10:00", "11:00", "15:00", "16:00", "17:00"]
        );
    }

    #[test]
    fn malformed_config_yields_empty() {
        assert!(generate_slots(&WorkingHours::new(17, 9, 30)).is_empty());
        assert!(generate_slots(&WorkingHours::new(9, 9, 30)).is_empty());
        assert!(generate_slots(&WorkingHours::new(9, 17, 0)).is_empty());
        assert!(generate_slots(&WorkingHours::new(9, 17, 30).with_break(14, 13)).is_empty());

        let mut half = WorkingHours::new(9, 17, 30);
        half.break_end_hour = Some(14);
        assert!(generate_slots(&half).is_empty());
    }

    #[test]
    fn full_day_grid_reaches_midnight() {
        let slots = generate_slots(&WorkingHours::new(0, 24, 60));
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[23].span.end, DAY_END);
    }

    #[test]
    fn annotate_marks_overlapped_slots() {
        let slots = generate_slots(&WorkingHours::new(9, 11, 30));
        // One booking straddling two slots.
        let taken = [booking(9 * 60 + 15, 9 * 60 + 45, BookingStatus::Scheduled)];
        let slots = annotate_slots(slots, &taken);
        assert_eq!(
            slots.iter().map(|s| s.available).collect::<Vec<_>>(),
            [false, false, true, true]
        );
    }

    #[test]
    fn annotate_ignores_non_blocking() {
        let slots = generate_slots(&WorkingHours::new(9, 10, 30));
        let history = [
            booking(9 * 60, 9 * 60 + 30, BookingStatus::Cancelled),
            booking(9 * 60 + 30, 10 * 60, BookingStatus::NoShow),
        ];
        let slots = annotate_slots(slots, &history);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn annotate_recomputes_from_scratch() {
        let mut slots = generate_slots(&WorkingHours::new(9, 10, 30));
        slots[0].available = false; // stale flag
        let slots = annotate_slots(slots, &[]);
        assert!(slots[0].available);
    }

    #[test]
    fn annotate_is_idempotent() {
        let taken = [booking(9 * 60, 9 * 60 + 30, BookingStatus::Confirmed)];
        let once = annotate_slots(generate_slots(&WorkingHours::new(9, 11, 30)), &taken);
        let twice = annotate_slots(once.clone(), &taken);
        assert_eq!(once, twice);
    }
}
