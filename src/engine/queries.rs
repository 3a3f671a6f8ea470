use chrono::NaiveDate;
use ulid::Ulid;

use crate::hours::WorkingHours;
use crate::model::{Booking, Slot};

use super::slots::{annotate_slots, generate_slots};
use super::Engine;

impl Engine {
    /// Every booking on the provider's date, any status, sorted by start.
    pub async fn bookings_for(&self, provider: Ulid, date: NaiveDate) -> Vec<Booking> {
        match self.day(provider, date) {
            Some(day) => day.read().await.bookings.clone(),
            None => Vec::new(),
        }
    }

    pub async fn booking(&self, id: Ulid) -> Option<Booking> {
        let (provider, date) = self.booking_key(&id)?;
        let day = self.day(provider, date)?;
        let guard = day.read().await;
        guard.booking(id).cloned()
    }

    /// The day's slot grid annotated against live bookings.
    ///
    /// Annotation runs under the day's read lock, so the grid reflects one
    /// consistent snapshot of the bookings, stale as soon as a writer
    /// gets in.
    pub async fn day_slots(
        &self,
        hours: &WorkingHours,
        provider: Ulid,
        date: NaiveDate,
    ) -> Vec<Slot> {
        let slots = generate_slots(hours);
        if slots.is_empty() {
            return slots;
        }
        match self.day(provider, date) {
            Some(day) => {
                let guard = day.read().await;
                annotate_slots(slots, &guard.bookings)
            }
            None => slots,
        }
    }
}
