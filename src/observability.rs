// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: advisory availability checks served.
pub const ADMISSION_CHECKS_TOTAL: &str = "rota_admission_checks_total";

/// Counter: bookings admitted by the engine.
pub const RESERVATIONS_TOTAL: &str = "rota_reservations_total";

/// Counter: admissions and re-entries refused because the interval was taken.
pub const CONFLICTS_TOTAL: &str = "rota_conflicts_total";

/// Counter: booking status transitions applied.
pub const TRANSITIONS_TOTAL: &str = "rota_transitions_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: provider-day calendars resident in memory.
pub const DAYS_ACTIVE: &str = "rota_days_active";
