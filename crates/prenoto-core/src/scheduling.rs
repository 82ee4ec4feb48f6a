//! Slot generation and overlap arithmetic.
//!
//! Pure functions only; availability data (already-booked windows) is passed
//! in by the caller. Times are minute-resolution `NaiveTime`s rendered as
//! `"HH:MM"` for the wire.

use chrono::{NaiveTime, Timelike};

use crate::error::AppError;

/// Generate candidate start times between `start_hour:00` (inclusive) and
/// `end_hour:00` (exclusive) at `interval_minutes` spacing.
///
/// `start_hour >= end_hour` yields an empty list. A non-positive interval
/// would never terminate and is rejected with `InvalidInterval`.
pub fn generate_time_slots(
    start_hour: i32,
    end_hour: i32,
    interval_minutes: i32,
) -> Result<Vec<NaiveTime>, AppError> {
    if interval_minutes <= 0 {
        return Err(AppError::InvalidInterval(interval_minutes));
    }

    let mut slots = Vec::new();
    if start_hour >= end_hour {
        return Ok(slots);
    }

    let mut current = start_hour * 60;
    let end = end_hour * 60;
    while current < end {
        // In-range by construction: current < end <= 24*60.
        let time = NaiveTime::from_hms_opt((current / 60) as u32, (current % 60) as u32, 0)
            .ok_or_else(|| AppError::BadRequest(format!("Hour {} out of range", current / 60)))?;
        slots.push(time);
        current += interval_minutes;
    }

    Ok(slots)
}

/// Render a slot the way booking pages show it.
pub fn format_slot(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Whether two appointment windows `[start, start + duration)` overlap.
pub fn windows_overlap(
    start_a: NaiveTime,
    duration_a_minutes: i32,
    start_b: NaiveTime,
    duration_b_minutes: i32,
) -> bool {
    let a_start = start_a.num_seconds_from_midnight() as i64;
    let a_end = a_start + duration_a_minutes as i64 * 60;
    let b_start = start_b.num_seconds_from_midnight() as i64;
    let b_end = b_start + duration_b_minutes as i64 * 60;
    a_start < b_end && b_start < a_end
}

/// Drop candidate starts whose `service_duration`-long window would overlap
/// any of the `booked` windows.
pub fn filter_available(
    candidates: Vec<NaiveTime>,
    service_duration_minutes: i32,
    booked: &[(NaiveTime, i32)],
) -> Vec<NaiveTime> {
    candidates
        .into_iter()
        .filter(|slot| {
            !booked.iter().any(|(start, duration)| {
                windows_overlap(*slot, service_duration_minutes, *start, *duration)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_slot_count_matches_interval_arithmetic() {
        // ceil((end - start) * 60 / interval) slots, strictly increasing,
        // all inside [start:00, end:00).
        for (start, end, interval) in [(9, 19, 30), (9, 19, 45), (8, 12, 25), (0, 24, 60)] {
            let slots = generate_time_slots(start, end, interval).unwrap();
            let expected = ((end - start) * 60 + interval - 1) / interval;
            assert_eq!(slots.len() as i32, expected, "{start}-{end} @{interval}");
            assert!(slots.windows(2).all(|w| w[0] < w[1]));
            assert!(slots.iter().all(|s| *s >= hm(start as u32, 0)));
            assert!(slots
                .iter()
                .all(|s| end == 24 || *s < hm(end as u32, 0)));
        }
    }

    #[test]
    fn test_standard_business_day() {
        let slots = generate_time_slots(9, 19, 30).unwrap();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots.first().copied(), Some(hm(9, 0)));
        assert_eq!(slots.last().copied(), Some(hm(18, 30)));
        assert_eq!(format_slot(slots[1]), "09:30");
    }

    #[test]
    fn test_interval_not_dividing_range_stays_below_end() {
        let slots = generate_time_slots(9, 10, 45).unwrap();
        assert_eq!(
            slots,
            vec![hm(9, 0), hm(9, 45)],
            "next candidate 10:30 is past closing"
        );
    }

    #[test]
    fn test_start_at_or_after_end_is_empty() {
        assert!(generate_time_slots(19, 9, 30).unwrap().is_empty());
        assert!(generate_time_slots(9, 9, 30).unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        assert!(matches!(
            generate_time_slots(9, 19, 0),
            Err(AppError::InvalidInterval(0))
        ));
        assert!(matches!(
            generate_time_slots(9, 19, -15),
            Err(AppError::InvalidInterval(-15))
        ));
    }

    #[test]
    fn test_windows_overlap() {
        // Same start
        assert!(windows_overlap(hm(10, 0), 30, hm(10, 0), 30));
        // Candidate starts inside an existing window
        assert!(windows_overlap(hm(10, 15), 30, hm(10, 0), 30));
        // Existing booking starts inside the candidate window
        assert!(windows_overlap(hm(10, 0), 60, hm(10, 30), 30));
        // Back-to-back appointments do not conflict
        assert!(!windows_overlap(hm(10, 0), 30, hm(10, 30), 30));
        assert!(!windows_overlap(hm(10, 30), 30, hm(10, 0), 30));
    }

    #[test]
    fn test_filter_available_removes_booked_windows() {
        let candidates = generate_time_slots(9, 11, 30).unwrap();
        // One hour-long booking at 09:30 consumes 09:30 and 10:00, and a
        // 30-minute candidate at 09:00 survives.
        let booked = vec![(hm(9, 30), 60)];
        let available = filter_available(candidates, 30, &booked);
        assert_eq!(available, vec![hm(9, 0), hm(10, 30)]);
    }

    #[test]
    fn test_filter_available_accounts_for_service_duration() {
        let candidates = generate_time_slots(9, 11, 30).unwrap();
        // A 90-minute service starting 09:00 would run into a 10:00 booking.
        let booked = vec![(hm(10, 0), 30)];
        let available = filter_available(candidates, 90, &booked);
        assert_eq!(available, vec![hm(10, 30)]);
    }

    #[test]
    fn test_filter_available_empty_booked_keeps_all() {
        let candidates = generate_time_slots(9, 10, 30).unwrap();
        let available = filter_available(candidates.clone(), 30, &[]);
        assert_eq!(available, candidates);
    }
}
