use crate::models::{Booking, Interval};

/// Half-open intersection. Touching intervals do not overlap.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.start < b.end && b.start < a.end
}

/// Bookings of `doctor_id` that collide with `candidate`.
pub fn conflicts_for<'a>(
    doctor_id: &str,
    candidate: &Interval,
    bookings: &'a [Booking],
) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|booking| booking.doctor_id == doctor_id)
        .filter(|booking| overlaps(&booking.interval(), candidate))
        .collect()
}
