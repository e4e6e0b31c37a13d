pub mod use_reservation_guard;
pub mod use_countdown;

pub use use_reservation_guard::{use_reservation_guard, UseReservationGuardHandle};
pub use use_countdown::{use_countdown, UseCountdownHandle};
