pub mod reservation;
pub mod draw;
pub mod payment;

pub use reservation::{GuardNotice, ReservationSession, ReservationStep, SessionPatch};
pub use draw::{Draw, DrawStatus, ReserveNumbersResponse};
pub use payment::{Currency, ExchangeRate, PaymentMethod, PaymentSubmission};
