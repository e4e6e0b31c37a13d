// ============================================================================
// MODELO DE RESERVA - Sesión de reserva de números (solo memoria)
// ============================================================================
// Vive mientras dure la vista de la página. No se persiste entre recargas.
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Dominio de números de la rifa
pub const NUMBER_RANGE: RangeInclusive<u32> = 1..=100;

/// Etapas del flujo de compra, en orden
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStep {
    SelectingNumbers,
    ChoosingPaymentMethod,
    EnteringPaymentDetails,
    SubmittingPaymentForm,
    Completed,
}

impl ReservationStep {
    pub const ALL: [ReservationStep; 5] = [
        ReservationStep::SelectingNumbers,
        ReservationStep::ChoosingPaymentMethod,
        ReservationStep::EnteringPaymentDetails,
        ReservationStep::SubmittingPaymentForm,
        ReservationStep::Completed,
    ];

    /// Etapas donde perder la reserva le cuesta al usuario
    pub fn is_critical(self) -> bool {
        matches!(
            self,
            ReservationStep::ChoosingPaymentMethod
                | ReservationStep::EnteringPaymentDetails
                | ReservationStep::SubmittingPaymentForm
        )
    }

    /// Siguiente etapa (Completed es terminal)
    pub fn next(self) -> ReservationStep {
        match self {
            ReservationStep::SelectingNumbers => ReservationStep::ChoosingPaymentMethod,
            ReservationStep::ChoosingPaymentMethod => ReservationStep::EnteringPaymentDetails,
            ReservationStep::EnteringPaymentDetails => ReservationStep::SubmittingPaymentForm,
            ReservationStep::SubmittingPaymentForm | ReservationStep::Completed => {
                ReservationStep::Completed
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReservationStep::SelectingNumbers => "Elige tus números",
            ReservationStep::ChoosingPaymentMethod => "Método de pago",
            ReservationStep::EnteringPaymentDetails => "Datos del pago",
            ReservationStep::SubmittingPaymentForm => "Enviando comprobante",
            ReservationStep::Completed => "¡Listo!",
        }
    }
}

impl Default for ReservationStep {
    fn default() -> Self {
        ReservationStep::SelectingNumbers
    }
}

/// Estado de la reserva en curso
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReservationSession {
    pub current_step: ReservationStep,
    pub has_active_reservation: bool,
    pub reservation_id: Option<String>,
    pub selected_numbers: BTreeSet<u32>,
}

impl ReservationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// El flag activo solo es válido con id y números presentes
    pub fn reservation_is_consistent(&self) -> bool {
        let has_id = self
            .reservation_id
            .as_deref()
            .map_or(false, |id| !id.is_empty());
        has_id && !self.selected_numbers.is_empty()
    }
}

/// Actualización parcial de la sesión. `None` = no tocar el campo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub current_step: Option<ReservationStep>,
    pub has_active_reservation: Option<bool>,
    /// `Some(None)` borra el id
    pub reservation_id: Option<Option<String>>,
    pub selected_numbers: Option<BTreeSet<u32>>,
}

impl SessionPatch {
    pub fn step(step: ReservationStep) -> Self {
        Self {
            current_step: Some(step),
            ..Self::default()
        }
    }

    /// Reserva recién confirmada por el backend
    pub fn reserved(reservation_id: impl Into<String>, numbers: BTreeSet<u32>) -> Self {
        Self {
            current_step: None,
            has_active_reservation: Some(true),
            reservation_id: Some(Some(reservation_id.into())),
            selected_numbers: Some(numbers),
        }
    }

    pub fn numbers(numbers: BTreeSet<u32>) -> Self {
        Self {
            selected_numbers: Some(numbers),
            ..Self::default()
        }
    }
}

/// Avisos al usuario emitidos por el guard (toasts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardNotice {
    ReservationReleased,
    ReservationKept,
    ReservationExpired,
}

impl GuardNotice {
    pub fn message(self) -> &'static str {
        match self {
            GuardNotice::ReservationReleased => "Reserva cancelada. Tus números quedaron libres.",
            GuardNotice::ReservationKept => "Tu reserva sigue activa.",
            GuardNotice::ReservationExpired => "Tu reserva expiró. Elige tus números de nuevo.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_steps_are_the_payment_ones() {
        let critical: Vec<_> = ReservationStep::ALL
            .iter()
            .copied()
            .filter(|s| s.is_critical())
            .collect();
        assert_eq!(
            critical,
            vec![
                ReservationStep::ChoosingPaymentMethod,
                ReservationStep::EnteringPaymentDetails,
                ReservationStep::SubmittingPaymentForm,
            ]
        );
    }

    #[test]
    fn steps_advance_in_order_and_stop_at_completed() {
        let mut step = ReservationStep::default();
        let mut seen = vec![step];
        while step != ReservationStep::Completed {
            let next = step.next();
            assert!(next > step);
            step = next;
            seen.push(step);
        }
        assert_eq!(seen, ReservationStep::ALL.to_vec());
        assert_eq!(ReservationStep::Completed.next(), ReservationStep::Completed);
    }

    #[test]
    fn empty_id_is_not_consistent() {
        let session = ReservationSession {
            reservation_id: Some(String::new()),
            selected_numbers: [7].into_iter().collect(),
            ..ReservationSession::default()
        };
        assert!(!session.reservation_is_consistent());
    }

    #[test]
    fn step_serializes_kebab_case() {
        let json = serde_json::to_string(&ReservationStep::EnteringPaymentDetails).unwrap();
        assert_eq!(json, "\"entering-payment-details\"");
    }
}
