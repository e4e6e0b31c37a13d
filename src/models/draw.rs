use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Estado de un sorteo en el backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStatus {
    Scheduled,
    Active,
    Finished,
    Cancelled,
}

impl DrawStatus {
    /// Se pueden reservar números
    pub fn accepts_entries(self) -> bool {
        matches!(self, DrawStatus::Scheduled | DrawStatus::Active)
    }
}

/// Sorteo (tabla `draws`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub id: String,
    pub title: String,
    pub status: DrawStatus,
    /// Fecha/hora del sorteo (ISO-8601)
    pub draw_date: String,
    #[serde(default)]
    pub winning_number: Option<u32>,
    /// Precio por número en la moneda base
    #[serde(default)]
    pub ticket_price: Option<f64>,
}

/// Payload del RPC `reserve_numbers`
#[derive(Debug, Clone, Serialize)]
pub struct ReserveNumbersRequest {
    pub p_draw_id: String,
    pub p_numbers: Vec<u32>,
}

impl ReserveNumbersRequest {
    pub fn new(draw_id: &str, numbers: &BTreeSet<u32>) -> Self {
        Self {
            p_draw_id: draw_id.to_string(),
            p_numbers: numbers.iter().copied().collect(),
        }
    }
}

/// Respuesta del RPC `reserve_numbers`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReserveNumbersResponse {
    pub reservation_id: String,
    /// Vencimiento de la reserva (ISO-8601)
    pub expires_at: String,
}

/// Payload del RPC `release_reservation`
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReservationRequest {
    pub p_reservation_id: String,
}
