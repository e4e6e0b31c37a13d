// ============================================================================
// RESERVATION SERVICE - Liberación de reservas en el backend
// ============================================================================
// Fire-and-forget: el guard resetea su estado local sin esperar respuesta.
// ============================================================================

use crate::services::api_client::ApiClient;

/// Colaborador externo que libera una reserva por id
pub trait ReservationReleaser {
    fn release(&self, reservation_id: &str);
}

/// Libera la reserva vía RPC del backend, sin bloquear la UI
#[derive(Clone)]
pub struct BackendReleaser {
    client: ApiClient,
}

impl BackendReleaser {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl Default for BackendReleaser {
    fn default() -> Self {
        Self::new(ApiClient::new())
    }
}

impl ReservationReleaser for BackendReleaser {
    fn release(&self, reservation_id: &str) {
        let client = self.client.clone();
        let reservation_id = reservation_id.to_string();

        wasm_bindgen_futures::spawn_local(async move {
            match client.release_reservation(&reservation_id).await {
                Ok(()) => log::info!("🔓 Reserva {} liberada", reservation_id),
                // No se reintenta: el estado local ya fue reseteado
                Err(e) => log::warn!("⚠️ No se pudo liberar la reserva {}: {}", reservation_id, e),
            }
        });
    }
}
