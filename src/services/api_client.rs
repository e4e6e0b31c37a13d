// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP con el backend gestionado (Stateless)
// ============================================================================
// Passthrough a RPCs y tablas. La lógica (reservas, sorteos, ganadores)
// vive en el backend.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::CONFIG;
use crate::models::draw::{
    Draw, ReleaseReservationRequest, ReserveNumbersRequest, ReserveNumbersResponse,
};
use crate::models::payment::PaymentSubmission;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    anon_key: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.backend_url.trim_end_matches('/').to_string(),
            anon_key: CONFIG.backend_anon_key.clone(),
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// Llama un procedimiento remoto; error si el status no es 2xx
    async fn rpc_call<B: Serialize>(&self, function: &str, body: &B) -> Result<Response, String> {
        let response = self
            .authorize(Request::post(&self.rpc_url(function)))
            .json(body)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("HTTP error {} en {}: {}", status, function, error_text));
        }

        Ok(response)
    }

    /// Llama un procedimiento remoto y parsea su respuesta
    async fn rpc<B, T>(&self, function: &str, body: &B) -> Result<T, String>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.rpc_call(function, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// Reserva números por tiempo limitado
    pub async fn reserve_numbers(
        &self,
        draw_id: &str,
        numbers: &BTreeSet<u32>,
    ) -> Result<ReserveNumbersResponse, String> {
        log::info!("🎟️ Reservando {} números en sorteo {}", numbers.len(), draw_id);
        let request = ReserveNumbersRequest::new(draw_id, numbers);
        let reservation: ReserveNumbersResponse = self.rpc("reserve_numbers", &request).await?;
        log::info!(
            "✅ Reserva {} creada, vence {}",
            reservation.reservation_id,
            reservation.expires_at
        );
        Ok(reservation)
    }

    /// Libera una reserva por id
    pub async fn release_reservation(&self, reservation_id: &str) -> Result<(), String> {
        let request = ReleaseReservationRequest {
            p_reservation_id: reservation_id.to_string(),
        };
        // El RPC devuelve void (204); solo interesa el status
        self.rpc_call("release_reservation", &request).await?;
        Ok(())
    }

    /// Envía el comprobante; consume la reserva
    pub async fn submit_payment(&self, submission: &PaymentSubmission) -> Result<(), String> {
        log::info!(
            "💳 Enviando pago {:?} para reserva {}",
            submission.p_method,
            submission.p_reservation_id
        );
        self.rpc_call("submit_payment", submission).await?;
        Ok(())
    }

    /// Sorteo vigente (scheduled o active), el más próximo
    pub async fn fetch_active_draw(&self) -> Result<Option<Draw>, String> {
        let url = format!(
            "{}/rest/v1/draws?status=in.(scheduled,active)&order=draw_date.asc&limit=1",
            self.base_url
        );

        let response = self
            .authorize(Request::get(&url))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let draws = response
            .json::<Vec<Draw>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        Ok(draws.into_iter().next())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
