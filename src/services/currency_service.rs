// ============================================================================
// CURRENCY SERVICE - Tasa de cambio + conversión y formato de montos
// ============================================================================
// Una sola llamada HTTP externa (API de tasas). El resto es puro.
// ============================================================================

use gloo_net::http::Request;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::CONFIG;
use crate::models::payment::{Currency, ExchangeRate};

/// Respuesta de la API de tasas (formato open.er-api.com)
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    result: Option<String>,
    rates: HashMap<String, f64>,
}

#[derive(Clone)]
pub struct CurrencyService {
    base_url: String,
}

impl CurrencyService {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.exchange_rate_url.clone(),
        }
    }

    /// Consulta la tasa base -> quote
    pub async fn fetch_rate(&self, base: Currency, quote: Currency) -> Result<ExchangeRate, String> {
        if base == quote {
            return Ok(identity_rate(base));
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), base.code());
        log::info!("💱 Consultando tasa {} -> {}", base.code(), quote.code());

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let body = response
            .json::<RatesResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        rate_from_response(body, base, quote)
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}

fn identity_rate(currency: Currency) -> ExchangeRate {
    ExchangeRate {
        base: currency,
        quote: currency,
        rate: 1.0,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn rate_from_response(body: RatesResponse, base: Currency, quote: Currency) -> Result<ExchangeRate, String> {
    if let Some(result) = body.result.as_deref() {
        if result != "success" {
            return Err(format!("La API de tasas respondió '{}'", result));
        }
    }

    let rate = body
        .rates
        .get(quote.code())
        .copied()
        .ok_or_else(|| format!("Tasa {} no disponible", quote.code()))?;
    validate_rate(rate)?;

    Ok(ExchangeRate {
        base,
        quote,
        rate,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    })
}

pub fn validate_rate(rate: f64) -> Result<f64, String> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("Tasa inválida: {}", rate))
    }
}

/// Convierte redondeando a centavos
pub fn convert(amount: f64, rate: &ExchangeRate) -> f64 {
    ((amount * rate.rate) * 100.0).round() / 100.0
}

/// `$1,234.56` para USD, `Bs. 1.234,56` para VES
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let (prefix, thousands, decimal) = match currency {
        Currency::Usd => ("$", ',', '.'),
        Currency::Ves => ("Bs. ", '.', ','),
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}{}{:02}", sign, prefix, grouped, decimal, frac)
}
