use serde::{Deserialize, Serialize};

use crate::models::payment::Currency;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL del backend gestionado (REST + RPC)
    pub backend_url: String,
    /// Clave pública (anon) del backend
    pub backend_anon_key: String,
    pub exchange_rate_url: String,
    pub base_currency: Currency,
    pub local_currency: Currency,
    /// Precio por número si el sorteo no trae uno
    pub ticket_price: f64,
    pub countdown_tick_ms: u32,
    pub notice_duration_ms: u32,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:54321".to_string(),
            backend_anon_key: String::new(),
            exchange_rate_url: "https://open.er-api.com/v6/latest".to_string(),
            base_currency: Currency::Usd,
            local_currency: Currency::Ves,
            ticket_price: 1.0,
            countdown_tick_ms: 1000,
            notice_duration_ms: 4000,
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: option_env!("BACKEND_URL")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url),
            backend_anon_key: option_env!("BACKEND_ANON_KEY")
                .map(str::to_string)
                .unwrap_or(defaults.backend_anon_key),
            exchange_rate_url: option_env!("EXCHANGE_RATE_URL")
                .map(str::to_string)
                .unwrap_or(defaults.exchange_rate_url),
            base_currency: option_env!("BASE_CURRENCY")
                .and_then(Currency::from_code)
                .unwrap_or(defaults.base_currency),
            local_currency: option_env!("LOCAL_CURRENCY")
                .and_then(Currency::from_code)
                .unwrap_or(defaults.local_currency),
            ticket_price: parse_or(option_env!("TICKET_PRICE"), defaults.ticket_price),
            countdown_tick_ms: parse_or(option_env!("COUNTDOWN_TICK_MS"), defaults.countdown_tick_ms),
            notice_duration_ms: parse_or(option_env!("NOTICE_DURATION_MS"), defaults.notice_duration_ms),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, fallback: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_values_fall_back() {
        assert_eq!(parse_or(Some("abc"), 1000u32), 1000);
        assert_eq!(parse_or(Some(" 250 "), 1000u32), 250);
        assert_eq!(parse_or::<bool>(None, true), true);
    }

    #[test]
    fn ticks_every_second_by_default() {
        let config = AppConfig::default();
        assert_eq!(config.countdown_tick_ms, 1000);
        assert_eq!(config.local_currency, Currency::Ves);
    }
}
