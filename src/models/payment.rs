use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Ves,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Ves => "VES",
        }
    }

    pub fn from_code(code: &str) -> Option<Currency> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "VES" | "VEF" | "BS" => Some(Currency::Ves),
            _ => None,
        }
    }
}

/// Métodos de pago aceptados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    PagoMovil,
    BankTransfer,
    Zelle,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::PagoMovil,
        PaymentMethod::BankTransfer,
        PaymentMethod::Zelle,
        PaymentMethod::Cash,
    ];

    /// Moneda en la que se liquida el pago
    pub fn currency(self) -> Currency {
        match self {
            PaymentMethod::PagoMovil | PaymentMethod::BankTransfer => Currency::Ves,
            PaymentMethod::Zelle | PaymentMethod::Cash => Currency::Usd,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::PagoMovil => "Pago Móvil",
            PaymentMethod::BankTransfer => "Transferencia",
            PaymentMethod::Zelle => "Zelle",
            PaymentMethod::Cash => "Efectivo",
        }
    }

    /// Requiere comprobante (referencia) para validar
    pub fn requires_proof(self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// Tasa de cambio base -> quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: Currency,
    pub quote: Currency,
    pub rate: f64,
    /// Momento de la consulta (RFC 3339)
    pub fetched_at: String,
}

/// Payload del RPC `submit_payment` (comprobante de pago)
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSubmission {
    pub p_reservation_id: String,
    pub p_method: PaymentMethod,
    pub p_reference: Option<String>,
    pub p_amount: f64,
    pub p_currency: Currency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_methods_settle_in_bolivares() {
        assert_eq!(PaymentMethod::PagoMovil.currency(), Currency::Ves);
        assert_eq!(PaymentMethod::Zelle.currency(), Currency::Usd);
        assert!(!PaymentMethod::Cash.requires_proof());
    }

    #[test]
    fn submission_uses_backend_codes() {
        let submission = PaymentSubmission {
            p_reservation_id: "res-1".into(),
            p_method: PaymentMethod::PagoMovil,
            p_reference: Some("0123".into()),
            p_amount: 73.0,
            p_currency: Currency::Ves,
        };
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["p_method"], "pago_movil");
        assert_eq!(value["p_currency"], "VES");
    }

    #[test]
    fn currency_codes_are_case_insensitive() {
        assert_eq!(Currency::from_code(" ves "), Some(Currency::Ves));
        assert_eq!(Currency::from_code("usd"), Some(Currency::Usd));
        assert_eq!(Currency::from_code("EUR"), None);
    }
}
