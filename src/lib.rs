// ============================================================================
// RIFA WEB - FRONTEND (RUST PURO + YEW)
// ============================================================================
// - Views: componentes que renderizan (sin lógica de negocio)
// - Hooks: cablean el estado con el navegador (listeners, timers)
// - State: ReservationGuard, dueño único de la sesión de reserva
// - Services: SOLO comunicación con backend / API de tasas / eventos de window
// - Models: estructuras compartidas con el backend
// ============================================================================

pub mod config;
pub mod models;
pub mod state;
pub mod services;
pub mod hooks;
pub mod utils;
pub mod views;

pub use views::App;
