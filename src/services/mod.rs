pub mod api_client;
pub mod reservation_service;
pub mod currency_service;
pub mod navigation_monitor;

pub use api_client::ApiClient;
pub use reservation_service::{BackendReleaser, ReservationReleaser};
pub use currency_service::CurrencyService;
pub use navigation_monitor::{NavigationIntercepts, WindowListener};
