use rifa_web::config::CONFIG;
use rifa_web::App;

fn main() {
    // Panic hook primero para ver errores en consola
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 Rifa web starting...");

    yew::Renderer::<App>::new().render();
}
