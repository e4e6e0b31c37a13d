// ============================================================================
// STATE MODULE - Controladores con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reservation_guard;

pub use reservation_guard::*;
