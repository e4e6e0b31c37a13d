// ============================================================================
// MONITOR DE NAVEGACIÓN - Intercepta back/forward y cierre de pestaña
// ============================================================================
// Mientras el guard bloquea:
// - popstate: re-empuja la URL actual y pasa el intento por el guard
// - la entrada centinela se empuja al empezar a bloquear (ver hook)
// - beforeunload: usa el prompt nativo del navegador (no se puede pintar UI)
// Los listeners se quitan en Drop: nunca sobreviven al componente dueño.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BeforeUnloadEvent, Event, History, Window};

use crate::state::reservation_guard::ReservationGuard;

/// Texto orientativo: los navegadores modernos muestran su propio mensaje
pub const UNLOAD_MESSAGE: &str = "Tienes una reserva activa. Si sales, perderás tus números.";

/// Listener en `window` que se desregistra al hacer drop
pub struct WindowListener {
    window: Window,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn new<F>(window: &Window, event_type: &'static str, handler: F) -> Result<Self, String>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        window
            .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            .map_err(|e| format!("No se pudo registrar '{}': {:?}", event_type, e))?;

        Ok(Self {
            window: window.clone(),
            event_type,
            closure,
        })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback(self.event_type, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("⚠️ No se pudo quitar el listener '{}': {:?}", self.event_type, e);
        }
    }
}

fn push_current_location(window: &Window, history: &History) -> Result<(), String> {
    let href = window
        .location()
        .href()
        .map_err(|e| format!("location.href no disponible: {:?}", e))?;
    history
        .push_state_with_url(&JsValue::NULL, "", Some(&href))
        .map_err(|e| format!("pushState falló: {:?}", e))
}

/// Entrada centinela: el primer "atrás" cae aquí y se puede interceptar.
/// Se empuja cada vez que el guard empieza a bloquear.
pub fn push_history_sentinel() -> Result<(), String> {
    let window = web_sys::window().ok_or("window no disponible")?;
    let history = window
        .history()
        .map_err(|e| format!("history no disponible: {:?}", e))?;
    push_current_location(&window, &history)
}

/// Qué hacer con un popstate ya ocurrido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopstateAction {
    /// Sin reserva crítica: el navegador sigue su curso
    PassThrough,
    /// Re-empujar la URL actual; `leave` queda en manos del guard
    Reassert,
}

/// Decide un popstate. Si bloquea, `leave` solo corre tras `confirm()`.
pub fn on_popstate<F>(guard: &mut ReservationGuard, leave: F) -> PopstateAction
where
    F: FnOnce() + 'static,
{
    if !guard.should_block() {
        return PopstateAction::PassThrough;
    }
    guard.attempt_navigation(leave);
    PopstateAction::Reassert
}

/// El prompt nativo de cierre solo aparece con reserva crítica activa
pub fn unload_should_prompt(guard: &ReservationGuard) -> bool {
    guard.should_block()
}

/// Intercepts armados; se desarman al hacer drop
pub struct NavigationIntercepts {
    _popstate: WindowListener,
    _beforeunload: WindowListener,
}

impl NavigationIntercepts {
    pub fn arm(guard: Rc<RefCell<ReservationGuard>>) -> Result<Self, String> {
        let window = web_sys::window().ok_or("window no disponible")?;
        let history = window
            .history()
            .map_err(|e| format!("history no disponible: {:?}", e))?;

        let popstate = {
            let guard = guard.clone();
            let win = window.clone();
            WindowListener::new(&window, "popstate", move |_event: Event| {
                let mut guard = match guard.try_borrow_mut() {
                    Ok(guard) => guard,
                    Err(_) => {
                        log::warn!("⚠️ [NAV] Guard ocupado, popstate descartado");
                        return;
                    }
                };

                // Al confirmar: saltar el centinela y la página actual
                let back = history.clone();
                let leave = move || {
                    if let Err(e) = back.go_with_delta(-2) {
                        log::error!("❌ [NAV] history.go(-2) falló: {:?}", e);
                    }
                };

                match on_popstate(&mut guard, leave) {
                    PopstateAction::PassThrough => {
                        log::debug!("[NAV] popstate sin reserva crítica, se deja pasar");
                    }
                    PopstateAction::Reassert => {
                        // Neutraliza el back mientras el usuario decide
                        if let Err(e) = push_current_location(&win, &history) {
                            log::error!("❌ [NAV] {}", e);
                        }
                    }
                }
            })?
        };

        let beforeunload = {
            let guard = guard.clone();
            WindowListener::new(&window, "beforeunload", move |event: Event| {
                let prompt = guard
                    .try_borrow()
                    .map(|guard| unload_should_prompt(&guard))
                    .unwrap_or(false);
                if !prompt {
                    return;
                }
                event.prevent_default();
                if let Some(unload) = event.dyn_ref::<BeforeUnloadEvent>() {
                    unload.set_return_value(UNLOAD_MESSAGE);
                }
            })?
        };

        log::info!("✅ [NAV] Intercepts de navegación armados");
        Ok(Self {
            _popstate: popstate,
            _beforeunload: beforeunload,
        })
    }
}

impl Drop for NavigationIntercepts {
    fn drop(&mut self) {
        log::info!("🔌 [NAV] Intercepts de navegación desarmados");
    }
}
