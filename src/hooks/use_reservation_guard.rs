// ============================================================================
// USE RESERVATION GUARD HOOK
// ============================================================================
// Un ReservationGuard por componente dueño. Arma los intercepts del navegador
// al montar y los desarma al desmontar; si queda una reserva activa al
// desmontar, el guard la libera. El guard no sale del hook.
// ============================================================================

use std::rc::Rc;

use yew::prelude::*;

use crate::models::reservation::{GuardNotice, ReservationSession, SessionPatch};
use crate::services::navigation_monitor::{push_history_sentinel, NavigationIntercepts};
use crate::services::reservation_service::BackendReleaser;
use crate::state::reservation_guard::{NavigationOutcome, ReservationGuard};

#[derive(Clone)]
pub struct UseReservationGuardHandle {
    pub session: ReservationSession,
    pub should_block: bool,
    pub prompt_open: bool,
    pub notice: Option<GuardNotice>,
    pub update_state: Callback<SessionPatch>,
    /// Recibe la navegación a ejecutar si se permite
    pub attempt_navigation: Callback<Callback<()>>,
    pub confirm: Callback<()>,
    pub cancel: Callback<()>,
    pub cleanup: Callback<()>,
    pub expire: Callback<()>,
    pub dismiss_notice: Callback<()>,
}

#[hook]
pub fn use_reservation_guard() -> UseReservationGuardHandle {
    let guard = use_mut_ref(|| ReservationGuard::new(Rc::new(BackendReleaser::default())));
    let trigger = use_force_update();

    // Montaje: suscripción + intercepts. Desmontaje: desarmar + teardown.
    {
        let guard = guard.clone();
        let trigger = trigger.clone();
        use_effect_with((), move |_| {
            guard.borrow_mut().subscribe(move || {
                // Re-render fuera del borrow activo del guard
                let trigger = trigger.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    trigger.force_update();
                });
            });

            let intercepts = match NavigationIntercepts::arm(guard.clone()) {
                Ok(intercepts) => Some(intercepts),
                Err(e) => {
                    // La navegación interna sigue protegida por attempt_navigation
                    log::error!("❌ [GUARD] No se pudieron armar los intercepts: {}", e);
                    None
                }
            };

            move || {
                drop(intercepts);
                guard.borrow_mut().teardown();
            }
        });
    }

    let (session, should_block, prompt_open, notice) = {
        let current = guard.borrow();
        (
            current.session().clone(),
            current.should_block(),
            current.is_prompt_open(),
            current.notice(),
        )
    };

    // Centinela en el historial cada vez que empieza a bloquear: así el
    // primer "atrás" se puede interceptar en cualquier paso crítico
    use_effect_with(should_block, |blocking| {
        if *blocking {
            if let Err(e) = push_history_sentinel() {
                log::error!("❌ [GUARD] No se pudo empujar el centinela: {}", e);
            }
        }
        || ()
    });

    let update_state = {
        let guard = guard.clone();
        Callback::from(move |patch: SessionPatch| {
            guard.borrow_mut().update_state(patch);
        })
    };

    let attempt_navigation = {
        let guard = guard.clone();
        Callback::from(move |navigate: Callback<()>| {
            // Diferida: la navegación puede volver a tocar el guard
            let outcome = guard.borrow_mut().attempt_navigation(move || {
                wasm_bindgen_futures::spawn_local(async move {
                    navigate.emit(());
                });
            });
            if outcome == NavigationOutcome::AlreadyPending {
                log::debug!("[GUARD] Ya hay una confirmación en curso");
            }
        })
    };

    let confirm = {
        let guard = guard.clone();
        Callback::from(move |_| guard.borrow_mut().confirm())
    };

    let cancel = {
        let guard = guard.clone();
        Callback::from(move |_| guard.borrow_mut().cancel())
    };

    let cleanup = {
        let guard = guard.clone();
        Callback::from(move |_| guard.borrow_mut().cleanup())
    };

    let expire = {
        let guard = guard.clone();
        Callback::from(move |_| guard.borrow_mut().expire())
    };

    let dismiss_notice = {
        let guard = guard.clone();
        let trigger = trigger.clone();
        Callback::from(move |_| {
            let taken = guard.borrow_mut().take_notice();
            if taken.is_some() {
                trigger.force_update();
            }
        })
    };

    UseReservationGuardHandle {
        session,
        should_block,
        prompt_open,
        notice,
        update_state,
        attempt_navigation,
        confirm,
        cancel,
        cleanup,
        expire,
        dismiss_notice,
    }
}
