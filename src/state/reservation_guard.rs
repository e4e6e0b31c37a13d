// ============================================================================
// RESERVATION GUARD - Protege la reserva mientras el usuario paga
// ============================================================================
// Dueño único de ReservationSession. Decide si una navegación se bloquea,
// guarda la continuación pendiente mientras el usuario responde el prompt
// y libera la reserva al confirmar o al desmontarse.
// Sin dependencias del navegador: el cableado vive en hooks/ y services/.
// ============================================================================

use std::rc::Rc;

use crate::models::reservation::{
    GuardNotice, ReservationSession, ReservationStep, SessionPatch, NUMBER_RANGE,
};
use crate::services::reservation_service::ReservationReleaser;

/// Navegación suspendida hasta que el usuario decida
pub type NavigationContinuation = Box<dyn FnOnce()>;

type Subscriber = Rc<dyn Fn()>;

/// Resultado inmediato de `attempt_navigation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No había nada que proteger: la continuación ya se ejecutó
    Allowed,
    /// Prompt abierto, la continuación espera confirm()/cancel()
    Pending,
    /// Ya había un prompt abierto; esta continuación se descarta
    AlreadyPending,
}

pub struct ReservationGuard {
    session: ReservationSession,
    releaser: Rc<dyn ReservationReleaser>,
    pending: Option<NavigationContinuation>,
    prompt_open: bool,
    notice: Option<GuardNotice>,
    torn_down: bool,
    subscribers: Vec<Subscriber>,
}

impl ReservationGuard {
    pub fn new(releaser: Rc<dyn ReservationReleaser>) -> Self {
        Self {
            session: ReservationSession::new(),
            releaser,
            pending: None,
            prompt_open: false,
            notice: None,
            torn_down: false,
            subscribers: Vec::new(),
        }
    }

    pub fn session(&self) -> &ReservationSession {
        &self.session
    }

    pub fn is_prompt_open(&self) -> bool {
        self.prompt_open
    }

    pub fn has_pending_navigation(&self) -> bool {
        self.pending.is_some()
    }

    pub fn notice(&self) -> Option<GuardNotice> {
        self.notice
    }

    /// Consume el último aviso (para mostrarlo una sola vez)
    pub fn take_notice(&mut self) -> Option<GuardNotice> {
        self.notice.take()
    }

    /// Registra un callback que se llama tras cada cambio
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.push(Rc::new(callback));
    }

    fn notify(&self) {
        for subscriber in self.subscribers.iter() {
            subscriber();
        }
    }

    /// Mezcla campos parciales en la sesión y normaliza los invariantes
    pub fn update_state(&mut self, patch: SessionPatch) {
        let session = &mut self.session;

        if let Some(step) = patch.current_step {
            if step >= session.current_step {
                session.current_step = step;
            } else {
                // Solo cleanup()/expire() retroceden la etapa
                log::warn!(
                    "⚠️ [GUARD] Retroceso de etapa ignorado: {:?} -> {:?}",
                    session.current_step,
                    step
                );
            }
        }

        if let Some(reservation_id) = patch.reservation_id {
            session.reservation_id = reservation_id.filter(|id| !id.is_empty());
        }

        if let Some(numbers) = patch.selected_numbers {
            let before = numbers.len();
            session.selected_numbers = numbers
                .into_iter()
                .filter(|n| NUMBER_RANGE.contains(n))
                .collect();
            if session.selected_numbers.len() != before {
                log::warn!("⚠️ [GUARD] Números fuera de rango descartados");
            }
        }

        if let Some(active) = patch.has_active_reservation {
            session.has_active_reservation = active;
        }

        if session.has_active_reservation && !session.reservation_is_consistent() {
            log::warn!("⚠️ [GUARD] Reserva marcada activa sin id o sin números, se desactiva");
            session.has_active_reservation = false;
        }

        if session.current_step == ReservationStep::Completed {
            // La reserva se consumió al completar el pago
            session.has_active_reservation = false;
        }

        self.notify();
    }

    pub fn is_critical_stage(&self) -> bool {
        self.session.current_step.is_critical()
    }

    pub fn should_block(&self) -> bool {
        self.session.has_active_reservation && self.is_critical_stage()
    }

    /// Intenta salir del flujo. Si hay que bloquear, abre el prompt y guarda
    /// `continuation` hasta que el usuario confirme. Nunca se resuelve como
    /// "denegado": al cancelar, la continuación simplemente se descarta.
    pub fn attempt_navigation<F>(&mut self, continuation: F) -> NavigationOutcome
    where
        F: FnOnce() + 'static,
    {
        if !self.should_block() {
            continuation();
            return NavigationOutcome::Allowed;
        }

        if self.pending.is_some() {
            log::warn!("⚠️ [GUARD] Navegación ya pendiente, se ignora el nuevo intento");
            return NavigationOutcome::AlreadyPending;
        }

        log::info!(
            "🛑 [GUARD] Navegación bloqueada en {:?}, pidiendo confirmación",
            self.session.current_step
        );
        self.pending = Some(Box::new(continuation));
        self.prompt_open = true;
        self.notify();
        NavigationOutcome::Pending
    }

    /// El usuario acepta perder la reserva
    pub fn confirm(&mut self) {
        if !self.prompt_open && self.pending.is_none() {
            log::debug!("[GUARD] confirm() sin prompt abierto, nada que hacer");
            return;
        }

        self.prompt_open = false;
        if self.release_and_reset() {
            self.notice = Some(GuardNotice::ReservationReleased);
        }
        let pending = self.pending.take();
        self.notify();

        if let Some(continuation) = pending {
            log::info!("➡️ [GUARD] Navegación confirmada, continuando");
            continuation();
        }
    }

    /// El usuario se queda en la página; la sesión no cambia
    pub fn cancel(&mut self) {
        if !self.prompt_open && self.pending.is_none() {
            return;
        }

        self.prompt_open = false;
        self.pending = None;
        self.notice = Some(GuardNotice::ReservationKept);
        log::info!("✋ [GUARD] Navegación cancelada, la reserva sigue activa");
        self.notify();
    }

    /// Idempotente: libera la reserva activa (si la hay) y resetea la sesión
    pub fn cleanup(&mut self) {
        self.release_and_reset();
        self.notify();
    }

    /// La cuenta regresiva de la reserva llegó a cero. El backend ya soltó
    /// los números, así que no hay llamada de liberación.
    pub fn expire(&mut self) {
        let had_reservation = self.session.has_active_reservation;
        self.session = ReservationSession::new();
        self.pending = None;
        self.prompt_open = false;
        if had_reservation {
            log::info!("⌛ [GUARD] Reserva expirada");
            self.notice = Some(GuardNotice::ReservationExpired);
        }
        self.notify();
    }

    /// Desmontaje del componente dueño. Corre cleanup() una sola vez si la
    /// reserva sigue activa.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.pending = None;
        self.prompt_open = false;

        if self.session.has_active_reservation {
            log::info!("🔌 [GUARD] Desmontado con reserva activa, liberando");
            self.release_and_reset();
        }
        self.subscribers.clear();
    }

    /// Devuelve true si se disparó la liberación
    fn release_and_reset(&mut self) -> bool {
        let released = match (
            self.session.has_active_reservation,
            self.session.reservation_id.as_deref(),
        ) {
            (true, Some(reservation_id)) => {
                self.releaser.release(reservation_id);
                true
            }
            _ => false,
        };
        self.session = ReservationSession::new();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct RecordingReleaser {
        released: RefCell<Vec<String>>,
    }

    impl ReservationReleaser for RecordingReleaser {
        fn release(&self, reservation_id: &str) {
            self.released.borrow_mut().push(reservation_id.to_string());
        }
    }

    fn numbers(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    fn guard() -> (ReservationGuard, Rc<RecordingReleaser>) {
        let releaser = Rc::new(RecordingReleaser::default());
        (ReservationGuard::new(releaser.clone()), releaser)
    }

    fn guard_on(step: ReservationStep) -> (ReservationGuard, Rc<RecordingReleaser>) {
        let (mut guard, releaser) = guard();
        guard.update_state(SessionPatch::reserved("res-1", numbers(&[7, 42])));
        guard.update_state(SessionPatch::step(step));
        (guard, releaser)
    }

    fn flag() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let calls = Rc::new(Cell::new(0));
        let inner = calls.clone();
        (calls, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn blocks_only_on_critical_steps() {
        let (guard, _) = guard_on(ReservationStep::ChoosingPaymentMethod);
        assert!(guard.should_block());

        let (guard, _) = guard_on(ReservationStep::SelectingNumbers);
        assert!(guard.session().has_active_reservation);
        assert!(!guard.should_block());
    }

    #[test]
    fn active_flag_requires_id_and_numbers() {
        let patches = vec![
            SessionPatch {
                has_active_reservation: Some(true),
                ..SessionPatch::default()
            },
            SessionPatch {
                reservation_id: Some(Some("res-9".into())),
                ..SessionPatch::default()
            },
            SessionPatch::numbers(numbers(&[1, 2])),
            SessionPatch {
                has_active_reservation: Some(true),
                ..SessionPatch::default()
            },
            SessionPatch::numbers(BTreeSet::new()),
            SessionPatch::reserved("", numbers(&[5])),
            SessionPatch::reserved("res-10", numbers(&[0, 101])),
            SessionPatch::reserved("res-11", numbers(&[100])),
            SessionPatch {
                reservation_id: Some(None),
                ..SessionPatch::default()
            },
            SessionPatch::step(ReservationStep::ChoosingPaymentMethod),
            SessionPatch::reserved("res-12", numbers(&[3])),
            SessionPatch::step(ReservationStep::Completed),
        ];

        // Todas las secuencias por prefijo y por sufijo
        for start in 0..patches.len() {
            let (mut guard, _) = guard();
            for patch in patches[start..].iter().cloned() {
                guard.update_state(patch);
                let session = guard.session();
                if session.has_active_reservation {
                    assert!(session.reservation_is_consistent());
                }
            }
        }
    }

    #[test]
    fn out_of_range_numbers_are_dropped() {
        let (mut guard, _) = guard();
        guard.update_state(SessionPatch::reserved("res-1", numbers(&[0, 101])));
        assert!(guard.session().selected_numbers.is_empty());
        assert!(!guard.session().has_active_reservation);
    }

    #[test]
    fn completed_never_carries_an_active_reservation() {
        let (mut guard, releaser) = guard_on(ReservationStep::SubmittingPaymentForm);
        guard.update_state(SessionPatch::step(ReservationStep::Completed));
        assert_eq!(guard.session().current_step, ReservationStep::Completed);
        assert!(!guard.session().has_active_reservation);
        assert!(!guard.should_block());

        guard.teardown();
        assert!(releaser.released.borrow().is_empty());
    }

    #[test]
    fn backward_step_is_ignored() {
        let (mut guard, _) = guard_on(ReservationStep::EnteringPaymentDetails);
        guard.update_state(SessionPatch::step(ReservationStep::ChoosingPaymentMethod));
        assert_eq!(
            guard.session().current_step,
            ReservationStep::EnteringPaymentDetails
        );
    }

    #[test]
    fn navigation_passes_through_when_not_blocking() {
        let (mut guard, _) = guard_on(ReservationStep::SelectingNumbers);
        let (calls, continuation) = flag();
        assert_eq!(guard.attempt_navigation(continuation), NavigationOutcome::Allowed);
        assert_eq!(calls.get(), 1);
        assert!(!guard.is_prompt_open());
    }

    #[test]
    fn cancel_keeps_reservation_and_drops_navigation() {
        let (mut guard, releaser) = guard_on(ReservationStep::EnteringPaymentDetails);
        let (calls, continuation) = flag();

        assert_eq!(guard.attempt_navigation(continuation), NavigationOutcome::Pending);
        assert!(guard.is_prompt_open());
        assert_eq!(calls.get(), 0);

        guard.cancel();
        assert!(!guard.is_prompt_open());
        assert!(!guard.has_pending_navigation());
        assert_eq!(calls.get(), 0);
        assert!(guard.session().has_active_reservation);
        assert_eq!(
            guard.session().current_step,
            ReservationStep::EnteringPaymentDetails
        );
        assert_eq!(guard.take_notice(), Some(GuardNotice::ReservationKept));
        assert!(releaser.released.borrow().is_empty());
    }

    #[test]
    fn confirm_releases_once_resets_and_resumes() {
        let (mut guard, releaser) = guard_on(ReservationStep::EnteringPaymentDetails);
        let (calls, continuation) = flag();
        guard.attempt_navigation(continuation);

        guard.confirm();
        assert!(!guard.is_prompt_open());
        assert_eq!(*releaser.released.borrow(), vec!["res-1".to_string()]);
        assert_eq!(guard.session(), &ReservationSession::new());
        assert_eq!(calls.get(), 1);
        assert_eq!(guard.notice(), Some(GuardNotice::ReservationReleased));

        // Un segundo confirm no vuelve a liberar ni a navegar
        guard.confirm();
        assert_eq!(releaser.released.borrow().len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn second_attempt_while_pending_is_rejected() {
        let (mut guard, _) = guard_on(ReservationStep::ChoosingPaymentMethod);
        let (first, first_cont) = flag();
        let (second, second_cont) = flag();

        assert_eq!(guard.attempt_navigation(first_cont), NavigationOutcome::Pending);
        assert_eq!(
            guard.attempt_navigation(second_cont),
            NavigationOutcome::AlreadyPending
        );

        guard.confirm();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn cleanup_is_idempotent() {
        let (mut guard, releaser) = guard_on(ReservationStep::ChoosingPaymentMethod);
        guard.cleanup();
        guard.cleanup();
        assert_eq!(releaser.released.borrow().len(), 1);
        assert_eq!(guard.session(), &ReservationSession::new());
    }

    #[test]
    fn teardown_with_active_reservation_releases_exactly_once() {
        let (mut guard, releaser) = guard_on(ReservationStep::EnteringPaymentDetails);
        guard.teardown();
        guard.teardown();
        assert_eq!(*releaser.released.borrow(), vec!["res-1".to_string()]);
        assert!(!guard.session().has_active_reservation);
    }

    #[test]
    fn expire_resets_without_release() {
        let (mut guard, releaser) = guard_on(ReservationStep::EnteringPaymentDetails);
        let (calls, continuation) = flag();
        guard.attempt_navigation(continuation);

        guard.expire();
        assert!(!guard.is_prompt_open());
        assert!(!guard.has_pending_navigation());
        assert_eq!(calls.get(), 0);
        assert!(releaser.released.borrow().is_empty());
        assert_eq!(guard.take_notice(), Some(GuardNotice::ReservationExpired));
        assert_eq!(guard.session(), &ReservationSession::new());
    }

    #[test]
    fn subscribers_hear_every_change() {
        let (mut guard, _) = guard();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        guard.subscribe(move || counter.set(counter.get() + 1));

        guard.update_state(SessionPatch::reserved("res-1", numbers(&[9])));
        guard.update_state(SessionPatch::step(ReservationStep::ChoosingPaymentMethod));
        guard.attempt_navigation(|| {});
        guard.cancel();
        assert_eq!(hits.get(), 4);
    }
}
