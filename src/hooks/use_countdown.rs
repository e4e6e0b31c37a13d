use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use yew::prelude::*;

use crate::config::CONFIG;
use crate::utils::countdown::{Countdown, CountdownTick, HourDisplay, SystemClock};

pub struct UseCountdownHandle {
    /// `None` mientras no haya objetivo
    pub display: Option<String>,
    pub expired: bool,
}

/// Cuenta regresiva hacia `target`. `on_expire` se llama una vez por objetivo.
/// El intervalo se cancela al desmontar o al cambiar el objetivo.
#[hook]
pub fn use_countdown(
    target: Option<String>,
    hours: HourDisplay,
    on_expire: Callback<()>,
) -> UseCountdownHandle {
    let tick = use_state(|| None::<CountdownTick>);
    // Se conserva entre objetivos; `restart` lo reutiliza
    let countdown: Rc<RefCell<Option<Countdown>>> = use_mut_ref(|| None);

    {
        let tick = tick.clone();
        let countdown = countdown.clone();
        use_effect_with((target, hours), move |(target, hours)| {
            let interval = match target {
                Some(target) => {
                    let first = {
                        let mut slot = countdown.borrow_mut();
                        match slot.as_mut() {
                            Some(existing) => existing.restart(target, *hours),
                            None => *slot = Some(Countdown::new(SystemClock, target, *hours)),
                        }
                        slot.as_mut().map(|current| current.tick())
                    };

                    let publish = move |next: CountdownTick| {
                        if next.just_expired {
                            on_expire.emit(());
                        }
                        tick.set(Some(next));
                    };

                    if let Some(first) = first {
                        publish(first);
                    }
                    let countdown = countdown.clone();
                    Some(Interval::new(CONFIG.countdown_tick_ms, move || {
                        let next = match countdown.borrow_mut().as_mut() {
                            Some(current) => current.tick(),
                            None => return,
                        };
                        publish(next);
                    }))
                }
                None => {
                    tick.set(None);
                    None
                }
            };

            move || drop(interval)
        });
    }

    match &*tick {
        Some(current) => UseCountdownHandle {
            display: Some(current.display.clone()),
            expired: current.expired,
        },
        None => UseCountdownHandle {
            display: None,
            expired: false,
        },
    }
}
