// ============================================================================
// APP - Flujo de compra: números -> método de pago -> datos -> envío
// ============================================================================
// La vista solo orquesta: el estado de la reserva vive en el guard, las
// llamadas al backend en services/.
// ============================================================================

use std::collections::BTreeSet;

use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::config::CONFIG;
use crate::hooks::{use_countdown, use_reservation_guard};
use crate::models::draw::Draw;
use crate::models::payment::{Currency, ExchangeRate, PaymentMethod, PaymentSubmission};
use crate::models::reservation::{ReservationStep, SessionPatch, NUMBER_RANGE};
use crate::services::api_client::ApiClient;
use crate::services::currency_service::{convert, format_amount, CurrencyService};
use crate::utils::countdown::HourDisplay;
use crate::views::{CountdownBadge, NavigationPrompt, NoticeToast};

/// Monto a pagar con el método elegido
fn amount_for(
    method: PaymentMethod,
    base_total: f64,
    base: Currency,
    rate: Option<&ExchangeRate>,
) -> Option<(f64, Currency)> {
    let target = method.currency();
    if target == base {
        return Some((base_total, base));
    }
    rate.filter(|r| r.base == base && r.quote == target)
        .map(|r| (convert(base_total, r), target))
}

#[function_component(App)]
pub fn app() -> Html {
    let guard = use_reservation_guard();

    let draw = use_state(|| None::<Draw>);
    let rate = use_state(|| None::<ExchangeRate>);
    let picked = use_state(BTreeSet::<u32>::new);
    let expires_at = use_state(|| None::<String>);
    let method = use_state(|| None::<PaymentMethod>);
    let reference = use_state(String::new);
    let busy = use_state(|| false);
    let error = use_state(|| None::<String>);

    // Sorteo vigente + tasa al montar
    {
        let draw = draw.clone();
        let rate = rate.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::new().fetch_active_draw().await {
                    Ok(Some(found)) => {
                        log::info!("✅ Sorteo vigente: {} ({:?})", found.title, found.status);
                        draw.set(Some(found));
                    }
                    Ok(None) => log::info!("ℹ️ No hay sorteos vigentes"),
                    Err(e) => {
                        log::error!("❌ Error cargando sorteo: {}", e);
                        error.set(Some("No se pudo cargar el sorteo".to_string()));
                    }
                }

                let service = CurrencyService::new();
                match service.fetch_rate(CONFIG.base_currency, CONFIG.local_currency).await {
                    Ok(found) => rate.set(Some(found)),
                    // Sin tasa solo se ofrecen métodos en moneda base
                    Err(e) => log::warn!("⚠️ Tasa no disponible: {}", e),
                }
            });
            || ()
        });
    }

    let session = guard.session.clone();
    let step = session.current_step;

    // Reserva: al expirar se descarta todo lo local
    let reservation_target = if session.has_active_reservation {
        (*expires_at).clone()
    } else {
        None
    };
    let on_reservation_expired = {
        let expire = guard.expire.clone();
        let picked = picked.clone();
        let expires_at = expires_at.clone();
        let method = method.clone();
        Callback::from(move |_| {
            expire.emit(());
            picked.set(BTreeSet::new());
            expires_at.set(None);
            method.set(None);
        })
    };
    let reservation_countdown =
        use_countdown(reservation_target, HourDisplay::WhenNonZero, on_reservation_expired);

    let draw_countdown = use_countdown(
        (*draw).as_ref().map(|d| d.draw_date.clone()),
        HourDisplay::Always,
        Callback::noop(),
    );

    let ticket_price = (*draw)
        .as_ref()
        .and_then(|d| d.ticket_price)
        .unwrap_or(CONFIG.ticket_price);
    let count = if session.selected_numbers.is_empty() {
        picked.len()
    } else {
        session.selected_numbers.len()
    };
    let base_total = ticket_price * count as f64;

    let reset_local = {
        let picked = picked.clone();
        let expires_at = expires_at.clone();
        let method = method.clone();
        let reference = reference.clone();
        let error = error.clone();
        Callback::from(move |_| {
            picked.set(BTreeSet::new());
            expires_at.set(None);
            method.set(None);
            reference.set(String::new());
            error.set(None);
        })
    };

    let on_toggle_number = {
        let picked = picked.clone();
        Callback::from(move |number: u32| {
            let mut next = (*picked).clone();
            if !next.remove(&number) {
                next.insert(number);
            }
            picked.set(next);
        })
    };

    let on_reserve = {
        let draw = draw.clone();
        let picked = picked.clone();
        let expires_at = expires_at.clone();
        let busy = busy.clone();
        let error = error.clone();
        let update_state = guard.update_state.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(draw_id) = (*draw).as_ref().map(|d| d.id.clone()) else {
                return;
            };
            let numbers = (*picked).clone();
            if numbers.is_empty() || *busy {
                return;
            }

            let expires_at = expires_at.clone();
            let busy = busy.clone();
            let error = error.clone();
            let update_state = update_state.clone();
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::new().reserve_numbers(&draw_id, &numbers).await {
                    Ok(reservation) => {
                        expires_at.set(Some(reservation.expires_at));
                        update_state.emit(SessionPatch::reserved(reservation.reservation_id, numbers));
                        update_state.emit(SessionPatch::step(ReservationStep::ChoosingPaymentMethod));
                        error.set(None);
                    }
                    Err(e) => {
                        log::error!("❌ Error reservando: {}", e);
                        error.set(Some("Alguno de tus números ya no está disponible".to_string()));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_choose_method = {
        let method = method.clone();
        let update_state = guard.update_state.clone();
        Callback::from(move |chosen: PaymentMethod| {
            method.set(Some(chosen));
            update_state.emit(SessionPatch::step(ReservationStep::EnteringPaymentDetails));
        })
    };

    let on_reference_input = {
        let reference = reference.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            reference.set(input.value());
        })
    };

    let on_submit = {
        let method = method.clone();
        let reference = reference.clone();
        let rate = rate.clone();
        let busy = busy.clone();
        let error = error.clone();
        let expires_at = expires_at.clone();
        let update_state = guard.update_state.clone();
        let reservation_id = session.reservation_id.clone();
        Callback::from(move |_: MouseEvent| {
            let (Some(chosen), Some(reservation_id)) = (*method, reservation_id.clone()) else {
                return;
            };
            if *busy {
                return;
            }
            let proof = reference.trim().to_string();
            if chosen.requires_proof() && proof.is_empty() {
                error.set(Some("Ingresa la referencia del pago".to_string()));
                return;
            }
            let Some((amount, currency)) =
                amount_for(chosen, base_total, CONFIG.base_currency, (*rate).as_ref())
            else {
                error.set(Some("No hay tasa de cambio para este método".to_string()));
                return;
            };

            let submission = PaymentSubmission {
                p_reservation_id: reservation_id,
                p_method: chosen,
                p_reference: (!proof.is_empty()).then_some(proof),
                p_amount: amount,
                p_currency: currency,
            };

            let busy = busy.clone();
            let error = error.clone();
            let expires_at = expires_at.clone();
            let update_state = update_state.clone();
            busy.set(true);
            update_state.emit(SessionPatch::step(ReservationStep::SubmittingPaymentForm));
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::new().submit_payment(&submission).await {
                    Ok(()) => {
                        update_state.emit(SessionPatch::step(ReservationStep::Completed));
                        expires_at.set(None);
                        error.set(None);
                    }
                    Err(e) => {
                        log::error!("❌ Error enviando pago: {}", e);
                        error.set(Some("No se pudo enviar el comprobante, intenta de nuevo".to_string()));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_leave = {
        let attempt_navigation = guard.attempt_navigation.clone();
        let reset_local = reset_local.clone();
        Callback::from(move |_: MouseEvent| attempt_navigation.emit(reset_local.clone()))
    };

    let on_start_over = {
        let cleanup = guard.cleanup.clone();
        let reset_local = reset_local.clone();
        Callback::from(move |_: MouseEvent| {
            cleanup.emit(());
            reset_local.emit(());
        })
    };

    let base = CONFIG.base_currency;
    let body = match step {
        ReservationStep::SelectingNumbers => {
            let accepting = (*draw).as_ref().map_or(false, |d| d.status.accepts_entries());
            html! {
                <section class="step step-numbers">
                    <div class="number-grid">
                        { for NUMBER_RANGE.map(|number| {
                            let selected = picked.contains(&number);
                            let toggle = on_toggle_number.clone();
                            html! {
                                <button
                                    class={classes!("number", selected.then_some("selected"))}
                                    disabled={!accepting}
                                    onclick={Callback::from(move |_| toggle.emit(number))}
                                >
                                    {format!("{:02}", number)}
                                </button>
                            }
                        }) }
                    </div>
                    <p class="total">{format!("Total: {}", format_amount(base_total, base))}</p>
                    <button
                        class="btn-primary"
                        disabled={!accepting || picked.is_empty() || *busy}
                        onclick={on_reserve}
                    >
                        {if *busy { "Reservando..." } else { "Reservar" }}
                    </button>
                </section>
            }
        }
        ReservationStep::ChoosingPaymentMethod => html! {
            <section class="step step-methods">
                { for PaymentMethod::ALL.iter().copied().map(|candidate| {
                    let choose = on_choose_method.clone();
                    let price = amount_for(candidate, base_total, base, (*rate).as_ref())
                        .map(|(amount, currency)| format_amount(amount, currency));
                    html! {
                        <button
                            class="btn-method"
                            disabled={price.is_none()}
                            onclick={Callback::from(move |_| choose.emit(candidate))}
                        >
                            <span class="method-label">{candidate.label()}</span>
                            <span class="method-price">{price.unwrap_or_else(|| "No disponible".to_string())}</span>
                        </button>
                    }
                }) }
            </section>
        },
        ReservationStep::EnteringPaymentDetails | ReservationStep::SubmittingPaymentForm => {
            let chosen = *method;
            let needs_proof = chosen.map_or(true, |m| m.requires_proof());
            html! {
                <section class="step step-details">
                    <p>{chosen.map(|m| m.label()).unwrap_or_default()}</p>
                    if needs_proof {
                        <input
                            class="input-reference"
                            placeholder="Número de referencia"
                            value={(*reference).clone()}
                            oninput={on_reference_input}
                        />
                    }
                    <button class="btn-primary" disabled={*busy} onclick={on_submit}>
                        {if *busy { "Enviando..." } else { "Enviar comprobante" }}
                    </button>
                </section>
            }
        }
        ReservationStep::Completed => html! {
            <section class="step step-done">
                <p>{"¡Pago enviado! Te avisaremos cuando sea verificado."}</p>
                <p class="numbers">
                    { session.selected_numbers.iter().map(|n| format!("{:02}", n)).collect::<Vec<_>>().join(" · ") }
                </p>
                <button class="btn-primary" onclick={on_start_over}>{"Comprar más números"}</button>
            </section>
        },
    };

    let prompt_numbers: Vec<u32> = session.selected_numbers.iter().copied().collect();

    html! {
        <main class="app">
            <header class="header">
                <h1>{(*draw).as_ref().map(|d| d.title.clone()).unwrap_or_else(|| "Rifa".to_string())}</h1>
                <CountdownBadge
                    label="Sorteo en"
                    display={draw_countdown.display}
                    expired={draw_countdown.expired}
                    expired_text={Some(AttrValue::from("¡Sorteo en curso!"))}
                />
            </header>

            <nav class="steps">
                <span class="step-label">{step.label()}</span>
                if step.is_critical() {
                    <button class="btn-back" onclick={on_leave}>{"← Salir"}</button>
                }
            </nav>

            if session.has_active_reservation {
                <CountdownBadge
                    label="Tu reserva vence en"
                    display={reservation_countdown.display}
                    expired={reservation_countdown.expired}
                />
            }

            if let Some(message) = (*error).clone() {
                <p class="error">{message}</p>
            }

            {body}

            if guard.prompt_open {
                <NavigationPrompt
                    numbers={prompt_numbers}
                    on_confirm={guard.confirm.clone()}
                    on_cancel={guard.cancel.clone()}
                />
            }

            <NoticeToast notice={guard.notice} on_dismiss={guard.dismiss_notice.clone()} />
        </main>
    }
}
