use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config::CONFIG;
use crate::models::reservation::GuardNotice;

#[derive(Properties, PartialEq)]
pub struct NoticeToastProps {
    pub notice: Option<GuardNotice>,
    pub on_dismiss: Callback<()>,
}

/// Aviso temporal; se cierra solo tras `notice_duration_ms`
#[function_component(NoticeToast)]
pub fn notice_toast(props: &NoticeToastProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.notice, move |notice| {
            let timeout = notice.as_ref().map(|_| {
                Timeout::new(CONFIG.notice_duration_ms, move || on_dismiss.emit(()))
            });
            move || drop(timeout)
        });
    }

    let Some(notice) = props.notice else {
        return html! {};
    };

    let class = match notice {
        GuardNotice::ReservationKept => "toast toast-info",
        GuardNotice::ReservationReleased => "toast toast-warning",
        GuardNotice::ReservationExpired => "toast toast-error",
    };
    let dismiss = props.on_dismiss.clone();

    html! {
        <div class={class} role="status" onclick={Callback::from(move |_| dismiss.emit(()))}>
            {notice.message()}
        </div>
    }
}
