use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NavigationPromptProps {
    pub numbers: Vec<u32>,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

/// Confirmación antes de abandonar una reserva activa
#[function_component(NavigationPrompt)]
pub fn navigation_prompt(props: &NavigationPromptProps) -> Html {
    let cancel_overlay = props.on_cancel.clone();
    let cancel = props.on_cancel.clone();
    let confirm = props.on_confirm.clone();

    let numbers = props
        .numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(", ");

    html! {
        <div class="modal active">
            <div class="modal-overlay" onclick={Callback::from(move |_| cancel_overlay.emit(()))}></div>
            <div class="modal-content modal-small" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="modal-header">
                    <h2>{"¿Salir sin terminar?"}</h2>
                </div>
                <div class="modal-body">
                    <p class="question-text">
                        {format!("Si sales ahora se liberan tus números reservados: {}", numbers)}
                    </p>
                    <div class="choice-buttons">
                        <button class="btn-choice btn-no" onclick={Callback::from(move |_| cancel.emit(()))}>
                            {"Seguir con mi compra"}
                        </button>
                        <button class="btn-choice btn-yes" onclick={Callback::from(move |_| confirm.emit(()))}>
                            {"Salir y liberar"}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
