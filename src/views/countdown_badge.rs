use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CountdownBadgeProps {
    pub label: AttrValue,
    pub display: Option<String>,
    #[prop_or_default]
    pub expired: bool,
    #[prop_or_default]
    pub expired_text: Option<AttrValue>,
}

#[function_component(CountdownBadge)]
pub fn countdown_badge(props: &CountdownBadgeProps) -> Html {
    let Some(display) = props.display.clone() else {
        return html! {};
    };

    let class = if props.expired { "countdown expired" } else { "countdown" };
    let text = match (&props.expired_text, props.expired) {
        (Some(expired_text), true) => expired_text.to_string(),
        _ => display,
    };

    html! {
        <div class={class}>
            <span class="countdown-label">{props.label.clone()}</span>
            <span class="countdown-value">{text}</span>
        </div>
    }
}
