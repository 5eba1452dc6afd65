use invite_core::clipboard::CopyFeedback;
use wasm_bindgen_futures::spawn_local;
use yew::{Callback, Html, MouseEvent, Properties, function_component, html};

use crate::browser::copy_email;

#[derive(Properties, PartialEq)]
pub struct ETransferCardProps {
    pub title: String,
    pub email: String,
    pub on_feedback: Callback<CopyFeedback>,
}

#[function_component(ETransferCard)]
pub fn etransfer_card(props: &ETransferCardProps) -> Html {
    let onclick = {
        let email = props.email.clone();
        let on_feedback = props.on_feedback.clone();
        Callback::from(move |_: MouseEvent| {
            let email = email.clone();
            let on_feedback = on_feedback.clone();
            spawn_local(async move {
                on_feedback.emit(copy_email(&email).await);
            });
        })
    };

    html! {
        <div class="card etransfer">
            <div class="title">{ props.title.clone() }</div>
            <div class="email">{ props.email.clone() }</div>
            <button class="btn" {onclick}>{ "Copy email" }</button>
        </div>
    }
}
