use yew::{Callback, Html, MouseEvent, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct PhotoModalProps {
    pub src: String,
    pub on_close: Callback<()>,
}

/// Full-size photo over a dimmed page; a click
/// outside the image closes it.
#[function_component(PhotoModal)]
pub fn photo_modal(props: &PhotoModalProps) -> Html {
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let keep_open = Callback::from(|event: MouseEvent| event.stop_propagation());

    html! {
        <div class="modal" onclick={close.clone()}>
            <div class="modal-body" onclick={keep_open}>
                <button class="btn close" onclick={close}>{ "Close" }</button>
                <img src={props.src.clone()} alt="photo" />
            </div>
        </div>
    }
}
