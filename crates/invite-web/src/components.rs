mod countdown_panel;
mod etransfer_card;
mod month_calendar;
mod photo_modal;

pub use countdown_panel::CountdownPanel;
pub use etransfer_card::ETransferCard;
pub use month_calendar::MonthCalendar;
pub use photo_modal::PhotoModal;

use yew::{Children, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct SectionProps {
    pub subtitle: String,
    pub title: String,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(Section)]
pub fn section(props: &SectionProps) -> Html {
    html! {
        <section class="section">
            <div class="subtitle">{ props.subtitle.clone() }</div>
            <h2>{ props.title.clone() }</h2>
            { props.children.clone() }
        </section>
    }
}

#[function_component(Divider)]
pub fn divider() -> Html {
    html! { <div class="divider">{ "♥" }</div> }
}
