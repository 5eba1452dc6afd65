use chrono::{DateTime, FixedOffset, Utc};
use gloo::timers::callback::Interval;
use invite_core::countdown::{countdown_parts, pad2};
use yew::{Html, Properties, function_component, html, use_effect_with, use_state};

const TICK_MILLIS: u32 = 1_000;

#[derive(Properties, PartialEq)]
pub struct CountdownPanelProps {
    pub target: DateTime<FixedOffset>,
    pub couple: String,
}

#[function_component(CountdownPanel)]
pub fn countdown_panel(props: &CountdownPanelProps) -> Html {
    let now = use_state(Utc::now);

    {
        let now = now.clone();
        use_effect_with((), move |_| {
            let interval = Interval::new(TICK_MILLIS, move || now.set(Utc::now()));
            move || drop(interval)
        });
    }

    let parts = countdown_parts(&props.target, &*now);
    let stat = |label: &'static str, value: String| {
        html! {
            <div class="stat">
                <div class="label">{ label }</div>
                <div class="value">{ value }</div>
            </div>
        }
    };

    let note = if parts.is_finished() {
        "오늘 결혼합니다.".to_string()
    } else {
        format!("{}의 결혼식이 {}일 남았습니다.", props.couple, parts.days)
    };

    html! {
        <div class="countdown">
            <div class="stats">
                { stat("DAYS", parts.days.to_string()) }
                { stat("HOUR", pad2(parts.hours)) }
                { stat("MIN", pad2(parts.minutes)) }
                { stat("SEC", pad2(parts.seconds)) }
            </div>
            <p class="note">{ note }</p>
        </div>
    }
}
