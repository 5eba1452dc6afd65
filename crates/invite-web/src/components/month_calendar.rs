use chrono::Weekday;
use invite_core::month_grid::MonthGrid;
use yew::{Html, Properties, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct MonthCalendarProps {
    pub year: i32,
    pub month: u32,
    pub week_start: Weekday,
    #[prop_or_default]
    pub highlight: Option<u32>,
}

#[function_component(MonthCalendar)]
pub fn month_calendar(props: &MonthCalendarProps) -> Html {
    let grid = match MonthGrid::build_with_week_start(props.year, props.month, props.week_start) {
        Ok(grid) => grid,
        Err(err) => {
            tracing::warn!(error = %err, year = props.year, month = props.month, "cannot build month");
            return html! { <p class="muted">{ "Calendar unavailable." }</p> };
        }
    };

    html! {
        <div class="calendar">
            { for grid.labels().into_iter().map(|label| html! { <div class="label">{ label }</div> }) }
            {
                for grid.cells().map(|cell| match cell {
                    Some(day) => {
                        let marked = props.highlight == Some(day);
                        html! {
                            <div class={classes!("day", marked.then_some("highlight"))}>
                                { day.to_string() }
                            </div>
                        }
                    }
                    None => html! { <div class="blank"></div> },
                })
            }
        </div>
    }
}
