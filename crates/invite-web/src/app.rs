use chrono::Weekday;
use invite_core::clipboard::{
  CopyFeedback,
  CopySubject
};
use invite_core::config::Config;
use invite_core::invite::Invitation;
use invite_core::links::{
  google_calendar_link_for,
  google_maps_search_link
};
use invite_core::share::ShareOutcome;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_memo,
  use_state
};

use crate::browser::{
  download_ics,
  notify,
  share_page
};
use crate::components::{
  CountdownPanel,
  Divider,
  ETransferCard,
  MonthCalendar,
  PhotoModal,
  Section
};

#[function_component(App)]
pub fn app() -> Html {
  let config =
    use_memo((), |_| Config::embedded());

  match &*config {
    | Ok(cfg) => html! {
        <InvitationPage
            invitation={cfg.invitation.clone()}
            week_start={cfg.week_start()}
        />
    },
    | Err(err) => {
      tracing::error!(error = %err, "invalid built-in invitation");
      html! {
          <p class="page">{ format!("{err:#}") }</p>
      }
    }
  }
}

#[derive(Properties, PartialEq)]
struct InvitationPageProps {
  invitation: Invitation,
  week_start: Weekday
}

#[function_component(InvitationPage)]
fn invitation_page(
  props: &InvitationPageProps
) -> Html {
  let invite = &props.invitation;
  let selected_photo =
    use_state(|| None::<String>);

  let on_share = {
    let payload = invite.share_payload();
    Callback::from(move |_: MouseEvent| {
      let payload = payload.clone();
      spawn_local(async move {
        match share_page(&payload).await {
          | ShareOutcome::Shared => {}
          | ShareOutcome::Copied => {
            notify(
              &CopyFeedback::from_outcome(
                true,
                CopySubject::Link
              )
              .message
            );
          }
          | ShareOutcome::Failed => {
            notify(
              &CopyFeedback::from_outcome(
                false,
                CopySubject::Link
              )
              .message
            );
          }
        }
      });
    })
  };

  let on_download = {
    let event = invite.calendar_event();
    Callback::from(move |_: MouseEvent| {
      if let Err(err) = download_ics(&event) {
        tracing::warn!(error = %err, "ics download failed");
        notify(&format!(
          "Couldn't create the calendar \
           file: {err}"
        ));
      }
    })
  };

  let on_feedback =
    Callback::from(|feedback: CopyFeedback| {
      notify(&feedback.message);
    });

  let on_close = {
    let selected_photo = selected_photo.clone();
    Callback::from(move |()| {
      selected_photo.set(None)
    })
  };

  let (year, month, day) =
    invite.calendar_focus();
  let maps_link =
    google_maps_search_link(&invite.address);
  let calendar_link =
    google_calendar_link_for(invite);

  let gallery = invite
    .gallery_photos()
    .iter()
    .map(|photo| {
      let selected_photo =
        selected_photo.clone();
      let src = photo.clone();
      let onclick =
        Callback::from(move |_: MouseEvent| {
          selected_photo.set(Some(src.clone()))
        });
      html! {
          <button {onclick}>
              <img src={photo.clone()} alt="gallery" />
          </button>
      }
    })
    .collect::<Html>();

  let lines = |items: &[String]| {
    items
      .iter()
      .map(|line| html! { <p>{ line.clone() }</p> })
      .collect::<Html>()
  };

  html! {
      <>
          <header class="top-bar">
              <span class="brand">{ "WEDDING INVITATION" }</span>
              <button class="btn share" onclick={on_share}>{ "Share" }</button>
          </header>

          <main class="page">
              <div class="card hero">
                  if let Some(hero) = invite.hero_photo() {
                      <img src={hero.to_string()} alt="couple" />
                  }
                  <div class="caption">
                      <h1>{ invite.couple() }</h1>
                      <p>{ invite.couple_en() }</p>
                      <p>{ invite.datetime_text.clone() }</p>
                      <p>{ invite.venue_name.clone() }</p>
                  </div>
              </div>

              <Divider />
              <Section subtitle="INVITATION" title="소중한 분들을 초대합니다">
                  { lines(&invite.greeting_lines) }
              </Section>

              if !invite.gallery_photos().is_empty() {
                  <Divider />
                  <Section subtitle="GALLERY" title="우리의 순간">
                      <div class="gallery">{ gallery }</div>
                  </Section>
              }

              <Divider />
              <Section subtitle="SAVE THE DATE" title={invite.datetime_text.clone()}>
                  <MonthCalendar
                      {year}
                      {month}
                      week_start={props.week_start}
                      highlight={Some(day)}
                  />
                  <CountdownPanel
                      target={invite.wedding_instant()}
                      couple={invite.couple()}
                  />
                  <button class="btn" onclick={on_download}>{ "Add to calendar (.ics)" }</button>
                  <a class="btn" href={calendar_link} target="_blank" rel="noreferrer">
                      { "Google Calendar" }
                  </a>
              </Section>

              <Divider />
              <Section subtitle="LOCATION" title={invite.venue_name.clone()}>
                  <p>{ invite.address.clone() }</p>
                  if let Some(map) = invite.map_image.clone() {
                      <img class="map" src={map} alt="map" />
                  }
                  <a class="btn" href={maps_link} target="_blank" rel="noreferrer">
                      { "Open in Google Maps" }
                  </a>
                  if !invite.traffic_text.is_empty() {
                      <p>{ invite.traffic_text.clone() }</p>
                  }
              </Section>

              <Divider />
              <Section subtitle="GIFT" title="마음 전하실 곳">
                  <ETransferCard
                      title={format!("신랑 {}", invite.groom.name)}
                      email={invite.etransfer.groom.clone()}
                      on_feedback={on_feedback.clone()}
                  />
                  <ETransferCard
                      title={format!("신부 {}", invite.bride.name)}
                      email={invite.etransfer.bride.clone()}
                      {on_feedback}
                  />
              </Section>

              if !invite.rsvp_text.is_empty() {
                  <Divider />
                  <Section subtitle="RSVP" title="참석 여부">
                      <p>{ invite.rsvp_text.clone() }</p>
                  </Section>
              }

              if !invite.meal_lines.is_empty() {
                  <Divider />
                  <Section subtitle="MEAL" title="식사 안내">
                      { lines(&invite.meal_lines) }
                  </Section>
              }

              if !invite.thanks_text.is_empty() {
                  <Divider />
                  <Section subtitle="THANK YOU" title="감사합니다">
                      <p>{ invite.thanks_text.clone() }</p>
                  </Section>
              }
          </main>

          if let Some(src) = (*selected_photo).clone() {
              <PhotoModal {src} {on_close} />
          }
      </>
  }
}
