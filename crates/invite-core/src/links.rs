use chrono::Utc;

use crate::invite::Invitation;

const GOOGLE_MAPS_SEARCH: &str =
  "https://www.google.com/maps/search/?api=1";
const GOOGLE_CALENDAR_RENDER: &str =
  "https://calendar.google.com/calendar/render?action=TEMPLATE";

#[must_use]
pub fn google_maps_search_link(
  address: &str
) -> String {
  format!(
    "{GOOGLE_MAPS_SEARCH}&query={}",
    urlencoding::encode(address)
  )
}

/// Bare "add to Google Calendar" link with a
/// title and details but no time span.
#[must_use]
pub fn google_calendar_template_link(
  text: &str,
  details: &str
) -> String {
  format!(
    "{GOOGLE_CALENDAR_RENDER}&text={}&details={}",
    urlencoding::encode(text),
    urlencoding::encode(details)
  )
}

/// Template link prefilled with the ceremony
/// span (as UTC instants) and its zone.
#[must_use]
pub fn google_calendar_link_for(
  invite: &Invitation
) -> String {
  let event = invite.calendar_event();
  let start = invite
    .wedding_instant()
    .with_timezone(&Utc);
  let end = start
    + (event.end_local - event.start_local);

  format!(
    "{}&dates={}/{}&ctz={}&location={}",
    google_calendar_template_link(
      &event.title,
      &event.description
    ),
    start.format("%Y%m%dT%H%M%SZ"),
    end.format("%Y%m%dT%H%M%SZ"),
    urlencoding::encode(&event.timezone_id),
    urlencoding::encode(&event.location)
  )
}

#[cfg(test)]
mod tests {
  use super::{
    google_calendar_link_for,
    google_calendar_template_link,
    google_maps_search_link
  };
  use crate::invite::Invitation;

  #[test]
  fn maps_link_encodes_the_address() {
    assert_eq!(
      google_maps_search_link(
        "8018 Yonge St, Thornhill"
      ),
      "https://www.google.com/maps/search/?api=1&query=8018%20Yonge%20St%2C%20Thornhill"
    );
  }

  #[test]
  fn template_link_encodes_newlines() {
    let link = google_calendar_template_link(
      "A & B",
      "Hall\nStreet"
    );
    assert!(link.contains("text=A%20%26%20B"));
    assert!(link.contains("details=Hall%0AStreet"));
  }

  #[test]
  fn invitation_link_carries_utc_span() {
    let invite = Invitation::embedded()
      .expect("embedded config parses");
    let link = google_calendar_link_for(&invite);

    assert!(link.contains(
      "dates=20260220T000000Z/20260220T020000Z"
    ));
    assert!(link.contains("ctz=America%2FToronto"));
  }
}
