//! Browser implementations of the clipboard,
//! share sheet and file download capabilities.
//!
//! Capabilities are probed at call time through
//! `Reflect`, so an older browser simply gets
//! `None` and the caller falls back.

use gloo::timers::callback::Timeout;
use gloo::timers::future::TimeoutFuture;
use invite_core::clipboard::{
  ClipboardError,
  CopyFeedback,
  CopySubject,
  NativeClipboard,
  SelectionHost,
  copy_text
};
use invite_core::ics::{
  CalendarEvent,
  ICS_MIME_TYPE,
  build_ics,
  ics_file_name
};
use invite_core::invite::SharePayload;
use invite_core::share::{
  ShareError,
  ShareOutcome,
  ShareSheet,
  share_or_copy
};
use js_sys::{
  Array,
  Function,
  Object,
  Promise,
  Reflect
};
use wasm_bindgen::{
  JsCast,
  JsValue
};
use wasm_bindgen_futures::{
  JsFuture,
  future_to_promise
};
use web_sys::{
  Blob,
  BlobPropertyBag,
  Clipboard,
  Document,
  HtmlAnchorElement,
  HtmlDocument,
  HtmlTextAreaElement,
  Navigator,
  Url
};

/// An unanswered permission prompt must not
/// hold the copy forever.
const CLIPBOARD_TIMEOUT_MILLIS: u32 = 3_000;
/// Mobile Safari drops the download when the
/// object URL goes away right after the click.
const REVOKE_DELAY_MILLIS: u32 = 1_000;

const HIDDEN_FIELD_STYLE: &str =
  "position: fixed; top: 0; left: -9999px; opacity: 0; pointer-events: none;";

fn js_error(err: &JsValue) -> String {
  err
    .as_string()
    .or_else(|| {
      Reflect::get(err, &"message".into())
        .ok()
        .and_then(|msg| msg.as_string())
    })
    .unwrap_or_else(|| format!("{err:?}"))
}

fn has_method(
  target: &JsValue,
  name: &str
) -> bool {
  Reflect::get(target, &name.into())
    .map(|value| value.is_function())
    .unwrap_or(false)
}

/// A promise rejected with `reason` once
/// `millis` have passed.
fn reject_after(
  millis: u32,
  reason: &'static str
) -> Promise {
  future_to_promise(async move {
    TimeoutFuture::new(millis).await;
    Err(JsValue::from_str(reason))
  })
}

fn navigator() -> Option<Navigator> {
  web_sys::window()
    .map(|window| window.navigator())
}

/// `navigator.clipboard.writeText`.
pub struct BrowserClipboard {
  clipboard: Clipboard
}

impl BrowserClipboard {
  pub fn probe() -> Option<Self> {
    let navigator = navigator()?;
    let clipboard =
      Reflect::get(&navigator, &"clipboard".into())
        .ok()
        .filter(|value| {
          !value.is_undefined()
            && !value.is_null()
        })?;
    if !has_method(&clipboard, "writeText") {
      return None;
    }
    clipboard
      .dyn_into::<Clipboard>()
      .ok()
      .map(|clipboard| Self { clipboard })
  }
}

impl NativeClipboard for BrowserClipboard {
  async fn write_text(
    &self,
    text: &str
  ) -> Result<(), ClipboardError> {
    let bounded = Promise::race(&Array::of2(
      &self.clipboard.write_text(text),
      &reject_after(
        CLIPBOARD_TIMEOUT_MILLIS,
        "clipboard write timed out"
      )
    ));
    JsFuture::from(bounded)
      .await
      .map(|_| ())
      .map_err(|err| {
        ClipboardError::Rejected(js_error(&err))
      })
  }
}

/// Hidden `<textarea>` plus
/// `document.execCommand("copy")`.
pub struct DomSelection {
  document: Option<Document>
}

impl DomSelection {
  pub fn new() -> Self {
    Self {
      document: web_sys::window()
        .and_then(|window| window.document())
    }
  }

  fn document(
    &self
  ) -> Result<&Document, ClipboardError> {
    self
      .document
      .as_ref()
      .ok_or(ClipboardError::Unavailable)
  }
}

impl Default for DomSelection {
  fn default() -> Self {
    Self::new()
  }
}

impl SelectionHost for DomSelection {
  type Field = HtmlTextAreaElement;

  fn create_hidden_field(
    &self
  ) -> Result<Self::Field, ClipboardError> {
    let document = self.document()?;
    let body = document
      .body()
      .ok_or(ClipboardError::Unavailable)?;
    let field = document
      .create_element("textarea")
      .map_err(|err| {
        ClipboardError::Host(js_error(&err))
      })?
      .dyn_into::<HtmlTextAreaElement>()
      .map_err(|_| {
        ClipboardError::Host(
          "textarea has an unexpected type"
            .to_string()
        )
      })?;
    field.set_read_only(true);
    field
      .set_attribute("aria-hidden", "true")
      .and_then(|()| {
        field.set_attribute(
          "style",
          HIDDEN_FIELD_STYLE
        )
      })
      .map_err(|err| {
        ClipboardError::Host(js_error(&err))
      })?;
    body.append_child(&field).map_err(
      |err| {
        ClipboardError::Host(js_error(&err))
      }
    )?;
    Ok(field)
  }

  fn set_value(
    &self,
    field: &Self::Field,
    text: &str
  ) -> Result<(), ClipboardError> {
    field.set_value(text);
    Ok(())
  }

  fn focus(
    &self,
    field: &Self::Field
  ) -> Result<(), ClipboardError> {
    field.focus().map_err(|err| {
      ClipboardError::Host(js_error(&err))
    })
  }

  fn select_all(
    &self,
    field: &Self::Field
  ) -> Result<(), ClipboardError> {
    field.select();
    Ok(())
  }

  fn exec_copy(
    &self
  ) -> Result<bool, ClipboardError> {
    let document = self
      .document()?
      .dyn_ref::<HtmlDocument>()
      .ok_or(ClipboardError::Unavailable)?;
    document.exec_command("copy").map_err(
      |err| {
        ClipboardError::Host(js_error(&err))
      }
    )
  }

  fn remove_field(&self, field: &Self::Field) {
    field.remove();
  }
}

/// `navigator.share`.
pub struct BrowserShare {
  navigator: Navigator,
  share:     Function
}

impl BrowserShare {
  pub fn probe() -> Option<Self> {
    let navigator = navigator()?;
    let share =
      Reflect::get(&navigator, &"share".into())
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some(Self { navigator, share })
  }
}

impl ShareSheet for BrowserShare {
  async fn share(
    &self,
    payload: &SharePayload,
    url: &str
  ) -> Result<(), ShareError> {
    let data = Object::new();
    for (key, value) in [
      ("title", payload.title.as_str()),
      ("text", payload.text.as_str()),
      ("url", url)
    ] {
      Reflect::set(
        &data,
        &key.into(),
        &value.into()
      )
      .map_err(|err| {
        ShareError::Failed(js_error(&err))
      })?;
    }

    let promise = self
      .share
      .call1(&self.navigator, &data)
      .map_err(|err| {
        ShareError::Failed(js_error(&err))
      })?
      .dyn_into::<Promise>()
      .map_err(|_| {
        ShareError::Failed(
          "share did not return a promise"
            .to_string()
        )
      })?;

    JsFuture::from(promise)
      .await
      .map(|_| ())
      .map_err(|err| {
        let name =
          Reflect::get(&err, &"name".into())
            .ok()
            .and_then(|name| name.as_string());
        match name.as_deref() {
          | Some("AbortError") => {
            ShareError::Cancelled
          }
          | _ => {
            ShareError::Failed(js_error(&err))
          }
        }
      })
  }
}

/// Copy `text` with whatever the browser
/// offers.
pub async fn copy_to_clipboard(
  text: &str
) -> bool {
  let native = BrowserClipboard::probe();
  let host = DomSelection::new();
  copy_text(native.as_ref(), &host, text)
    .await
}

pub async fn copy_email(
  email: &str
) -> CopyFeedback {
  let copied = copy_to_clipboard(email).await;
  CopyFeedback::from_outcome(
    copied,
    CopySubject::Email
  )
}

/// Share the current page, or copy its URL.
pub async fn share_page(
  payload: &SharePayload
) -> ShareOutcome {
  let url = web_sys::window()
    .and_then(|window| {
      window.location().href().ok()
    })
    .unwrap_or_default();
  let sheet = BrowserShare::probe();
  let native = BrowserClipboard::probe();
  share_or_copy(
    sheet.as_ref(),
    native.as_ref(),
    &DomSelection::new(),
    payload,
    &url
  )
  .await
}

/// Offer the event as an `.ics` download.
#[tracing::instrument(skip_all, fields(title = %event.title))]
pub fn download_ics(
  event: &CalendarEvent
) -> Result<(), String> {
  event
    .validate()
    .map_err(|err| format!("{err:#}"))?;
  let document = web_sys::window()
    .and_then(|window| window.document())
    .ok_or("no document")?;

  let parts = Array::of1(&JsValue::from_str(
    &build_ics(event)
  ));
  let options = BlobPropertyBag::new();
  options.set_type(ICS_MIME_TYPE);
  let blob =
    Blob::new_with_str_sequence_and_options(
      &parts, &options
    )
    .map_err(|err| js_error(&err))?;
  let url = Url::create_object_url_with_blob(
    &blob
  )
  .map_err(|err| js_error(&err))?;

  let anchor = document
    .create_element("a")
    .map_err(|err| js_error(&err))?
    .dyn_into::<HtmlAnchorElement>()
    .map_err(|_| "anchor has an unexpected type")?;
  anchor.set_href(&url);
  anchor.set_download(&ics_file_name(
    &event.title
  ));
  anchor.click();

  Timeout::new(REVOKE_DELAY_MILLIS, move || {
    if let Err(err) = Url::revoke_object_url(&url)
    {
      tracing::warn!(error = %js_error(&err), "revoking ics url failed");
    }
  })
  .forget();
  tracing::info!("offered ics download");
  Ok(())
}

/// `window.alert`, used for copy feedback.
pub fn notify(message: &str) {
  if let Some(window) = web_sys::window()
    && let Err(err) =
      window.alert_with_message(message)
  {
    tracing::warn!(error = %js_error(&err), "alert failed");
  }
}
