use std::fmt;

use tracing::{
  debug,
  info,
  warn
};

use crate::clipboard::{
  NativeClipboard,
  SelectionHost,
  copy_text
};
use crate::invite::SharePayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
  /// The user closed the share sheet.
  Cancelled,
  Failed(String)
}

impl fmt::Display for ShareError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Cancelled => {
        f.write_str("share cancelled")
      }
      | Self::Failed(reason) => {
        write!(f, "share failed: {reason}")
      }
    }
  }
}

impl std::error::Error for ShareError {}

/// A platform share sheet.
#[allow(async_fn_in_trait)]
pub trait ShareSheet {
  async fn share(
    &self,
    payload: &SharePayload,
    url: &str
  ) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
  /// Handed to the share sheet.
  Shared,
  /// The URL went to the clipboard instead.
  Copied,
  Failed
}

/// Offer the page through the share sheet,
/// copying `url` to the clipboard when there
/// is no sheet or it did not go through.
#[tracing::instrument(skip_all, fields(url = %url))]
pub async fn share_or_copy<S, N, H>(
  sheet: Option<&S>,
  native: Option<&N>,
  host: &H,
  payload: &SharePayload,
  url: &str
) -> ShareOutcome
where
  S: ShareSheet,
  N: NativeClipboard,
  H: SelectionHost
{
  if let Some(sheet) = sheet {
    match sheet.share(payload, url).await {
      | Ok(()) => {
        info!("shared through share sheet");
        return ShareOutcome::Shared;
      }
      | Err(err) => {
        warn!(error = %err, "share sheet failed; copying link");
      }
    }
  } else {
    debug!("no share sheet; copying link");
  }

  if copy_text(native, host, url).await {
    ShareOutcome::Copied
  } else {
    ShareOutcome::Failed
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::{
    ShareError,
    ShareOutcome,
    ShareSheet,
    share_or_copy
  };
  use crate::clipboard::{
    ClipboardError,
    NativeClipboard,
    SelectionHost
  };
  use crate::invite::SharePayload;

  struct Sheet(Result<(), ShareError>);

  impl ShareSheet for Sheet {
    async fn share(
      &self,
      _payload: &SharePayload,
      _url: &str
    ) -> Result<(), ShareError> {
      self.0.clone()
    }
  }

  #[derive(Default)]
  struct Recorder {
    written: RefCell<Vec<String>>
  }

  impl NativeClipboard for Recorder {
    async fn write_text(
      &self,
      text: &str
    ) -> Result<(), ClipboardError> {
      self
        .written
        .borrow_mut()
        .push(text.to_string());
      Ok(())
    }
  }

  struct NoDocument;

  impl SelectionHost for NoDocument {
    type Field = ();

    fn create_hidden_field(
      &self
    ) -> Result<(), ClipboardError> {
      Err(ClipboardError::Unavailable)
    }

    fn set_value(
      &self,
      _field: &(),
      _text: &str
    ) -> Result<(), ClipboardError> {
      Ok(())
    }

    fn focus(
      &self,
      _field: &()
    ) -> Result<(), ClipboardError> {
      Ok(())
    }

    fn select_all(
      &self,
      _field: &()
    ) -> Result<(), ClipboardError> {
      Ok(())
    }

    fn exec_copy(
      &self
    ) -> Result<bool, ClipboardError> {
      Ok(false)
    }

    fn remove_field(&self, _field: &()) {}
  }

  fn payload() -> SharePayload {
    SharePayload {
      title: "t".to_string(),
      text:  "body".to_string()
    }
  }

  #[test]
  fn share_sheet_wins_when_it_works() {
    let clipboard = Recorder::default();
    let outcome = pollster::block_on(
      share_or_copy(
        Some(&Sheet(Ok(()))),
        Some(&clipboard),
        &NoDocument,
        &payload(),
        "https://example.org"
      )
    );

    assert_eq!(outcome, ShareOutcome::Shared);
    assert!(clipboard.written.borrow().is_empty());
  }

  #[test]
  fn cancelled_share_copies_the_link() {
    let clipboard = Recorder::default();
    let outcome = pollster::block_on(
      share_or_copy(
        Some(&Sheet(Err(ShareError::Cancelled))),
        Some(&clipboard),
        &NoDocument,
        &payload(),
        "https://example.org"
      )
    );

    assert_eq!(outcome, ShareOutcome::Copied);
    assert_eq!(
      clipboard.written.borrow().as_slice(),
      ["https://example.org".to_string()]
    );
  }

  #[test]
  fn nothing_available_reports_failure() {
    let outcome = pollster::block_on(
      share_or_copy::<Sheet, Recorder, _>(
        None,
        None,
        &NoDocument,
        &payload(),
        "https://example.org"
      )
    );

    assert_eq!(outcome, ShareOutcome::Failed);
  }
}
