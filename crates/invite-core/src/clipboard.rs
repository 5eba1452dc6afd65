//! Best-effort text-to-clipboard transfer.
//!
//! Two capabilities sit behind small traits:
//! the platform clipboard ([`NativeClipboard`])
//! and a selection-based fallback driven
//! through a [`SelectionHost`]. The host
//! creates an off-screen text field, copies
//! its selection and removes the field again.
//! [`HiddenField`] owns that field so it is
//! removed on every path out of the fallback.

use std::fmt;

use tracing::{
  debug,
  warn
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
  /// The capability is not present on this
  /// host.
  Unavailable,
  /// The host refused the write (permission
  /// prompt declined, insecure context, ...).
  Rejected(String),
  /// A host call failed outright.
  Host(String)
}

impl fmt::Display for ClipboardError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Unavailable => {
        f.write_str(
          "clipboard capability unavailable"
        )
      }
      | Self::Rejected(reason) => {
        write!(
          f,
          "clipboard write rejected: \
           {reason}"
        )
      }
      | Self::Host(reason) => {
        write!(
          f,
          "clipboard host error: {reason}"
        )
      }
    }
  }
}

impl std::error::Error for ClipboardError {}

/// The platform clipboard-write capability.
#[allow(async_fn_in_trait)]
pub trait NativeClipboard {
  async fn write_text(
    &self,
    text: &str
  ) -> Result<(), ClipboardError>;
}

/// Platform steps of the selection-based
/// fallback. `Field` is whatever handle the
/// host uses for its temporary text field.
pub trait SelectionHost {
  type Field;

  /// Create a focusable text field that is
  /// attached but never visible.
  fn create_hidden_field(
    &self
  ) -> Result<Self::Field, ClipboardError>;

  fn set_value(
    &self,
    field: &Self::Field,
    text: &str
  ) -> Result<(), ClipboardError>;

  fn focus(
    &self,
    field: &Self::Field
  ) -> Result<(), ClipboardError>;

  fn select_all(
    &self,
    field: &Self::Field
  ) -> Result<(), ClipboardError>;

  /// Run the legacy copy command on the
  /// current selection.
  fn exec_copy(
    &self
  ) -> Result<bool, ClipboardError>;

  fn remove_field(&self, field: &Self::Field);
}

/// A temporary field attached to a host,
/// removed when dropped.
pub struct HiddenField<'h, H>
where
  H: SelectionHost
{
  host:  &'h H,
  field: H::Field
}

impl<'h, H> HiddenField<'h, H>
where
  H: SelectionHost
{
  pub fn attach(
    host: &'h H
  ) -> Result<Self, ClipboardError> {
    let field = host.create_hidden_field()?;
    Ok(Self { host, field })
  }

  /// Load `text`, focus the field and
  /// select all of it.
  pub fn stage(
    &self,
    text: &str
  ) -> Result<(), ClipboardError> {
    self.host.set_value(&self.field, text)?;
    self.host.focus(&self.field)?;
    self.host.select_all(&self.field)
  }
}

impl<H> Drop for HiddenField<'_, H>
where
  H: SelectionHost
{
  fn drop(&mut self) {
    self.host.remove_field(&self.field);
  }
}

fn selection_copy<H>(
  host: &H,
  text: &str
) -> Result<bool, ClipboardError>
where
  H: SelectionHost
{
  let field = HiddenField::attach(host)?;
  field.stage(text)?;
  host.exec_copy()
}

/// Copy through the selection fallback only.
/// Returns the copy command's own verdict, or
/// `false` when any step failed.
#[tracing::instrument(skip_all, fields(len = text.len()))]
pub fn copy_with_fallback<H>(
  host: &H,
  text: &str
) -> bool
where
  H: SelectionHost
{
  match selection_copy(host, text) {
    | Ok(copied) => {
      debug!(copied, "selection copy finished");
      copied
    }
    | Err(err) => {
      warn!(error = %err, "selection copy failed");
      false
    }
  }
}

/// Put `text` on the clipboard.
///
/// The native clipboard is tried first when
/// present; its absence or any failure moves
/// on to the selection fallback. Never fails:
/// the outcome is the returned flag.
#[tracing::instrument(skip_all, fields(len = text.len()))]
pub async fn copy_text<N, H>(
  native: Option<&N>,
  host: &H,
  text: &str
) -> bool
where
  N: NativeClipboard,
  H: SelectionHost
{
  match native {
    | Some(clipboard) => {
      match clipboard.write_text(text).await
      {
        | Ok(()) => {
          debug!("native clipboard write succeeded");
          return true;
        }
        | Err(err) => {
          warn!(error = %err, "native clipboard write failed; falling back");
        }
      }
    }
    | None => {
      debug!("no native clipboard; using selection fallback");
    }
  }

  copy_with_fallback(host, text)
}

/// What the caller shows after a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopySubject {
  Link,
  Email
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
  pub copied:  bool,
  pub message: String
}

impl CopyFeedback {
  #[must_use]
  pub fn from_outcome(
    copied: bool,
    subject: CopySubject
  ) -> Self {
    let message = match (copied, subject) {
      | (true, CopySubject::Link) => {
        "Link copied to clipboard."
      }
      | (true, CopySubject::Email) => {
        "Email address copied to clipboard."
      }
      | (false, _) => {
        "Couldn't copy automatically. Please \
         copy it manually."
      }
    };
    Self {
      copied,
      message: message.to_string()
    }
  }
}
