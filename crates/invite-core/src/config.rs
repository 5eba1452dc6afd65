use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use chrono::{
  DateTime,
  Weekday
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::invite::{
  DEFAULT_INVITE_TOML,
  Invitation
};
use crate::month_grid::parse_week_start;

const CONFIG_FILE_NAME: &str = "invite.toml";
const CONFIG_ENV_VAR: &str = "INVITE_CONFIG";
const HOME_CONFIG_FILE: &str = ".invite.toml";
const DEFAULT_DURATION_MINUTES: u32 = 120;
const DEFAULT_TIMEZONE_ID: &str =
  "America/Toronto";

fn default_week_start() -> String {
  "sunday".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSettings {
  #[serde(default = "default_week_start")]
  pub week_start: String
}

impl Default for CalendarSettings {
  fn default() -> Self {
    Self {
      week_start: default_week_start()
    }
  }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
  #[serde(flatten)]
  invitation: Invitation,
  #[serde(default)]
  calendar:   CalendarSettings
}

#[derive(Debug, Clone)]
pub struct Config {
  pub invitation:  Invitation,
  pub calendar:    CalendarSettings,
  pub loaded_file: Option<PathBuf>
}

impl Config {
  /// Load the invitation config.
  ///
  /// Lookup order: `override_path`, then
  /// `$INVITE_CONFIG` (`/dev/null` disables
  /// file lookup), `./invite.toml`,
  /// `~/.invite.toml`, and finally the built-in
  /// invitation.
  #[tracing::instrument(skip(override_path))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(override_path)?
    else {
      warn!(
        "no invite config found; using \
         built-in invitation"
      );
      return Self::embedded();
    };

    info!(file = %path.display(), "loading invite config");
    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::from_toml_str(
      &raw,
      &path.display().to_string()
    )?;
    cfg.loaded_file = Some(path);
    Ok(cfg)
  }

  pub fn embedded() -> anyhow::Result<Self> {
    Self::from_toml_str(
      DEFAULT_INVITE_TOML,
      "embedded"
    )
  }

  pub fn from_toml_str(
    raw: &str,
    source: &str
  ) -> anyhow::Result<Self> {
    let parsed =
      toml::from_str::<ConfigFile>(raw)
        .with_context(|| {
          format!(
            "failed to parse invite \
             config {source}"
          )
        })?;

    let mut cfg = Self {
      invitation:  parsed.invitation,
      calendar:    parsed.calendar,
      loaded_file: None
    };
    cfg.sanitize();
    debug!(
      source,
      starts_at = %cfg.invitation.starts_at,
      timezone = %cfg.invitation.timezone_id,
      "parsed invite config"
    );
    Ok(cfg)
  }

  /// Apply `key=value` overrides from the
  /// command line. Unknown keys are errors.
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      debug!(key = %key, value = %value, "applying override");
      let invite = &mut self.invitation;
      match key.as_str() {
        | "starts_at" => {
          invite.starts_at =
            DateTime::parse_from_rfc3339(
              value.trim()
            )
            .with_context(|| {
              format!(
                "invalid starts_at \
                 {value:?}; expected RFC \
                 3339 with an offset"
              )
            })?;
        }
        | "duration_minutes" => {
          invite.duration_minutes = value
            .trim()
            .parse()
            .with_context(|| {
              format!(
                "invalid duration_minutes \
                 {value:?}"
              )
            })?;
        }
        | "timezone_id" => {
          invite.timezone_id = value
        }
        | "venue_name" => {
          invite.venue_name = value
        }
        | "address" => {
          invite.address = value
        }
        | "datetime_text" => {
          invite.datetime_text = value
        }
        | "event_title" => {
          invite.event_title = Some(value)
        }
        | "calendar.week_start" => {
          self.calendar.week_start = value
        }
        | other => {
          bail!(
            "unknown config key {other:?}"
          )
        }
      }
    }
    self.sanitize();
    Ok(())
  }

  #[must_use]
  pub fn week_start(&self) -> Weekday {
    parse_week_start(&self.calendar.week_start)
  }

  fn sanitize(&mut self) {
    let invite = &mut self.invitation;

    if invite.duration_minutes == 0 {
      warn!(
        "duration_minutes was 0; using \
         default"
      );
      invite.duration_minutes =
        DEFAULT_DURATION_MINUTES;
    }

    if invite.timezone_id.trim().is_empty() {
      invite.timezone_id =
        DEFAULT_TIMEZONE_ID.to_string();
    } else {
      invite.timezone_id =
        invite.timezone_id.trim().to_string();
    }

    match invite.zone_matches_offset() {
      | Ok(true) => {}
      | Ok(false) => {
        warn!(
          timezone = %invite.timezone_id,
          offset = %invite.starts_at.offset(),
          "timezone disagrees with the \
           announced offset; keeping the \
           offset"
        );
      }
      | Err(err) => {
        warn!(error = %err, "timezone id not recognised");
      }
    }

    if self
      .calendar
      .week_start
      .trim()
      .is_empty()
    {
      self.calendar.week_start =
        default_week_start();
    }
  }
}

#[tracing::instrument(skip(override_path))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(expand_tilde(path)));
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if trimmed == "/dev/null" {
      return Ok(None);
    }
    if !trimmed.is_empty() {
      return Ok(Some(expand_tilde(
        Path::new(trimmed)
      )));
    }
  }

  let cwd = std::env::current_dir()
    .context(
      "cannot determine current directory"
    )?;
  let candidate = cwd.join(CONFIG_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(home_config_file(
    dirs::home_dir().as_deref()
  ))
}

/// `~/.invite.toml`, when it exists.
fn home_config_file(
  home: Option<&Path>
) -> Option<PathBuf> {
  home
    .map(|home| home.join(HOME_CONFIG_FILE))
    .filter(|path| path.exists())
}

fn expand_tilde(path: &Path) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) = text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

/// `KEY=VALUE` from the command line.
pub fn parse_key_value(
  raw: &str
) -> anyhow::Result<(String, String)> {
  let (key, value) =
    raw.split_once('=').ok_or_else(|| {
      anyhow!("expected KEY=VALUE, got: {raw}")
    })?;
  Ok((
    key.trim().to_string(),
    value.trim().to_string()
  ))
}

#[cfg(test)]
mod tests {
  use chrono::Weekday;

  use super::{
    Config,
    home_config_file,
    parse_key_value
  };

  #[test]
  fn embedded_config_defaults_to_sunday() {
    let cfg =
      Config::embedded().expect("embedded");
    assert_eq!(cfg.week_start(), Weekday::Sun);
    assert!(cfg.loaded_file.is_none());
  }

  #[test]
  fn overrides_replace_fields() {
    let mut cfg =
      Config::embedded().expect("embedded");
    cfg
      .apply_overrides([
        (
          "duration_minutes".to_string(),
          "90".to_string()
        ),
        (
          "calendar.week_start".to_string(),
          "monday".to_string()
        )
      ])
      .expect("valid overrides");

    assert_eq!(
      cfg.invitation.duration_minutes,
      90
    );
    assert_eq!(cfg.week_start(), Weekday::Mon);
  }

  #[test]
  fn bad_overrides_are_reported() {
    let mut cfg =
      Config::embedded().expect("embedded");
    assert!(
      cfg
        .apply_overrides([(
          "colour".to_string(),
          "red".to_string()
        )])
        .is_err()
    );
    assert!(
      cfg
        .apply_overrides([(
          "starts_at".to_string(),
          "2026-02-19 19:00".to_string()
        )])
        .is_err()
    );
  }

  #[test]
  fn zero_duration_falls_back() {
    let mut cfg =
      Config::embedded().expect("embedded");
    cfg
      .apply_overrides([(
        "duration_minutes".to_string(),
        "0".to_string()
      )])
      .expect("valid override");
    assert_eq!(
      cfg.invitation.duration_minutes,
      120
    );
  }

  #[test]
  fn home_file_is_used_only_when_present() {
    let home =
      tempfile::tempdir().expect("tempdir");
    assert_eq!(
      home_config_file(Some(home.path())),
      None
    );
    assert_eq!(home_config_file(None), None);

    let path = home.path().join(".invite.toml");
    std::fs::write(&path, "")
      .expect("write home config");
    assert_eq!(
      home_config_file(Some(home.path())),
      Some(path)
    );
  }

  #[test]
  fn key_value_needs_an_equals_sign() {
    assert_eq!(
      parse_key_value(" a = b ")
        .expect("valid pair"),
      ("a".to_string(), "b".to_string())
    );
    assert!(parse_key_value("nope").is_err());
  }
}
