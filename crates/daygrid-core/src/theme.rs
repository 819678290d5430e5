use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

const COLORFGBG_ENV_VAR: &str =
  "COLORFGBG";

/// Persisted theme preference. `Auto`
/// follows the terminal background.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
  #[default]
  Light,
  Dark,
  Auto
}

impl ThemeMode {
  pub const ALL: [ThemeMode; 3] = [
    ThemeMode::Light,
    ThemeMode::Dark,
    ThemeMode::Auto
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark",
      | Self::Auto => "auto"
    }
  }

  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    let key =
      raw.trim().to_ascii_lowercase();
    Self::ALL
      .into_iter()
      .find(|mode| mode.as_key() == key)
  }

  /// light -> dark -> auto -> light
  pub fn toggle(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Auto,
      | Self::Auto => Self::Light
    }
  }

  pub fn resolve(
    self,
    prefers_dark: bool
  ) -> ResolvedTheme {
    match self {
      | Self::Light => {
        ResolvedTheme::Light
      }
      | Self::Dark => ResolvedTheme::Dark,
      | Self::Auto if prefers_dark => {
        ResolvedTheme::Dark
      }
      | Self::Auto => {
        ResolvedTheme::Light
      }
    }
  }

  /// Resolves `Auto` against the
  /// terminal's `COLORFGBG` hint.
  pub fn resolve_from_env(
    self
  ) -> ResolvedTheme {
    let hint = std::env::var(
      COLORFGBG_ENV_VAR
    )
    .ok();
    self.resolve(
      hint.as_deref().is_some_and(
        colorfgbg_is_dark
      )
    )
  }
}

impl fmt::Display for ThemeMode {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize
)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
  Light,
  Dark
}

impl ResolvedTheme {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn palette(self) -> Palette {
    match self {
      | Self::Light => Palette {
        id:        "34",
        today:     "1;34",
        muted:     "90",
        malformed: "31"
      },
      | Self::Dark => Palette {
        id:        "33",
        today:     "1;36",
        muted:     "2",
        malformed: "91"
      }
    }
  }
}

/// SGR codes used by the text
/// renderer.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq
)]
pub struct Palette {
  pub id:        &'static str,
  pub today:     &'static str,
  pub muted:     &'static str,
  pub malformed: &'static str
}

/// `COLORFGBG` is `fg;bg` (sometimes
/// `fg;default;bg`); backgrounds 0-6
/// and 8 are dark.
fn colorfgbg_is_dark(
  raw: &str
) -> bool {
  raw
    .rsplit(';')
    .next()
    .and_then(|bg| {
      bg.trim().parse::<u8>().ok()
    })
    .is_some_and(|bg| {
      bg <= 6 || bg == 8
    })
}
