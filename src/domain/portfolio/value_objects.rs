use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when creating portfolio value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
  #[error("Unsupported locale: {0}")]
  Unsupported(String),
}

// ============================================================================
// Locale Value Object
// ============================================================================

/// Languages the site is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
  #[default]
  Es,
  En,
}

impl Locale {
  pub fn code(&self) -> &'static str {
    match self {
      Locale::Es => "es",
      Locale::En => "en",
    }
  }

  /// Parses a BCP 47 language tag by its primary subtag (`en-US` is `en`)
  pub fn from_tag(tag: &str) -> Option<Self> {
    let primary = tag.trim().split(['-', '_']).next()?;

    match primary.to_ascii_lowercase().as_str() {
      "es" => Some(Locale::Es),
      "en" => Some(Locale::En),
      _ => None,
    }
  }
}

impl FromStr for Locale {
  type Err = LocaleError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    Locale::from_tag(value).ok_or_else(|| LocaleError::Unsupported(value.to_string()))
  }
}

impl fmt::Display for Locale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

// ============================================================================
// LocalizedText Value Object
// ============================================================================

/// Spanish original with an optional English translation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText {
  pub es: String,
  pub en: Option<String>,
}

impl LocalizedText {
  pub fn new(es: impl Into<String>, en: Option<String>) -> Self {
    Self { es: es.into(), en }
  }

  /// Text for `locale`, falling back to Spanish when no translation exists
  pub fn resolve(&self, locale: Locale) -> &str {
    match locale {
      Locale::Es => &self.es,
      Locale::En => match self.en.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => &self.es,
      },
    }
  }
}

// ============================================================================
// PeriodDate Value Object
// ============================================================================

/// A point in a CV period string, ordered chronologically.
/// `Present` sorts after every dated month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PeriodDate {
  Month { year: i32, month: u32 },
  Present,
}

const PRESENT_WORDS: &[&str] = &["actualidad", "presente", "actual", "present", "current"];

const MONTHS: &[(&str, u32)] = &[
  ("enero", 1),
  ("febrero", 2),
  ("marzo", 3),
  ("abril", 4),
  ("mayo", 5),
  ("junio", 6),
  ("julio", 7),
  ("agosto", 8),
  ("septiembre", 9),
  ("setiembre", 9),
  ("octubre", 10),
  ("noviembre", 11),
  ("diciembre", 12),
  ("january", 1),
  ("february", 2),
  ("march", 3),
  ("april", 4),
  ("may", 5),
  ("june", 6),
  ("july", 7),
  ("august", 8),
  ("september", 9),
  ("october", 10),
  ("november", 11),
  ("december", 12),
  ("ene", 1),
  ("abr", 4),
  ("ago", 8),
  ("dic", 12),
  ("jan", 1),
  ("feb", 2),
  ("mar", 3),
  ("apr", 4),
  ("jun", 6),
  ("jul", 7),
  ("aug", 8),
  ("sep", 9),
  ("sept", 9),
  ("oct", 10),
  ("nov", 11),
  ("dec", 12),
];

fn month_number(word: &str) -> Option<u32> {
  MONTHS
    .iter()
    .find(|(name, _)| *name == word)
    .map(|(_, number)| *number)
}

fn parse_year(value: &str) -> Option<i32> {
  if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }
  value.parse().ok()
}

fn parse_month(value: &str) -> Option<u32> {
  let month: u32 = value.parse().ok()?;
  (1..=12).contains(&month).then_some(month)
}

impl PeriodDate {
  /// Parses strings like "Enero 2020", "ene. de 2020", "March 2019", "2018",
  /// "03/2021", "2021-03" or "Actualidad". Returns `None` for anything else.
  pub fn parse(value: &str) -> Option<Self> {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() {
      return None;
    }

    if PRESENT_WORDS.contains(&lowered.as_str()) {
      return Some(PeriodDate::Present);
    }

    if let Some((month, year)) = lowered.split_once('/') {
      return Some(PeriodDate::Month {
        year: parse_year(year.trim())?,
        month: parse_month(month.trim())?,
      });
    }

    if let Some((year, month)) = lowered.split_once('-') {
      return Some(PeriodDate::Month {
        year: parse_year(year.trim())?,
        month: parse_month(month.trim())?,
      });
    }

    let words: Vec<&str> = lowered
      .split(|c: char| c.is_whitespace() || c == ',')
      .map(|word| word.trim_end_matches('.'))
      .filter(|word| !word.is_empty() && *word != "de" && *word != "of")
      .collect();

    match words.as_slice() {
      [year] => Some(PeriodDate::Month {
        year: parse_year(year)?,
        month: 1,
      }),
      [month, year] => Some(PeriodDate::Month {
        year: parse_year(year)?,
        month: month_number(month)?,
      }),
      _ => None,
    }
  }
}

/// Start and end of a CV entry, comparable by recency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
  pub start: Option<PeriodDate>,
  pub end: Option<PeriodDate>,
}

impl Period {
  /// A missing or blank end means the entry is ongoing
  pub fn parse(start: &str, end: Option<&str>) -> Self {
    let end = match end.map(str::trim) {
      None | Some("") => Some(PeriodDate::Present),
      Some(value) => PeriodDate::parse(value),
    };

    Self {
      start: PeriodDate::parse(start),
      end,
    }
  }

  pub fn is_current(&self) -> bool {
    self.end == Some(PeriodDate::Present)
  }

  /// Most recent first: ongoing entries, then by end date, then by start
  /// date. Unparseable dates go last.
  pub fn recency_cmp(&self, other: &Self) -> Ordering {
    descending_known_first(self.end, other.end)
      .then_with(|| descending_known_first(self.start, other.start))
  }
}

fn descending_known_first(a: Option<PeriodDate>, b: Option<PeriodDate>) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => b.cmp(&a),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}
