//! Moment-style date format strings.
//!
//! Users configure daily note names with the token vocabulary popularised by
//! Moment.js (`YYYY-MM-DD`, `ddd, MMM D`, `[Week] WW`...). Each format is
//! compiled once into a [`time`] format description, so that rendering and
//! strict parsing share exactly the same vocabulary.
//!
//! | Token  | Meaning                    | Token | Meaning                       |
//! |--------|----------------------------|-------|-------------------------------|
//! | `YYYY` | four digit year            | `YY`  | two digit year (1969-2068)    |
//! | `MMMM` | `January`                  | `MMM` | `Jan`                         |
//! | `MM`   | `01`-`12`                  | `M`   | `1`-`12`                      |
//! | `DDDD` | day of year `001`-`366`    | `DDD` | day of year `1`-`366`         |
//! | `DD`   | `01`-`31`                  | `D`   | `1`-`31`                      |
//! | `dddd` | `Monday`                   | `ddd` | `Mon`                         |
//! | `d`    | weekday `0`-`6` from Sunday | `E`  | ISO weekday `1`-`7`           |
//! | `WW`   | ISO week `01`-`53`         | `W`   | ISO week `1`-`53`             |
//! | `HH`/`H` | hour `00`-`23`           | `hh`/`h` | hour `01`-`12`            |
//! | `mm`/`m` | minute                   | `ss`/`s` | second                    |
//! | `A`/`a` | `AM`/`am`                 | `[..]` | literal text                 |
//!
//! Every other character is copied through as literal text.

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU8;
use std::str::FromStr;
use time::format_description::modifier::YearRepr;
use time::format_description::{self, BorrowedFormatItem, Component};
use time::parsing::Parsed;
use time::{Date, Month, PrimitiveDateTime};

/// Tokens and their `time` format description (version 1 syntax).
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "[year]"),
    ("YY", "[year repr:last_two]"),
    ("MMMM", "[month repr:long]"),
    ("MMM", "[month repr:short]"),
    ("MM", "[month]"),
    ("M", "[month padding:none]"),
    ("DDDD", "[ordinal]"),
    ("DDD", "[ordinal padding:none]"),
    ("DD", "[day]"),
    ("D", "[day padding:none]"),
    ("dddd", "[weekday]"),
    ("ddd", "[weekday repr:short]"),
    ("d", "[weekday repr:sunday one_indexed:false]"),
    ("E", "[weekday repr:monday]"),
    ("WW", "[week_number repr:iso]"),
    ("W", "[week_number repr:iso padding:none]"),
    ("HH", "[hour]"),
    ("H", "[hour padding:none]"),
    ("hh", "[hour repr:12]"),
    ("h", "[hour repr:12 padding:none]"),
    ("mm", "[minute]"),
    ("m", "[minute padding:none]"),
    ("ss", "[second]"),
    ("s", "[second padding:none]"),
    ("A", "[period]"),
    ("a", "[period case:lower]"),
];

/// Moment tokens that cannot be expressed as a `time` component.
const UNSUPPORTED: &[&str] = &[
    "GGGG", "gggg", "DDDo", "Mo", "Do", "do", "Wo", "wo", "Qo", "dd", "ww", "ZZ", "Q", "X", "x", "Z", "w", "k", "S",
];

/// Two digit years above this belong to the 1900s.
const TWO_DIGIT_YEAR_PIVOT: u8 = 68;

/// `YYYY` matches exactly this many ASCII digits, never a sign.
const YEAR_DIGITS: usize = 4;

/// A compiled date format.
///
/// Constructed via [`FromStr`] so that malformed formats fail at creation
/// time rather than at render time.
///
/// ```
/// use daybook_dates::DateFormat;
/// use time::macros::{date, datetime};
///
/// let format: DateFormat = "YYYY-MM-DD [Journal]".parse().unwrap();
/// assert_eq!(format.render(datetime!(2024-01-15 09:30)).unwrap(), "2024-01-15 Journal");
/// assert_eq!(format.parse_date("2024-01-15 Journal"), Some(date!(2024-01-15)));
/// assert_eq!(format.parse_date("2024-01-15"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    description: String,
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let description = compile(s)?;
        // Make sure `time` agrees with the translation before handing it out.
        format_description::parse(&description).or_raise(|| ErrorKind::InvalidFormat(s.to_string()))?;
        Ok(Self { source: s.to_string(), description })
    }
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.source)
    }
}

impl DateFormat {
    /// The format string as the user wrote it.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn items(&self) -> Result<Vec<BorrowedFormatItem<'_>>> {
        format_description::parse(&self.description).or_raise(|| ErrorKind::InvalidFormat(self.source.clone()))
    }

    /// Renders a timestamp.
    pub fn render(&self, timestamp: PrimitiveDateTime) -> Result<String> {
        timestamp.format(&self.items()?).or_raise(|| ErrorKind::Render)
    }

    /// Strictly parses `input` into a calendar date.
    ///
    /// The whole input must be consumed. Returns `None` on any mismatch, for
    /// impossible dates (`2023-02-30`), and when a parsed weekday disagrees
    /// with the date it is attached to.
    pub fn parse_date(&self, input: &str) -> Option<Date> {
        let items = self.items().ok()?;
        let mut parsed = Parsed::new();
        let mut remaining = input.as_bytes();
        for item in &items {
            let rest = parsed.parse_item(remaining, item).ok()?;
            if matches!(item, BorrowedFormatItem::Component(Component::Year(year)) if year.repr == YearRepr::Full)
                && !is_plain_year(&remaining[..remaining.len() - rest.len()])
            {
                return None;
            }
            remaining = rest;
        }
        if !remaining.is_empty() {
            return None;
        }
        let year = match (parsed.year(), parsed.year_last_two()) {
            (Some(year), _) => year,
            (None, Some(yy)) if yy > TWO_DIGIT_YEAR_PIVOT => 1900 + i32::from(yy),
            (None, Some(yy)) => 2000 + i32::from(yy),
            (None, None) => return None,
        };
        let date = match (parsed.month(), parsed.day(), parsed.ordinal()) {
            (None, None, Some(ordinal)) => Date::from_ordinal_date(year, ordinal.get()).ok()?,
            (month, day, _) => Date::from_calendar_date(
                year,
                month.unwrap_or(Month::January),
                day.map_or(1, NonZeroU8::get),
            )
            .ok()?,
        };
        match parsed.weekday() {
            Some(weekday) if weekday != date.weekday() => None,
            _ => Some(date),
        }
    }
}

fn is_plain_year(consumed: &[u8]) -> bool {
    consumed.len() == YEAR_DIGITS && consumed.iter().all(u8::is_ascii_digit)
}

/// Translates a moment-style format into a `time` format description.
fn compile(format: &str) -> Result<String> {
    let mut description = String::with_capacity(format.len() * 4);
    let mut rest = format;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            let Some(end) = rest.find(']') else {
                exn::bail!(ErrorKind::InvalidFormat(format.to_string()));
            };
            push_literal(&mut description, &rest[1..end]);
            rest = &rest[end + 1..];
            continue;
        }
        if let Some(token) = UNSUPPORTED.iter().filter(|t| rest.starts_with(**t)).max_by_key(|t| t.len())
            && TOKENS.iter().all(|(t, _)| !rest.starts_with(*t) || t.len() < token.len())
        {
            exn::bail!(ErrorKind::UnsupportedToken { token: token.to_string(), format: format.to_string() });
        }
        match TOKENS.iter().filter(|(t, _)| rest.starts_with(*t)).max_by_key(|(t, _)| t.len()) {
            Some((token, component)) => {
                description.push_str(component);
                rest = &rest[token.len()..];
            },
            None => {
                push_literal(&mut description, &rest[..c.len_utf8()]);
                rest = &rest[c.len_utf8()..];
            },
        }
    }
    Ok(description)
}

fn push_literal(description: &mut String, literal: &str) {
    // An opening bracket is the only character with meaning outside of a component.
    description.push_str(&literal.replace('[', "[["));
}
