//! Deconstructed date parameters
//!
//! Date selects submit a date as three keys, `<field>(1i)`, `<field>(2i)` and
//! `<field>(3i)`, holding year, month and day. [`extract_date_parts`] groups
//! those keys per field and [`DateParts::coerce`] combines them:
//!
//! - all three present and numeric: a calendar date
//! - any part missing or empty: `None`, the field is cleared
//! - a non-numeric part or an impossible date: a [`FormError`]

use crate::errors::{FormError, FormResult};
use crate::populate::Params;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static DATE_PART_KEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(?P<field>.+)\((?P<part>[123])i\)$")
		.expect("DATE_PART_KEY: invalid regex pattern")
});

/// Formats tried, in order, when a date field receives a single value.
pub const DEFAULT_DATE_INPUT_FORMATS: &[&str] = &[
	"%Y-%m-%d",  // 1997-09-27
	"%m/%d/%Y",  // 09/27/1997
	"%b %d %Y",  // Sep 27 1997
	"%b %d, %Y", // Sep 27, 1997
	"%d %b %Y",  // 27 Sep 1997
	"%d %b, %Y", // 27 Sep, 1997
	"%B %d %Y",  // September 27 1997
	"%B %d, %Y", // September 27, 1997
	"%d %B %Y",  // 27 September 1997
	"%d %B, %Y", // 27 September, 1997
];

/// Returns the field name if `key` is a deconstructed date key.
///
/// # Examples
///
/// ```
/// use nestform_forms::date_parts::date_part_field;
///
/// assert_eq!(date_part_field("release_date(2i)"), Some("release_date"));
/// assert_eq!(date_part_field("release_date"), None);
/// assert_eq!(date_part_field("release_date(4i)"), None);
/// ```
pub fn date_part_field(key: &str) -> Option<&str> {
	DATE_PART_KEY
		.captures(key)
		.and_then(|caps| caps.name("field"))
		.map(|m| m.as_str())
}

/// The year, month and day strings submitted for one date field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateParts {
	field: String,
	year: Option<String>,
	month: Option<String>,
	day: Option<String>,
}

impl DateParts {
	pub fn new(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			..Self::default()
		}
	}

	pub fn with_year(mut self, year: impl Into<String>) -> Self {
		self.year = Some(year.into());
		self
	}

	pub fn with_month(mut self, month: impl Into<String>) -> Self {
		self.month = Some(month.into());
		self
	}

	pub fn with_day(mut self, day: impl Into<String>) -> Self {
		self.day = Some(day.into());
		self
	}

	pub fn field(&self) -> &str {
		&self.field
	}

	fn set(&mut self, part: &str, value: Option<String>) {
		match part {
			"1" => self.year = value,
			"2" => self.month = value,
			"3" => self.day = value,
			_ => {}
		}
	}

	/// Combines the parts into a date.
	///
	/// # Examples
	///
	/// ```
	/// use chrono::NaiveDate;
	/// use nestform_forms::date_parts::DateParts;
	///
	/// let parts = DateParts::new("release_date").with_year("1997").with_month("9").with_day("27");
	/// assert_eq!(parts.coerce().unwrap(), NaiveDate::from_ymd_opt(1997, 9, 27));
	///
	/// let parts = DateParts::new("release_date").with_year("1997").with_month("").with_day("27");
	/// assert_eq!(parts.coerce().unwrap(), None);
	/// ```
	pub fn coerce(&self) -> FormResult<Option<NaiveDate>> {
		let present = |part: &Option<String>| {
			part.as_deref()
				.map(str::trim)
				.filter(|s| !s.is_empty())
				.map(str::to_string)
		};
		let (Some(year), Some(month), Some(day)) =
			(present(&self.year), present(&self.month), present(&self.day))
		else {
			return Ok(None);
		};

		let y: i32 = self.parse_part("year", &year)?;
		let m: u32 = self.parse_part("month", &month)?;
		let d: u32 = self.parse_part("day", &day)?;

		NaiveDate::from_ymd_opt(y, m, d)
			.map(Some)
			.ok_or_else(|| FormError::InvalidDate {
				field: self.field.clone(),
				value: format!("{year}-{month}-{day}"),
			})
	}

	fn parse_part<T: FromStr>(&self, part: &'static str, raw: &str) -> FormResult<T> {
		let malformed = || FormError::MalformedDatePart {
			field: self.field.clone(),
			part,
			value: raw.to_string(),
		};
		if !raw.chars().all(|c| c.is_ascii_digit()) {
			return Err(malformed());
		}
		raw.parse().map_err(|_| malformed())
	}
}

/// Groups the deconstructed date keys of one payload level by field name, in
/// order of first appearance.
///
/// Numbers are accepted as parts; `null` counts as a missing part.
pub fn extract_date_parts(params: &Params) -> Vec<DateParts> {
	let mut groups: IndexMap<String, DateParts> = IndexMap::new();
	for (key, value) in params {
		let Some(caps) = DATE_PART_KEY.captures(key) else {
			continue;
		};
		let (Some(field), Some(part)) = (caps.name("field"), caps.name("part")) else {
			continue;
		};
		let raw = match value {
			serde_json::Value::Null => None,
			serde_json::Value::String(s) => Some(s.clone()),
			other => Some(other.to_string()),
		};
		groups
			.entry(field.as_str().to_string())
			.or_insert_with(|| DateParts::new(field.as_str()))
			.set(part.as_str(), raw);
	}
	groups.into_values().collect()
}

/// Parses a single submitted value for a date field against `formats`.
///
/// Years outside 1000..=9999 are rejected so two-digit years are never
/// guessed.
pub fn parse_date<S: AsRef<str>>(field: &str, raw: &str, formats: &[S]) -> FormResult<NaiveDate> {
	let raw = raw.trim();
	for format in formats {
		if let Ok(date) = NaiveDate::parse_from_str(raw, format.as_ref()) {
			if !(1000..=9999).contains(&date.year()) {
				continue;
			}
			return Ok(date);
		}
	}
	Err(FormError::InvalidDate {
		field: field.to_string(),
		value: raw.to_string(),
	})
}
