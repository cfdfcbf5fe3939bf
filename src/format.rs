//! Date and currency formatting for the console's two locales.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};

/// Suffix used for riyal amounts
pub const CURRENCY_SYMBOL: &str = "ريال";

/// Display locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Arabic (Saudi Arabia): day/month/year with Arabic-Indic digits
    #[default]
    Ar,
    /// English (US): month/day/year with ASCII digits
    En,
}

impl Locale {
    /// Anything that is not an Arabic tag renders as English
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        if tag == "ar" || tag.starts_with("ar-") || tag.starts_with("ar_") {
            Locale::Ar
        } else {
            Locale::En
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ar => "ar-SA",
            Locale::En => "en-US",
        }
    }
}

/// A value accepted by [`format_date`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue<'a> {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(&'a str),
}

impl From<NaiveDate> for DateValue<'_> {
    fn from(date: NaiveDate) -> Self {
        DateValue::Date(date)
    }
}

impl From<NaiveDateTime> for DateValue<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateValue::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateValue<'_> {
    fn from(dt: DateTime<Tz>) -> Self {
        DateValue::DateTime(dt.naive_local())
    }
}

impl<'a> From<&'a str> for DateValue<'a> {
    fn from(text: &'a str) -> Self {
        DateValue::Text(text)
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse the date part out of the textual forms the console produces
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn to_arabic_indic(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(0x0660 + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Format a date for display; unparseable input yields an empty string
pub fn format_date<'a>(value: impl Into<DateValue<'a>>, locale: Locale) -> String {
    let date = match value.into() {
        DateValue::Date(date) => date,
        DateValue::DateTime(dt) => dt.date(),
        DateValue::Text(text) => match parse_date(text) {
            Some(date) => date,
            None => return String::new(),
        },
    };

    match locale {
        Locale::Ar => to_arabic_indic(&format!(
            "{:02}/{:02}/{:04}",
            date.day(),
            date.month(),
            date.year()
        )),
        Locale::En => format!("{:02}/{:02}/{:04}", date.month(), date.day(), date.year()),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an amount with two decimals and the given currency suffix.
/// Missing or non-finite amounts render as zero.
pub fn format_currency_with(amount: Option<f64>, symbol: &str) -> String {
    let amount = match amount {
        Some(a) if a.is_finite() => a,
        _ => return format!("0.00 {}", symbol),
    };

    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // -0.001 rounds to 0.00 and must not keep its sign
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!(
        "{}{}.{} {}",
        sign,
        group_thousands(int_part),
        frac_part,
        symbol
    )
}

pub fn format_currency(amount: Option<f64>) -> String {
    format_currency_with(amount, CURRENCY_SYMBOL)
}

/// Like [`format_currency`] for raw text input; non-numeric text renders as zero
pub fn format_currency_text(text: &str) -> String {
    format_currency(text.trim().parse::<f64>().ok())
}
