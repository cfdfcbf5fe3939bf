//! Field validators for phone numbers, email addresses, national IDs and license plates.
//!
//! Every validator answers with a plain `bool`; empty input is always invalid.
//! Patterns come from a [`PatternTable`] so other locales can swap them out via
//! config. Each pattern is anchored at compile time, so only full-string matches
//! count.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Arabic letters (hamza through yeh); excludes Arabic-Indic digits and marks
const ARABIC_LETTER: &str = r"[\x{0621}-\x{064A}]";

/// Regex sources per field, matched as alternatives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternTable {
    pub phone: Vec<String>,
    pub email: Vec<String>,
    pub national_id: Vec<String>,
    pub license_plate: Vec<String>,
}

impl PatternTable {
    /// Saudi phone, ID and plate conventions.
    ///
    /// Digits are spelled `[0-9]` rather than `\d`, which is Unicode-aware and would
    /// also accept Arabic-Indic digits.
    pub fn saudi() -> Self {
        Self {
            phone: vec![
                "05[0-9]{8}".to_string(),
                r"\+?9665[0-9]{8}".to_string(),
            ],
            email: vec![r"[^\s@]+@[^\s@]+\.[^\s@]+".to_string()],
            national_id: vec!["[12][0-9]{9}".to_string()],
            license_plate: vec![
                format!(r"[0-9]{{3,4}}\s*{0}(?:\s*{0}){{0,2}}", ARABIC_LETTER),
                r"[0-9]{3,4}\s*[A-Z]{1,3}".to_string(),
            ],
        }
    }

    /// (field name, patterns) pairs in a fixed order
    pub fn fields(&self) -> [(&'static str, &[String]); 4] {
        [
            ("phone", self.phone.as_slice()),
            ("email", self.email.as_slice()),
            ("national_id", self.national_id.as_slice()),
            ("license_plate", self.license_plate.as_slice()),
        ]
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::saudi()
    }
}

/// A compiled [`PatternTable`]
#[derive(Debug, Clone)]
pub struct Validators {
    phone: Vec<Regex>,
    email: Vec<Regex>,
    national_id: Vec<Regex>,
    license_plate: Vec<Regex>,
}

/// Compile `pattern` as a full-string match.
///
/// The pattern must also compile on its own, so unbalanced groups cannot escape the anchors.
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{})$", pattern))
}

fn compile_field(field: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| anchored(p).map_err(|e| anyhow!("invalid {} pattern '{}': {}", field, p, e)))
        .collect()
}

fn any_match(patterns: &[Regex], input: &str) -> bool {
    !input.is_empty() && patterns.iter().any(|re| re.is_match(input))
}

impl Validators {
    pub fn compile(table: &PatternTable) -> Result<Self> {
        Ok(Self {
            phone: compile_field("phone", &table.phone)?,
            email: compile_field("email", &table.email)?,
            national_id: compile_field("national_id", &table.national_id)?,
            license_plate: compile_field("license_plate", &table.license_plate)?,
        })
    }

    /// Whitespace is removed before matching, so "05 1234 5678" is accepted
    pub fn phone(&self, phone: &str) -> bool {
        let normalized: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        any_match(&self.phone, &normalized)
    }

    pub fn email(&self, email: &str) -> bool {
        any_match(&self.email, email)
    }

    pub fn national_id(&self, national_id: &str) -> bool {
        any_match(&self.national_id, national_id)
    }

    pub fn license_plate(&self, plate: &str) -> bool {
        any_match(&self.license_plate, plate)
    }
}

static BUILTIN: Lazy<Validators> = Lazy::new(|| {
    Validators::compile(&PatternTable::saudi()).expect("built-in patterns compile")
});

/// The validators compiled from the built-in table
pub fn builtin() -> &'static Validators {
    &BUILTIN
}

pub fn validate_phone(phone: &str) -> bool {
    BUILTIN.phone(phone)
}

pub fn validate_email(email: &str) -> bool {
    BUILTIN.email(email)
}

pub fn validate_national_id(national_id: &str) -> bool {
    BUILTIN.national_id(national_id)
}

pub fn validate_license_plate(plate: &str) -> bool {
    BUILTIN.license_plate(plate)
}
