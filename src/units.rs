use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Cooldown units offered by the upload form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CooldownUnit {
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Default for CooldownUnit {
    fn default() -> Self {
        CooldownUnit::Second
    }
}

impl CooldownUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            CooldownUnit::Day => MILLIS_PER_DAY,
            CooldownUnit::Hour => MILLIS_PER_HOUR,
            CooldownUnit::Minute => MILLIS_PER_MINUTE,
            CooldownUnit::Second => MILLIS_PER_SECOND,
            CooldownUnit::Millisecond => 1,
        }
    }

    pub fn to_millis(self, value: u64) -> u64 {
        value.saturating_mul(self.multiplier())
    }

    pub fn tags() -> Vec<String> {
        CooldownUnit::iter().map(|unit| unit.to_string()).collect()
    }
}

/// Converts `value` expressed in `unit` into milliseconds.
///
/// Unrecognised tags are treated as milliseconds, so a misspelled unit
/// passes the value through unchanged.
pub fn to_millis(unit: &str, value: u64) -> u64 {
    match unit.parse::<CooldownUnit>() {
        Ok(unit) => unit.to_millis(value),
        Err(_) => {
            tracing::debug!(unit, "unknown cooldown unit, treating value as milliseconds");
            value
        }
    }
}

/// Formats an integer with `,` thousands separators.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
