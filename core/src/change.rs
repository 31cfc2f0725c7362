//! Percentage change between a base value and a campaign value.

use serde::{Serialize, Serializer};
use std::fmt;

pub const NOT_APPLICABLE: &str = "not applicable";
pub const INFINITE_INCREASE: &str = "infinite increase";

/// Outcome of comparing a campaign value against its base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    /// Both values are zero.
    NotApplicable,
    /// Base is zero, campaign is not.
    InfiniteIncrease,
    /// `(campaign - base) / base * 100`.
    Percent(f64),
}

impl Change {
    pub fn between(base: f64, campaign: f64) -> Self {
        if base == 0.0 {
            if campaign == 0.0 {
                Change::NotApplicable
            } else {
                Change::InfiniteIncrease
            }
        } else {
            Change::Percent((campaign - base) / base * 100.0)
        }
    }

    /// The numeric change, or None for either sentinel.
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            Change::Percent(pct) => Some(*pct),
            _ => None,
        }
    }
}

/// Signed, one decimal: "+12.3%", "-4.0%".
impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::NotApplicable    => f.write_str(NOT_APPLICABLE),
            Change::InfiniteIncrease => f.write_str(INFINITE_INCREASE),
            Change::Percent(pct)     => write!(f, "{pct:+.1}%"),
        }
    }
}

impl Serialize for Change {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Formatted change string for a (base, campaign) pair.
pub fn percentage_change(base: f64, campaign: f64) -> String {
    Change::between(base, campaign).to_string()
}
