//! Expense model - a shared cost split between two co-parents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::id::{ChildId, ExpenseId};
use crate::Time;

/// How the split ratio is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// One of the fixed [`PresetRatio`]s
    #[default]
    Preset,
    /// A freely entered percentage pair
    Custom,
}

/// A two-party percentage pair.
///
/// Valid only when both sides add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitRatio {
    /// Percentage paid by the first party
    pub first: u32,
    /// Percentage paid by the second party
    pub second: u32,
}

impl SplitRatio {
    /// Create a ratio without validating it.
    pub const fn new(first: u32, second: u32) -> Self {
        Self { first, second }
    }

    /// Even split.
    pub const EVEN: SplitRatio = SplitRatio::new(50, 50);
}

impl Default for SplitRatio {
    fn default() -> Self {
        SplitRatio::EVEN
    }
}

impl std::fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// The allowed preset splits. Each sums to 100 by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PresetRatio {
    /// 50-50
    #[default]
    #[serde(rename = "50-50")]
    FiftyFifty,
    /// 25-75
    #[serde(rename = "25-75")]
    TwentyFiveSeventyFive,
    /// 75-25
    #[serde(rename = "75-25")]
    SeventyFiveTwentyFive,
    /// 70-30
    #[serde(rename = "70-30")]
    SeventyThirty,
    /// 30-70
    #[serde(rename = "30-70")]
    ThirtySeventy,
    /// 90-10
    #[serde(rename = "90-10")]
    NinetyTen,
}

impl PresetRatio {
    /// All presets, in the order they are offered.
    pub const ALL: [PresetRatio; 6] = [
        PresetRatio::FiftyFifty,
        PresetRatio::TwentyFiveSeventyFive,
        PresetRatio::SeventyFiveTwentyFive,
        PresetRatio::SeventyThirty,
        PresetRatio::ThirtySeventy,
        PresetRatio::NinetyTen,
    ];

    /// The percentage pair of this preset.
    pub const fn ratio(self) -> SplitRatio {
        match self {
            PresetRatio::FiftyFifty => SplitRatio::new(50, 50),
            PresetRatio::TwentyFiveSeventyFive => SplitRatio::new(25, 75),
            PresetRatio::SeventyFiveTwentyFive => SplitRatio::new(75, 25),
            PresetRatio::SeventyThirty => SplitRatio::new(70, 30),
            PresetRatio::ThirtySeventy => SplitRatio::new(30, 70),
            PresetRatio::NinetyTen => SplitRatio::new(90, 10),
        }
    }
}

impl std::fmt::Display for PresetRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ratio().fmt(f)
    }
}

impl std::str::FromStr for PresetRatio {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PresetRatio::ALL
            .into_iter()
            .find(|preset| preset.to_string() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Returned when text does not name an allowed preset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset split: {0} (allowed: 50-50, 25-75, 75-25, 70-30, 30-70, 90-10)")]
pub struct UnknownPreset(pub String);

/// The two amounts a total splits into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShares {
    /// Amount owed by the first party
    #[serde(with = "rust_decimal::serde::str")]
    pub first: Decimal,
    /// Amount owed by the second party
    #[serde(with = "rust_decimal::serde::str")]
    pub second: Decimal,
    /// Whether the ratio was valid; invalid shares are always zero
    pub valid: bool,
}

impl SplitShares {
    /// Zero shares flagged invalid.
    pub const INVALID: SplitShares = SplitShares {
        first: Decimal::ZERO,
        second: Decimal::ZERO,
        valid: false,
    };
}

/// A submitted shared expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Child the expense was for, if any
    #[serde(default)]
    pub child_id: Option<ChildId>,

    /// What was paid for
    pub description: String,

    /// Total amount
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// Who paid up front
    pub paid_by: String,

    /// How the ratio was chosen
    pub split_mode: SplitMode,

    /// Ratio applied
    pub ratio: SplitRatio,

    /// Resulting shares
    pub shares: SplitShares,

    /// When submitted
    pub created_at: Time,
}
