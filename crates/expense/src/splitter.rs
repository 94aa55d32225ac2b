//! Two-party expense split arithmetic.

use std::str::FromStr;

use coparent_core::{PresetRatio, SplitMode, SplitRatio, SplitShares};
use rust_decimal::{Decimal, RoundingStrategy};

/// The ratio in effect for `mode`.
///
/// Presets are valid by construction. Custom pairs come back as entered and
/// must go through [`validate`] before use.
pub fn resolve_ratio(mode: SplitMode, preset: PresetRatio, custom: SplitRatio) -> SplitRatio {
    match mode {
        SplitMode::Preset => preset.ratio(),
        SplitMode::Custom => custom,
    }
}

/// Whether a percentage pair adds up to exactly 100.
pub fn validate(first: u32, second: u32) -> bool {
    first.checked_add(second) == Some(100)
}

/// Split `total` by the percentage pair.
///
/// Each share is rounded to cents on its own, midpoint away from zero; the
/// shares may differ from `total` by a cent and no remainder is moved between
/// them. An invalid pair, or one too large to compute, yields
/// [`SplitShares::INVALID`] and must block submission.
pub fn compute_shares(total: Decimal, first: u32, second: u32, valid: bool) -> SplitShares {
    if !valid {
        return SplitShares::INVALID;
    }
    match (share(total, first), share(total, second)) {
        (Some(first), Some(second)) => SplitShares {
            first,
            second,
            valid: true,
        },
        _ => SplitShares::INVALID,
    }
}

fn share(total: Decimal, percent: u32) -> Option<Decimal> {
    let raw = total
        .checked_mul(Decimal::from(percent))?
        .checked_div(Decimal::ONE_HUNDRED)?;
    Some(raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Read a free-text amount field.
///
/// Surrounding whitespace, a leading currency symbol and thousands
/// separators are ignored. Empty, non-numeric and negative input all read
/// as zero; the form's own "greater than zero" check rejects those later.
pub fn parse_amount(text: &str) -> Decimal {
    let trimmed = text.trim().trim_start_matches(['$', '€', '£']).trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    match Decimal::from_str(&cleaned) {
        Ok(amount) if amount.is_sign_positive() => amount,
        _ => Decimal::ZERO,
    }
}

/// Read a free-text percentage field. Non-numeric input reads as zero.
pub fn parse_percent(text: &str) -> u32 {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse()
        .unwrap_or(0)
}
