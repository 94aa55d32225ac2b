//! Split-mode selection state.

use coparent_core::{PresetRatio, SplitMode, SplitRatio, SplitShares};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::splitter::{compute_shares, resolve_ratio, validate};

/// Preset/custom split selection behind the expense form.
///
/// Both ratios are kept while switching modes, so going back to `Custom`
/// restores what was typed before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitSelector {
    mode: SplitMode,
    preset: PresetRatio,
    custom: SplitRatio,
}

impl SplitSelector {
    /// Preset mode with an even split.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Selected preset, kept even while in custom mode.
    pub fn preset(&self) -> PresetRatio {
        self.preset
    }

    /// Entered custom pair, kept even while in preset mode.
    pub fn custom(&self) -> SplitRatio {
        self.custom
    }

    /// Switch modes without discarding either ratio.
    pub fn set_mode(&mut self, mode: SplitMode) {
        self.mode = mode;
    }

    /// Pick a preset and switch to preset mode.
    pub fn select_preset(&mut self, preset: PresetRatio) {
        self.preset = preset;
        self.mode = SplitMode::Preset;
    }

    /// Enter a custom pair and switch to custom mode.
    pub fn set_custom(&mut self, first: u32, second: u32) {
        self.custom = SplitRatio::new(first, second);
        self.mode = SplitMode::Custom;
    }

    /// Ratio in effect.
    pub fn ratio(&self) -> SplitRatio {
        resolve_ratio(self.mode, self.preset, self.custom)
    }

    /// Whether the ratio in effect adds up to 100.
    pub fn is_valid(&self) -> bool {
        let ratio = self.ratio();
        validate(ratio.first, ratio.second)
    }

    /// Shares of `total` under the ratio in effect.
    pub fn shares(&self, total: Decimal) -> SplitShares {
        let ratio = self.ratio();
        compute_shares(total, ratio.first, ratio.second, self.is_valid())
    }

    /// Inline message to show under the split inputs, if any.
    pub fn validation_message(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        let ratio = self.ratio();
        let sum = u64::from(ratio.first) + u64::from(ratio.second);
        Some(format!("Percentages must add up to 100% (currently {sum}%)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_starts_in_preset_mode_with_even_split() {
        let selector = SplitSelector::new();
        assert_eq!(selector.mode(), SplitMode::Preset);
        assert_eq!(selector.ratio(), SplitRatio::new(50, 50));
        assert!(selector.is_valid());
        assert_eq!(selector.validation_message(), None);
    }

    #[test]
    fn test_switching_modes_keeps_custom_values() {
        let mut selector = SplitSelector::new();
        selector.set_custom(65, 35);
        selector.select_preset(PresetRatio::NinetyTen);
        assert_eq!(selector.ratio(), SplitRatio::new(90, 10));

        selector.set_mode(SplitMode::Custom);
        assert_eq!(selector.ratio(), SplitRatio::new(65, 35));

        selector.set_mode(SplitMode::Preset);
        assert_eq!(selector.preset(), PresetRatio::NinetyTen);
    }

    #[test]
    fn test_invalid_custom_blocks_with_message() {
        let mut selector = SplitSelector::new();
        selector.set_custom(60, 41);
        assert!(!selector.is_valid());
        assert_eq!(selector.shares(dec!(200)), SplitShares::INVALID);
        assert_eq!(
            selector.validation_message().as_deref(),
            Some("Percentages must add up to 100% (currently 101%)")
        );
    }

    #[test]
    fn test_shares_follow_selected_preset() {
        let mut selector = SplitSelector::new();
        selector.select_preset(PresetRatio::TwentyFiveSeventyFive);
        let shares = selector.shares(dec!(80));
        assert_eq!(shares.first, dec!(20));
        assert_eq!(shares.second, dec!(60));
        assert!(shares.valid);
    }
}
