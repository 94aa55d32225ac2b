//! Expense form submission.

use chrono::{DateTime, Utc};
use coparent_core::{ChildId, Expense, ExpenseId, SplitRatio};
use rust_decimal::Decimal;
use tracing::debug;

use crate::selector::SplitSelector;
use crate::splitter::parse_amount;

/// Reasons a submission is blocked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpenseError {
    /// Amount missing, non-numeric, negative or zero
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Description left blank
    #[error("description is required")]
    MissingDescription,

    /// Payer left blank
    #[error("select who paid")]
    MissingPayer,

    /// Split does not add up to 100
    #[error("split {ratio} does not add up to 100%")]
    InvalidSplit {
        /// Ratio that was entered
        ratio: SplitRatio,
    },

    /// Shares of the amount do not fit in a decimal
    #[error("amount is too large to split")]
    AmountTooLarge,
}

/// Contents of the add-expense form.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    /// Child the expense was for
    pub child_id: Option<ChildId>,

    /// What was paid for
    pub description: String,

    /// Amount as typed
    pub amount_text: String,

    /// Who paid up front
    pub paid_by: String,

    /// Split selection
    pub selector: SplitSelector,
}

impl ExpenseDraft {
    /// Amount as it currently reads; bad input reads as zero.
    pub fn amount(&self) -> Decimal {
        parse_amount(&self.amount_text)
    }

    /// Validate the form and build the expense record.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<Expense, ExpenseError> {
        let amount = self.amount();
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::InvalidAmount);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ExpenseError::MissingDescription);
        }
        let paid_by = self.paid_by.trim();
        if paid_by.is_empty() {
            return Err(ExpenseError::MissingPayer);
        }

        if !self.selector.is_valid() {
            return Err(ExpenseError::InvalidSplit {
                ratio: self.selector.ratio(),
            });
        }
        let shares = self.selector.shares(amount);
        if !shares.valid {
            return Err(ExpenseError::AmountTooLarge);
        }

        let expense = Expense {
            id: ExpenseId::new(),
            child_id: self.child_id.clone(),
            description: description.to_string(),
            amount,
            paid_by: paid_by.to_string(),
            split_mode: self.selector.mode(),
            ratio: self.selector.ratio(),
            shares,
            created_at: now,
        };
        debug!(expense_id = %expense.id, amount = %amount, ratio = %expense.ratio, "expense submitted");
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coparent_core::{PresetRatio, SplitMode};
    use rust_decimal_macros::dec;

    fn draft(amount: &str) -> ExpenseDraft {
        ExpenseDraft {
            child_id: Some(ChildId::new("k1")),
            description: "School trip".to_string(),
            amount_text: amount.to_string(),
            paid_by: "Alex".to_string(),
            selector: SplitSelector::new(),
        }
    }

    #[test]
    fn test_submit_builds_expense_with_shares() {
        let mut form = draft("200");
        form.selector.set_custom(60, 40);

        let expense = form.submit(Utc::now()).unwrap();
        assert_eq!(expense.amount, dec!(200));
        assert_eq!(expense.split_mode, SplitMode::Custom);
        assert_eq!(expense.ratio, SplitRatio::new(60, 40));
        assert_eq!(expense.shares.first, dec!(120.00));
        assert_eq!(expense.shares.second, dec!(80.00));
    }

    #[test]
    fn test_zero_or_bad_amount_blocks_submission() {
        for amount in ["", "0", "abc", "-5"] {
            assert_eq!(draft(amount).submit(Utc::now()), Err(ExpenseError::InvalidAmount));
        }
    }

    #[test]
    fn test_invalid_split_blocks_submission() {
        let mut form = draft("200");
        form.selector.set_custom(60, 41);
        assert_eq!(
            form.submit(Utc::now()),
            Err(ExpenseError::InvalidSplit { ratio: SplitRatio::new(60, 41) })
        );
    }

    #[test]
    fn test_overflowing_amount_is_not_reported_as_bad_split() {
        let mut form = draft("79228162514264337593543950335");
        form.selector.set_custom(60, 40);
        assert_eq!(form.submit(Utc::now()), Err(ExpenseError::AmountTooLarge));
    }

    #[test]
    fn test_blank_fields_block_submission() {
        let mut form = draft("10");
        form.description = "  ".to_string();
        assert_eq!(form.submit(Utc::now()), Err(ExpenseError::MissingDescription));

        let mut form = draft("10");
        form.paid_by.clear();
        assert_eq!(form.submit(Utc::now()), Err(ExpenseError::MissingPayer));
    }

    #[test]
    fn test_preset_submission_records_preset_ratio() {
        let mut form = draft("$50.00");
        form.selector.select_preset(PresetRatio::SeventyThirty);
        let expense = form.submit(Utc::now()).unwrap();
        assert_eq!(expense.split_mode, SplitMode::Preset);
        assert_eq!(expense.shares.first, dec!(35));
        assert_eq!(expense.shares.second, dec!(15));
    }
}
