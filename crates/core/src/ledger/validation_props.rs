//! Property-based tests for entry line validation.
//!
//! Properties: line exclusivity and the balance invariant.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::LineInput;
use super::validation::{BALANCE_TOLERANCE, is_balanced, validate_lines};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a balanced set of lines: some debits and one
/// offsetting credit.
fn balanced_lines() -> impl Strategy<Value = Vec<LineInput>> {
    prop::collection::vec(positive_amount(), 1..8).prop_map(|debits| {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<LineInput> = debits
            .into_iter()
            .map(|amount| LineInput::debit("601", amount))
            .collect();
        lines.push(LineInput::credit("401", total));
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debits offset by their sum validates, and totals agree.
    #[test]
    fn prop_balanced_lines_accepted(lines in balanced_lines()) {
        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
        prop_assert!(totals.is_balanced);
    }

    /// A line with both sides set is rejected wherever it sits.
    #[test]
    fn prop_both_sides_rejected(
        mut lines in balanced_lines(),
        extra in positive_amount(),
        position in any::<prop::sample::Index>(),
    ) {
        let idx = position.index(lines.len());
        if lines[idx].debit.is_zero() {
            lines[idx].debit = extra;
        } else {
            lines[idx].credit = extra;
        }
        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLine { index, .. }) if index == idx),
            "expected InvalidLine at {}, got {:?}", idx, result
        );
    }

    /// A line with neither side set is rejected.
    #[test]
    fn prop_zero_line_rejected(mut lines in balanced_lines()) {
        lines.push(LineInput::debit("601", Decimal::ZERO));
        let zero_idx = lines.len() - 1;
        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLine { index, .. }) if index == zero_idx),
            "expected InvalidLine, got {:?}", result
        );
    }

    /// Any difference beyond the tolerance is rejected as unbalanced.
    #[test]
    fn prop_imbalance_beyond_tolerance_rejected(
        mut lines in balanced_lines(),
        drift_cents in 2i64..1_000_000i64,
    ) {
        let last = lines.len() - 1;
        lines[last].credit += Decimal::new(drift_cents, 2);
        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedEntry { .. })),
            "expected UnbalancedEntry, got {:?}", result
        );
    }

    /// `is_balanced` is symmetric and accepts exactly the tolerance band.
    #[test]
    fn prop_is_balanced_symmetric(a in positive_amount(), b in positive_amount()) {
        prop_assert_eq!(is_balanced(a, b), is_balanced(b, a));
        prop_assert!(is_balanced(a, a + BALANCE_TOLERANCE));
        prop_assert!(!is_balanced(a, a + BALANCE_TOLERANCE + Decimal::new(1, 4)));
    }
}
