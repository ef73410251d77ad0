//! Balance effects: how a transaction moves account balances.
//!
//! Every transaction kind expands into a small set of [`BalanceEffect`]s,
//! one per touched account. Voiding replays the same effects negated, so
//! the forward and reversal paths share this single table.
//!
//! Sign conventions follow the account model: cash and bank balances are
//! holdings, credit card balances are debt owed. A purchase charged to a
//! card therefore *increases* the card balance, and a card payment
//! decreases both the paying account and the card.

use plata_shared::types::{AccountId, Money};

use super::transaction::TransactionKind;

/// A single signed balance delta against one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceEffect {
    /// The account whose balance moves.
    pub account_id: AccountId,
    /// Signed amount added to the account's balance.
    pub delta: Money,
}

impl BalanceEffect {
    /// Returns the effect that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            account_id: self.account_id,
            delta: -self.delta,
        }
    }
}

/// Expands a transaction kind into the balance deltas it applies.
///
/// `amount` is the transaction's stored (strictly positive) amount.
/// `is_credit_card` reports whether an account is a credit card, which
/// flips the sign of expenses charged to it.
#[must_use]
pub fn effects_of<F>(kind: &TransactionKind, amount: Money, is_credit_card: F) -> Vec<BalanceEffect>
where
    F: Fn(AccountId) -> bool,
{
    match *kind {
        TransactionKind::Income { account_id, .. } => vec![BalanceEffect {
            account_id,
            delta: amount,
        }],
        TransactionKind::Expense { account_id, .. } => {
            let delta = if is_credit_card(account_id) {
                amount
            } else {
                -amount
            };
            vec![BalanceEffect { account_id, delta }]
        }
        TransactionKind::Transfer {
            from_account_id,
            to_account_id,
        } => vec![
            BalanceEffect {
                account_id: from_account_id,
                delta: -amount,
            },
            BalanceEffect {
                account_id: to_account_id,
                delta: amount,
            },
        ],
        TransactionKind::CreditCardPayment {
            from_account_id,
            card_account_id,
        } => vec![
            BalanceEffect {
                account_id: from_account_id,
                delta: -amount,
            },
            BalanceEffect {
                account_id: card_account_id,
                delta: -amount,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use plata_shared::types::CategoryId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn income_credits_the_account() {
        let account = AccountId::new();
        let kind = TransactionKind::Income {
            account_id: account,
            category_id: CategoryId::new(),
        };

        let effects = effects_of(&kind, Money::from(850_000), |_| false);

        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].account_id, account);
        assert_eq!(effects[0].delta, Money::from(850_000));
    }

    #[rstest]
    #[case::cash_or_bank(false, dec!(-45000))]
    #[case::credit_card(true, dec!(45000))]
    fn expense_sign_follows_account_kind(
        #[case] on_card: bool,
        #[case] expected: rust_decimal::Decimal,
    ) {
        let account = AccountId::new();
        let kind = TransactionKind::Expense {
            account_id: account,
            category_id: CategoryId::new(),
        };

        let effects = effects_of(&kind, Money::from(45_000), |_| on_card);

        assert_eq!(effects, vec![BalanceEffect {
            account_id: account,
            delta: Money::from(expected),
        }]);
    }

    #[test]
    fn transfer_moves_between_accounts() {
        let from = AccountId::new();
        let to = AccountId::new();
        let kind = TransactionKind::Transfer {
            from_account_id: from,
            to_account_id: to,
        };

        let effects = effects_of(&kind, Money::from(100_000), |_| false);

        assert_eq!(effects, vec![
            BalanceEffect {
                account_id: from,
                delta: Money::from(-100_000),
            },
            BalanceEffect {
                account_id: to,
                delta: Money::from(100_000),
            },
        ]);
    }

    #[test]
    fn card_payment_decreases_both_sides() {
        let bank = AccountId::new();
        let card = AccountId::new();
        let kind = TransactionKind::CreditCardPayment {
            from_account_id: bank,
            card_account_id: card,
        };

        let effects = effects_of(&kind, Money::from(150_000), |id| id == card);

        assert_eq!(effects, vec![
            BalanceEffect {
                account_id: bank,
                delta: Money::from(-150_000),
            },
            BalanceEffect {
                account_id: card,
                delta: Money::from(-150_000),
            },
        ]);
    }

    #[test]
    fn inverse_negates_the_delta() {
        let effect = BalanceEffect {
            account_id: AccountId::new(),
            delta: Money::from(75_000),
        };

        let inverse = effect.inverse();

        assert_eq!(inverse.account_id, effect.account_id);
        assert_eq!(inverse.delta, Money::from(-75_000));
        assert_eq!(inverse.inverse(), effect);
    }

    #[test]
    fn effects_and_inverses_cancel_out() {
        let from = AccountId::new();
        let to = AccountId::new();
        let kind = TransactionKind::Transfer {
            from_account_id: from,
            to_account_id: to,
        };

        let forward = effects_of(&kind, Money::from(42_000), |_| false);
        let total: Money = forward
            .iter()
            .flat_map(|e| [e.delta, e.inverse().delta])
            .sum();

        assert!(total.is_zero());
    }
}
