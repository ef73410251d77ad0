//! Property-based tests for the ledger engine.
//!
//! These exercise the apply/void pair across all transaction kinds and
//! random amounts: voiding must restore balances exactly, failed voids
//! must change nothing, and stored amounts must stay positive.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use plata_shared::types::{AccountId, CategoryId, Money, UserId};

use super::account::{AccountKind, CardTerms, NewAccount};
use super::category::{CategoryKind, NewCategory};
use super::engine::Ledger;
use super::transaction::{NewTransaction, TransactionKind};

/// A ledger with one account of each kind and a category of each kind.
struct Rig {
    ledger: Ledger,
    bank: AccountId,
    cash: AccountId,
    card: AccountId,
    income_cat: CategoryId,
    expense_cat: CategoryId,
}

fn rig() -> Rig {
    let mut ledger = Ledger::new(UserId::new());
    let bank = ledger
        .create_account(NewAccount {
            name: "Banco".to_string(),
            kind: AccountKind::Bank,
            opening_balance: Money::new(Decimal::from(1_000_000)),
            color: "#3B82F6".to_string(),
            icon: "bank".to_string(),
        })
        .unwrap()
        .id;
    let cash = ledger
        .create_account(NewAccount {
            name: "Efectivo".to_string(),
            kind: AccountKind::Cash,
            opening_balance: Money::new(Decimal::from(200_000)),
            color: "#22C55E".to_string(),
            icon: "wallet".to_string(),
        })
        .unwrap()
        .id;
    let card = ledger
        .create_account(NewAccount {
            name: "Visa".to_string(),
            kind: AccountKind::CreditCard(CardTerms {
                credit_limit: Money::new(Decimal::from(2_000_000)),
                closing_day: 25,
                due_day: 10,
            }),
            opening_balance: Money::ZERO,
            color: "#EF4444".to_string(),
            icon: "credit-card".to_string(),
        })
        .unwrap()
        .id;
    let income_cat = ledger
        .create_category(NewCategory {
            name: "Sueldo".to_string(),
            kind: CategoryKind::Income,
            icon: "💰".to_string(),
            color: "#10B981".to_string(),
            parent_id: None,
        })
        .unwrap()
        .id;
    let expense_cat = ledger
        .create_category(NewCategory {
            name: "Supermercado".to_string(),
            kind: CategoryKind::Expense,
            icon: "🛒".to_string(),
            color: "#F59E0B".to_string(),
            parent_id: None,
        })
        .unwrap()
        .id;
    Rig {
        ledger,
        bank,
        cash,
        card,
        income_cat,
        expense_cat,
    }
}

/// Maps a selector onto one of the five kind/endpoint combinations.
fn kind_for(rig: &Rig, selector: u8) -> TransactionKind {
    match selector % 5 {
        0 => TransactionKind::Income {
            account_id: rig.bank,
            category_id: rig.income_cat,
        },
        1 => TransactionKind::Expense {
            account_id: rig.cash,
            category_id: rig.expense_cat,
        },
        2 => TransactionKind::Expense {
            account_id: rig.card,
            category_id: rig.expense_cat,
        },
        3 => TransactionKind::Transfer {
            from_account_id: rig.bank,
            to_account_id: rig.cash,
        },
        _ => TransactionKind::CreditCardPayment {
            from_account_id: rig.bank,
            card_account_id: rig.card,
        },
    }
}

fn new_tx(kind: TransactionKind, amount: Money) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        amount,
        kind,
        description: "generated".to_string(),
    }
}

/// Strategy for whole-unit positive amounts.
fn amount() -> impl Strategy<Value = Money> {
    (1i64..10_000_000i64).prop_map(Money::from)
}

fn balances(ledger: &Ledger) -> Vec<(AccountId, Money)> {
    ledger
        .accounts()
        .iter()
        .map(|a| (a.id, a.balance))
        .collect()
}

/// Liquid holdings minus card debt.
fn real_balance(ledger: &Ledger) -> Money {
    ledger
        .accounts()
        .iter()
        .map(|a| {
            if a.kind.is_liquid() {
                a.balance
            } else {
                -a.balance
            }
        })
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Applying any transaction and then voiding it restores every
    /// account balance exactly, with no drift.
    #[test]
    fn prop_void_restores_balances(selector in 0u8..5, amount in amount()) {
        let mut rig = rig();
        let before = balances(&rig.ledger);

        let applied = rig
            .ledger
            .apply(new_tx(kind_for(&rig, selector), amount))
            .unwrap();
        rig.ledger.void(applied.transaction.id).unwrap();

        prop_assert_eq!(balances(&rig.ledger), before);
    }

    /// A rejected second void changes neither balances nor history.
    #[test]
    fn prop_double_void_is_rejected_without_effect(selector in 0u8..5, amount in amount()) {
        let mut rig = rig();
        let applied = rig
            .ledger
            .apply(new_tx(kind_for(&rig, selector), amount))
            .unwrap();
        rig.ledger.void(applied.transaction.id).unwrap();

        let after_first = balances(&rig.ledger);
        let history_len = rig.ledger.transactions().len();

        prop_assert!(rig.ledger.void(applied.transaction.id).is_err());
        prop_assert_eq!(balances(&rig.ledger), after_first);
        prop_assert_eq!(rig.ledger.transactions().len(), history_len);
    }

    /// Net worth (liquid minus debt) moves exactly the way the kind says:
    /// income adds the amount, expenses subtract it no matter how they
    /// were paid, transfers and card payments are internal reshuffles.
    #[test]
    fn prop_real_balance_delta_by_kind(selector in 0u8..5, amount in amount()) {
        let mut rig = rig();
        let before = real_balance(&rig.ledger);
        let kind = kind_for(&rig, selector);

        rig.ledger.apply(new_tx(kind, amount)).unwrap();

        let delta = real_balance(&rig.ledger) - before;
        let expected = match kind {
            TransactionKind::Income { .. } => amount,
            TransactionKind::Expense { .. } => -amount,
            TransactionKind::Transfer { .. } | TransactionKind::CreditCardPayment { .. } => {
                Money::ZERO
            }
        };
        prop_assert_eq!(delta, expected);
    }

    /// Stored amounts stay positive through any apply/void sequence;
    /// reversals carry sign in their semantics, never in the amount.
    #[test]
    fn prop_amounts_stay_positive(
        ops in proptest::collection::vec((0u8..5, 1i64..1_000_000i64), 1..8),
        void_mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let mut rig = rig();
        let mut ids = Vec::new();
        for (selector, units) in ops {
            let applied = rig
                .ledger
                .apply(new_tx(kind_for(&rig, selector), Money::from(units)))
                .unwrap();
            ids.push(applied.transaction.id);
        }
        for (id, void_it) in ids.iter().zip(void_mask) {
            if void_it {
                rig.ledger.void(*id).unwrap();
            }
        }

        for tx in rig.ledger.transactions() {
            prop_assert!(tx.amount.is_positive(), "amount {} in {:?}", tx.amount, tx.id);
        }
    }
}
