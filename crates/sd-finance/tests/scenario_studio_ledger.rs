//! Ledger aggregation over a month of studio bookkeeping.
//!
//!   2023-10-20  income   3500.00  wedding shoot
//!   2023-10-25  expense  4200.00  85mm lens
//!   2023-11-01  income    500.00  maternity deposit
//!   2023-11-05  expense   120.00  software subscription
//!   2023-11-10  income    800.00  printed album
//!
//! Recorded out of date order on purpose.

use chrono::{TimeZone, Utc};
use sd_finance::*;
use sd_schemas::{Transaction, TransactionKind};
use uuid::Uuid;

fn tx(desc: &str, units: i64, (y, m, d): (i32, u32, u32), kind: TransactionKind) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        description: desc.to_string(),
        amount_cents: Cents::units(units).raw(),
        date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        kind,
        category: "Services".to_string(),
    }
}

fn ledger() -> Vec<Transaction> {
    use TransactionKind::*;
    vec![
        tx("album", 800, (2023, 11, 10), Income),
        tx("wedding", 3500, (2023, 10, 20), Income),
        tx("lens", 4200, (2023, 10, 25), Expense),
        tx("deposit", 500, (2023, 11, 1), Income),
        tx("software", 120, (2023, 11, 5), Expense),
    ]
}

#[test]
fn totals_and_balance() {
    let s = summarize(&ledger());
    assert_eq!(s.total_income, Cents::units(4800));
    assert_eq!(s.total_expense, Cents::units(4320));
    assert_eq!(s.balance, Cents::units(480));
}

#[test]
fn balance_can_go_negative() {
    let only_lens: Vec<Transaction> = filter_by_kind(&ledger(), KindFilter::Expense);
    let s = summarize(&only_lens);
    assert_eq!(s.balance, Cents::units(-4320));
    assert_eq!(s.balance.to_string(), "-4320.00");
}

#[test]
fn filter_keeps_recorded_order() {
    let income: Vec<String> = filter_by_kind(&ledger(), KindFilter::Income)
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(income, vec!["album", "wedding", "deposit"]);
    assert_eq!(filter_by_kind(&ledger(), KindFilter::All).len(), 5);
}

#[test]
fn history_is_date_ordered_running_balance() {
    let h = balance_history(&ledger());
    let got: Vec<(&str, i64, i64)> = h
        .iter()
        .map(|p| (p.description.as_str(), p.signed_amount.raw(), p.balance.raw()))
        .collect();

    assert_eq!(
        got,
        vec![
            ("wedding", 350_000, 350_000),
            ("lens", -420_000, -70_000),
            ("deposit", 50_000, -20_000),
            ("software", -12_000, -32_000),
            ("album", 80_000, 48_000),
        ]
    );
    assert_eq!(h.last().unwrap().balance, summarize(&ledger()).balance);
}

#[test]
fn summary_serializes_cents_as_integers() {
    let v = serde_json::to_value(summarize(&ledger())).unwrap();
    assert_eq!(v["total_income"], 480_000);
    assert_eq!(v["balance"], 48_000);
}

#[test]
fn largest_accepted_amounts_aggregate_without_overflow() {
    let big = parse_amount("100000000000").unwrap();
    assert_eq!(big, MAX_AMOUNT);
    let mk = |desc: &str, d: u32, kind: TransactionKind| Transaction {
        id: Uuid::new_v4(),
        description: desc.to_string(),
        amount_cents: big.raw(),
        date: Utc.with_ymd_and_hms(2023, 11, d, 0, 0, 0).unwrap(),
        kind,
        category: "Services".to_string(),
    };
    let ledger = vec![
        mk("first", 1, TransactionKind::Income),
        mk("second", 2, TransactionKind::Income),
        mk("refund", 3, TransactionKind::Expense),
    ];

    let s = summarize(&ledger);
    assert_eq!(s.total_income.raw(), 2 * MAX_AMOUNT.raw());
    assert_eq!(s.total_expense, MAX_AMOUNT);
    assert_eq!(s.balance, MAX_AMOUNT);

    let h = balance_history(&ledger);
    let running: Vec<i64> = h.iter().map(|p| p.balance.raw()).collect();
    assert_eq!(
        running,
        vec![MAX_AMOUNT.raw(), 2 * MAX_AMOUNT.raw(), MAX_AMOUNT.raw()]
    );
}

#[test]
fn oversized_amount_is_rejected_at_parse() {
    assert!(matches!(
        parse_amount("92233720368547758.07"),
        Err(MoneyError::TooLarge { .. })
    ));
}
