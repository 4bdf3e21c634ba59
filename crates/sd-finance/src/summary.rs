//! Read-only aggregations over the transaction list.
//!
//! Nothing here reconciles against a bank; totals are plain sums over what
//! the studio recorded.

use chrono::{DateTime, Utc};
use sd_schemas::{Transaction, TransactionKind};
use serde::{Deserialize, Serialize};

use crate::fixedpoint::Cents;

/// Which side of the ledger to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(KindFilter::All),
            "income" => Some(KindFilter::Income),
            "expense" => Some(KindFilter::Expense),
            _ => None,
        }
    }

    pub fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == TransactionKind::Income,
            KindFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub total_income: Cents,
    pub total_expense: Cents,
    /// `total_income - total_expense`; may be negative.
    pub balance: Cents,
}

/// One point of the running-balance series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: DateTime<Utc>,
    pub description: String,
    /// Positive for income, negative for expense.
    pub signed_amount: Cents,
    pub balance: Cents,
}

/// Transaction amount with income positive and expense negative.
pub fn signed_amount(t: &Transaction) -> Cents {
    let amount = Cents::new(t.amount_cents);
    match t.kind {
        TransactionKind::Income => amount,
        TransactionKind::Expense => -amount,
    }
}

fn total_of(transactions: &[Transaction], kind: TransactionKind) -> Cents {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| Cents::new(t.amount_cents))
        .sum()
}

pub fn summarize(transactions: &[Transaction]) -> FinanceSummary {
    let total_income = total_of(transactions, TransactionKind::Income);
    let total_expense = total_of(transactions, TransactionKind::Expense);
    FinanceSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}

/// Transactions matching `filter`, in recorded order.
pub fn filter_by_kind(transactions: &[Transaction], filter: KindFilter) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| filter.matches(t.kind))
        .cloned()
        .collect()
}

/// Running balance over transactions sorted ascending by date.
///
/// The sort is stable, so same-day transactions keep recorded order.
pub fn balance_history(transactions: &[Transaction]) -> Vec<BalancePoint> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut acc = Cents::ZERO;
    sorted
        .into_iter()
        .map(|t| {
            let signed = signed_amount(t);
            acc += signed;
            BalancePoint {
                date: t.date,
                description: t.description.clone(),
                signed_amount: signed,
                balance: acc,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_filter_parse() {
        assert_eq!(KindFilter::parse("INCOME"), Some(KindFilter::Income));
        assert_eq!(KindFilter::parse("all"), Some(KindFilter::All));
        assert_eq!(KindFilter::parse("refund"), None);
    }

    #[test]
    fn empty_list_summarizes_to_zero() {
        let s = summarize(&[]);
        assert_eq!(s.total_income, Cents::ZERO);
        assert_eq!(s.balance, Cents::ZERO);
        assert!(balance_history(&[]).is_empty());
    }
}
