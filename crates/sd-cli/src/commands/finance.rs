use anyhow::Result;
use sd_finance::{balance_history, filter_by_kind, signed_amount, summarize, KindFilter};
use serde::Serialize;

use super::{print_json, Session};

pub fn parse_kind(s: &str) -> Result<KindFilter, String> {
    KindFilter::parse(s).ok_or_else(|| format!("expected all | income | expense, got '{s}'"))
}

#[derive(Serialize)]
struct FinanceReport {
    summary: sd_finance::FinanceSummary,
    transactions: Vec<sd_schemas::Transaction>,
    history: Vec<sd_finance::BalancePoint>,
}

pub fn show(session: &Session, kind: KindFilter, json: bool) -> Result<()> {
    let all = session.store.transactions();
    let summary = summarize(all);
    let listed = filter_by_kind(all, kind);

    if json {
        return print_json(&FinanceReport {
            summary,
            transactions: listed,
            history: balance_history(all),
        });
    }

    println!("income   {:>12}", summary.total_income.to_string());
    println!("expense  {:>12}", summary.total_expense.to_string());
    println!("balance  {:>12}", summary.balance.to_string());
    println!();

    for t in &listed {
        println!(
            "{}  {:<32} {:<12} {:>12}",
            t.date.format("%Y-%m-%d"),
            t.description,
            t.category,
            signed_amount(t).to_string()
        );
    }
    Ok(())
}
