use crate::ledger::Ledger;

/// Totals for one category, in ledger order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// The ledger holds no transactions at all.
    NoTransactions,
    Totals {
        per_category: Vec<CategoryTotal>,
        grand_total: f64,
        /// Records left out because their amount is not a number.
        skipped: usize,
    },
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(ledger: &Ledger) -> Summary {
        if ledger.transaction_count() == 0 {
            return Summary::NoTransactions;
        }

        let mut skipped = 0;
        let per_category: Vec<CategoryTotal> = ledger
            .categories()
            .map(|(category, txns)| {
                let mut total = 0.0;
                for txn in txns {
                    match txn.amount.numeric() {
                        Some(value) => total += value,
                        None => skipped += 1,
                    }
                }
                CategoryTotal {
                    category: category.to_string(),
                    total,
                    count: txns.len(),
                }
            })
            .collect();
        let grand_total = per_category.iter().map(|entry| entry.total).sum();

        Summary::Totals {
            per_category,
            grand_total,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Amount, Transaction};

    #[test]
    fn empty_ledger_reports_no_transactions() {
        assert_eq!(SummaryService::summarize(&Ledger::new()), Summary::NoTransactions);

        let mut only_empty = Ledger::new();
        only_empty.push("Food", Transaction::new(1.0, "2024-01-01"));
        let mut emptied = only_empty.clone();
        emptied.remove_transaction_at(0, 0).unwrap();
        assert_eq!(SummaryService::summarize(&emptied), Summary::NoTransactions);
    }

    #[test]
    fn totals_follow_ledger_order() {
        let mut ledger = Ledger::new();
        ledger.push("Rent", Transaction::new(900.0, "2024-01-01"));
        ledger.push("Food", Transaction::new(10.0, "2024-01-05"));
        ledger.push("Food", Transaction::new(5.5, "2024-02-01"));

        let Summary::Totals {
            per_category,
            grand_total,
            skipped,
        } = SummaryService::summarize(&ledger)
        else {
            panic!("expected totals");
        };
        assert_eq!(
            per_category,
            vec![
                CategoryTotal {
                    category: "Rent".into(),
                    total: 900.0,
                    count: 1
                },
                CategoryTotal {
                    category: "Food".into(),
                    total: 15.5,
                    count: 2
                },
            ]
        );
        assert_eq!(grand_total, 915.5);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn non_numeric_amounts_are_skipped_and_counted() {
        let mut ledger = Ledger::new();
        ledger.push("Food", Transaction::new(4.0, "2024-01-05"));
        ledger.push(
            "Food",
            Transaction {
                amount: Amount::Raw(serde_json::Value::Null),
                date: "2024-01-06".into(),
            },
        );
        let Summary::Totals {
            grand_total,
            skipped,
            ..
        } = SummaryService::summarize(&ledger)
        else {
            panic!("expected totals");
        };
        assert_eq!(grand_total, 4.0);
        assert_eq!(skipped, 1);
    }
}
