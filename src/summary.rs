//! Dashboard summarization engine
//!
//! Pure functions from `(records, reference date, window length)` to
//! chart-ready series. No clock reads, no I/O, no shared state: calling
//! any of these twice with the same inputs yields identical output, and
//! totals do not depend on the order of the input collections.
//!
//! The trailing window is strictly `[now - (window_days - 1), now]`, both
//! endpoints inclusive. Records dated after the reference date are outside
//! the window and do not contribute; this keeps the daily series at exactly
//! `window_days` dense buckets no matter the input.

use std::ops;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::util::{Amount, Date, StoreTotals, Transaction};

/// Length of the trailing daily expense window
pub const EXPENSE_WINDOW_DAYS: usize = 30;
/// Length of the trailing income-by-category window
pub const INCOME_WINDOW_DAYS: usize = 60;
/// Category attributed to records with an absent or empty category
pub const FALLBACK_CATEGORY: &str = "Other";

/// Total for one calendar day of the trailing window
///
/// Serializes with the day-granularity `MM-DD` label as its date key,
/// which is what charting frontends expect.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub date: Date,
    pub total: Amount,
}

impl Serialize for DailyBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = serializer.serialize_struct("DailyBucket", 2)?;
        st.serialize_field("date", &self.date.label())?;
        st.serialize_field("total", &self.total)?;
        st.end()
    }
}

/// Windowed total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub total: Amount,
}

/// Lifetime income/expense totals and their difference
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub balance: Amount,
}

/// Dense day-keyed accumulator over a fixed window
///
/// One bucket per calendar day, pre-initialized to zero so that days
/// without records still appear in the output.
struct DaySeries {
    start: Date,
    end: Date,
    base: usize,
    buckets: Vec<DailyBucket>,
}

impl DaySeries {
    /// `window_days` consecutive days ending on (and including) `now`
    fn trailing(now: Date, window_days: usize) -> Self {
        let start = now.jump_day(-(window_days as isize - 1));
        let mut buckets = Vec::with_capacity(window_days);
        let mut day = start;
        for _ in 0..window_days {
            buckets.push(DailyBucket {
                date: day,
                total: Amount::ZERO,
            });
            day = day.next();
        }
        Self {
            start,
            end: now,
            base: start.index(),
            buckets,
        }
    }
}

impl ops::AddAssign<&Transaction> for DaySeries {
    fn add_assign(&mut self, tx: &Transaction) {
        let date = match tx.date {
            Some(date) => date,
            None => return,
        };
        if date < self.start || date > self.end {
            return;
        }
        self.buckets[date.index() - self.base].total += tx.amount.unwrap_or(Amount::ZERO);
    }
}

/// Category-keyed accumulator over a fixed window, first-seen order
struct Breakdown {
    start: Date,
    end: Date,
    buckets: Vec<CategoryBucket>,
}

impl ops::AddAssign<&Transaction> for Breakdown {
    fn add_assign(&mut self, tx: &Transaction) {
        let date = match tx.date {
            Some(date) => date,
            None => return,
        };
        if date < self.start || date > self.end {
            return;
        }
        let category = normalize_category(tx.category.as_deref());
        let amount = tx.amount.unwrap_or(Amount::ZERO);
        match self.buckets.iter_mut().find(|b| b.category == category) {
            Some(bucket) => bucket.total += amount,
            None => self.buckets.push(CategoryBucket {
                category: category.to_string(),
                total: amount,
            }),
        }
    }
}

/// Map an absent or empty category label to the canonical fallback
pub fn normalize_category(raw: Option<&str>) -> &str {
    match raw {
        Some(s) if !s.is_empty() => s,
        _ => FALLBACK_CATEGORY,
    }
}

/// Trailing daily expense series: one zero-filled bucket per calendar day
/// of the window, ascending, exactly `window_days` entries
pub fn daily_expense_flow(
    records: &[Transaction],
    now: Date,
    window_days: usize,
) -> Vec<DailyBucket> {
    if window_days == 0 {
        return Vec::new();
    }
    let mut series = DaySeries::trailing(now, window_days);
    for tx in records {
        series += tx;
    }
    series.buckets
}

/// Trailing income totals grouped by normalized category, in first-seen
/// order; categories without windowed records do not appear
pub fn income_by_category(
    records: &[Transaction],
    now: Date,
    window_days: usize,
) -> Vec<CategoryBucket> {
    if window_days == 0 {
        return Vec::new();
    }
    let mut breakdown = Breakdown {
        start: now.jump_day(-(window_days as isize - 1)),
        end: now,
        buckets: Vec::new(),
    };
    for tx in records {
        breakdown += tx;
    }
    breakdown.buckets
}

/// Financial overview triple from the store's pre-aggregated totals
///
/// Balances may come out negative; they are passed through unclamped.
pub fn overview(total_income: Amount, total_expense: Amount) -> Overview {
    Overview {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}

/// The full dashboard payload, ready for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub overview: Overview,
    pub daily_expenses: Vec<DailyBucket>,
    pub income_by_category: Vec<CategoryBucket>,
    pub recent_income: Vec<Transaction>,
    pub recent_expenses: Vec<Transaction>,
}

impl Dashboard {
    /// Assemble every dashboard series from one snapshot of the store
    pub fn assemble(
        income: &[Transaction],
        expenses: &[Transaction],
        totals: &StoreTotals,
        now: Date,
        expense_days: usize,
        income_days: usize,
    ) -> Self {
        Self {
            overview: overview(totals.total_income, totals.total_expense),
            daily_expenses: daily_expense_flow(expenses, now, expense_days),
            income_by_category: income_by_category(income, now, income_days),
            recent_income: totals.recent_income.clone(),
            recent_expenses: totals.recent_expenses.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tx(date: &str, amount: &str, category: Option<&str>) -> Transaction {
        Transaction {
            date: date.parse().ok(),
            amount: amount.parse().ok(),
            category: category.map(str::to_string),
            ..Transaction::default()
        }
    }

    fn day(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn cents(series: &[DailyBucket]) -> Vec<i64> {
        series.iter().map(|b| b.total.cents()).collect()
    }

    #[test]
    fn three_day_example() {
        let now = day("2024-03-10");
        let expenses = [tx("2024-03-09", "20", None), tx("2024-03-08", "5", None)];
        let series = daily_expense_flow(&expenses, now, 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, day("2024-03-08"));
        assert_eq!(cents(&series), vec![500, 2000, 0]);
    }

    #[test]
    fn sixty_day_category_example() {
        let now = day("2024-03-10");
        let income = [
            tx("2024-02-01", "100", Some("Salary")),
            tx("2024-03-01", "50", Some("")),
        ];
        let buckets = income_by_category(&income, now, 60);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].category, "Salary");
        assert_eq!(buckets[0].total, Amount::from_cents(10000));
        assert_eq!(buckets[1].category, "Other");
        assert_eq!(buckets[1].total, Amount::from_cents(5000));
    }

    #[test]
    fn empty_input_yields_zero_window() {
        let series = daily_expense_flow(&[], day("2024-03-10"), 30);
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|b| b.total == Amount::ZERO));
        assert!(income_by_category(&[], day("2024-03-10"), 60).is_empty());
    }

    #[test]
    fn overview_subtraction() {
        let o = overview(Amount::from_cents(120000), Amount::from_cents(150000));
        assert_eq!(o.balance, Amount::from_cents(-30000));
    }

    #[test]
    fn density_and_order() {
        let now = day("2024-03-10");
        let expenses = [
            tx("2024-02-15", "1", None),
            tx("2024-03-10", "2", None),
            tx("2024-02-10", "4", None),
        ];
        let series = daily_expense_flow(&expenses, now, 30);
        assert_eq!(series.len(), 30);
        assert_eq!(series[0].date, day("2024-02-10"));
        assert_eq!(series[29].date, now);
        for pair in series.windows(2) {
            assert_eq!(pair[0].date.next(), pair[1].date);
        }
    }

    #[test]
    fn conservation() {
        let now = day("2024-03-10");
        let expenses = [
            tx("2024-02-09", "100", None), // day before the cutoff
            tx("2024-02-10", "3", None),   // exactly on the cutoff
            tx("2024-03-10", "7", None),   // exactly on now
            tx("2024-03-01", "1.50", None),
        ];
        let series = daily_expense_flow(&expenses, now, 30);
        let total: i64 = cents(&series).iter().sum();
        assert_eq!(total, 300 + 700 + 150);
    }

    #[test]
    fn order_independence() {
        let now = day("2024-03-10");
        let mut expenses = vec![
            tx("2024-03-09", "20", None),
            tx("2024-03-08", "5", None),
            tx("2024-03-08", "2.50", None),
            tx("2024-02-20", "11", None),
        ];
        let forward = daily_expense_flow(&expenses, now, 30);
        expenses.reverse();
        let backward = daily_expense_flow(&expenses, now, 30);
        assert_eq!(forward, backward);
        // and twice over the same input is bit-identical
        assert_eq!(forward, daily_expense_flow(&expenses, now, 30));
    }

    #[test]
    fn future_dates_are_outside_the_window() {
        let now = day("2024-03-10");
        let expenses = [tx("2024-03-11", "99", None), tx("2024-03-10", "1", None)];
        let series = daily_expense_flow(&expenses, now, 3);
        assert_eq!(series.len(), 3);
        assert_eq!(cents(&series).iter().sum::<i64>(), 100);

        let income = [tx("2024-03-11", "99", Some("Salary"))];
        assert!(income_by_category(&income, now, 60).is_empty());
    }

    #[test]
    fn category_partition() {
        let now = day("2024-03-10");
        let income = [
            tx("2024-03-01", "100", Some("Salary")),
            tx("2024-03-02", "25", Some("Freelance")),
            tx("2024-03-03", "75", Some("Salary")),
            tx("2024-01-01", "999", Some("Salary")), // outside the window
        ];
        let buckets = income_by_category(&income, now, 60);
        let total: i64 = buckets.iter().map(|b| b.total.cents()).sum();
        assert_eq!(total, 20000);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].category, "Salary");
        assert_eq!(buckets[0].total, Amount::from_cents(17500));
    }

    #[test]
    fn malformed_records_are_zero_contribution() {
        let now = day("2024-03-10");
        // unusable date: skipped entirely
        let series = daily_expense_flow(&[tx("someday", "40", None)], now, 30);
        assert_eq!(cents(&series).iter().sum::<i64>(), 0);
        // unusable amount: the day still exists, the category still registers
        let income = [tx("2024-03-01", "whoops", Some("Gift"))];
        let buckets = income_by_category(&income, now, 60);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].category, "Gift");
        assert_eq!(buckets[0].total, Amount::ZERO);
    }

    #[test]
    fn zero_window_degrades_to_empty() {
        let now = day("2024-03-10");
        assert!(daily_expense_flow(&[tx("2024-03-10", "5", None)], now, 0).is_empty());
        assert!(income_by_category(&[tx("2024-03-10", "5", None)], now, 0).is_empty());
    }

    #[test]
    fn window_crosses_leap_february() {
        let now = day("2024-03-10");
        let series = daily_expense_flow(&[], now, 30);
        assert_eq!(series[0].date, day("2024-02-10"));
        assert!(series.iter().any(|b| b.date == day("2024-02-29")));
    }

    #[test]
    fn chart_ready_serialization() {
        let series = daily_expense_flow(&[tx("2024-03-09", "20", None)], day("2024-03-10"), 2);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"date": "03-09", "total": 20.0},
                {"date": "03-10", "total": 0.0},
            ])
        );
    }
}
