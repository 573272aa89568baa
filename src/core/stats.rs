//! Statistics aggregation business logic.
//!
//! Pure transformations from a habit list to chart-ready bucketed counts.
//! Given the same `(habits, window, offset, today)` input the output is always
//! identical: no clocks, no I/O, no hidden state. The UI layer only supplies
//! the reference date and renders the returned series and labels.

use crate::entities::habit;
use chrono::{Datelike, Duration, Months, NaiveDate};

/// Time window a chart aggregates over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window {
    /// Monday-based week, 7 day buckets
    #[default]
    Weekly,
    /// Calendar month split into 4 buckets of up to 7 days
    Monthly,
    /// The trailing 12 months ending at the reference date
    Yearly,
}

/// Chart-ready aggregation output: one count per bucket, one label per
/// bucket, and a heading describing the covered range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityChart {
    /// Completion count per bucket
    pub series: Vec<u32>,
    /// X-axis label per bucket
    pub labels: Vec<String>,
    /// Human-readable description of the covered range
    pub range_label: String,
}

/// Per-category slice of the habit list.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// Category name
    pub category: String,
    /// Number of habits in the category
    pub count: usize,
    /// Fraction of all habits, 0.0 through 1.0
    pub share: f64,
}

/// Headline numbers for the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    /// All-time count of completed-date entries across every habit
    pub total_completed: usize,
    /// Highest streak among the habits, 0 when the list is empty
    pub best_streak: i32,
    /// Category distribution, largest group first
    pub categories: Vec<CategoryShare>,
}

/// Shifts a date by whole months in either direction.
fn shift_months(date: NaiveDate, offset: i32) -> NaiveDate {
    if offset >= 0 {
        date + Months::new(offset.unsigned_abs())
    } else {
        date - Months::new(offset.unsigned_abs())
    }
}

/// Number of days in the month containing `date`.
fn days_in_month(date: NaiveDate) -> u32 {
    // Day 1 exists in every month
    let first = date.with_day(1).unwrap_or(date);
    (shift_months(first, 1) - Duration::days(1)).day()
}

/// Number of habits whose ledger contains the given ISO date.
fn habits_completed_on(habits: &[habit::Model], date_str: &str) -> u32 {
    u32::try_from(
        habits
            .iter()
            .filter(|h| h.completed_dates.contains(date_str))
            .count(),
    )
    .unwrap_or(u32::MAX)
}

/// Aggregates a habit list into a chart for the selected window.
///
/// * `Weekly` - the week of `today` shifted by `offset` weeks, Monday first;
///   each bucket counts the habits completed on that day.
/// * `Monthly` - the month of `today` shifted by `offset` months, split into
///   buckets covering days 1-7, 8-14, 15-21, and 22 through month end.
/// * `Yearly` - the 12 months ending at `today`; `offset` is ignored and each
///   bucket counts every ledger entry with a matching year-month prefix.
///
/// A series that would come out empty is replaced by a single zero bucket with
/// an empty label so charting front ends always have at least one point.
#[must_use]
pub fn aggregate(
    habits: &[habit::Model],
    window: Window,
    offset: i32,
    today: NaiveDate,
) -> ActivityChart {
    let mut series = Vec::new();
    let mut labels = Vec::new();
    let range_label;

    match window {
        Window::Weekly => {
            let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
                + Duration::weeks(i64::from(offset));
            let sunday = monday + Duration::days(6);
            range_label = format!("{} - {}", monday.format("%-d %b"), sunday.format("%-d %b"));

            for day in 0..7 {
                let date = monday + Duration::days(day);
                let date_str = date.format("%Y-%m-%d").to_string();
                series.push(habits_completed_on(habits, &date_str));
                labels.push(date.format("%a").to_string());
            }
        }
        Window::Monthly => {
            let target = shift_months(today, offset);
            range_label = target.format("%B %Y").to_string();
            let month_len = days_in_month(target);

            for week in 0..4u32 {
                let start_day = week * 7 + 1;
                if start_day > month_len {
                    continue;
                }
                let end_day = (week * 7 + 7).min(month_len);
                let mut count = 0;
                for day in start_day..=end_day {
                    if let Some(date) = target.with_day(day) {
                        let date_str = date.format("%Y-%m-%d").to_string();
                        count += habits_completed_on(habits, &date_str);
                    }
                }
                series.push(count);
                labels.push(format!("{}.Wk", week + 1));
            }
        }
        Window::Yearly => {
            range_label = "Last 12 months".to_string();
            for months_back in (0..12).rev() {
                let month = shift_months(today, -months_back);
                let prefix = month.format("%Y-%m").to_string();
                let count = habits
                    .iter()
                    .flat_map(|h| h.completed_dates.0.iter())
                    .filter(|d| d.starts_with(&prefix))
                    .count();
                series.push(u32::try_from(count).unwrap_or(u32::MAX));
                labels.push(month.format("%b").to_string());
            }
        }
    }

    if series.is_empty() {
        series.push(0);
        labels.push(String::new());
    }

    ActivityChart {
        series,
        labels,
        range_label,
    }
}

/// Computes headline statistics over the full habit list.
///
/// The category distribution is returned largest group first with name as the
/// tie breaker, so identical input always produces identical ordering.
#[must_use]
pub fn summarize(habits: &[habit::Model]) -> StatsSummary {
    let total_completed = habits.iter().map(|h| h.completed_dates.0.len()).sum();
    let best_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);

    let mut counts: Vec<(String, usize)> = Vec::new();
    for habit in habits {
        match counts.iter_mut().find(|(name, _)| *name == habit.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((habit.category.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let total = habits.len().max(1);
    #[allow(clippy::cast_precision_loss)]
    let categories = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            share: count as f64 / total as f64,
        })
        .collect();

    StatsSummary {
        total_completed,
        best_streak,
        categories,
    }
}

/// Navigation state for the statistics screen: which window is shown and how
/// far it has been stepped away from the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSelection {
    /// Currently selected window kind
    pub window: Window,
    /// Navigation offset, 0 = current window, negative = past
    pub offset: i32,
}

impl StatsSelection {
    /// Starts at the current week.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a window kind. Switching always resets the offset to 0, and
    /// the yearly window keeps it pinned there.
    pub fn select_window(&mut self, window: Window) {
        self.window = window;
        self.offset = 0;
    }

    /// Steps the window backwards or forwards. Ignored for the yearly window,
    /// which always covers the trailing 12 months.
    pub fn step(&mut self, delta: i32) {
        if self.window != Window::Yearly {
            self.offset += delta;
        }
    }

    /// Renders the chart for the current selection.
    #[must_use]
    pub fn chart(&self, habits: &[habit::Model], today: NaiveDate) -> ActivityChart {
        aggregate(habits, self.window, self.offset, today)
    }
}
