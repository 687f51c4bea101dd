//! Sales analytics - period-windowed revenue totals and chart buckets.
//!
//! Given a named period (today, week, month, 3months, 6months), this module
//! computes the current and previous date windows, sums paid-invoice revenue
//! over both, and buckets the current window into labeled chart points:
//! 4-hour blocks for today, days for a week, 7-day weeks for a month, and
//! calendar months for the quarter/half-year views. Only `paid` invoices
//! count toward sales figures.

use crate::{
    entities::{Invoice, InvoiceStatus, invoice},
    errors::Result,
};
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Chart buckets for the `today` view: six 4-hour blocks plus the last hour.
const TODAY_LABELS: [&str; 7] = ["12AM", "4AM", "8AM", "12PM", "4PM", "8PM", "11PM"];

/// Named analytics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    /// Midnight to now, bucketed by 4-hour blocks
    Today,
    /// Last 7 days, bucketed by day
    Week,
    /// Last 30 days, bucketed by 7-day weeks
    Month,
    /// Last 90 days, bucketed by calendar month
    ThreeMonths,
    /// Last 180 days, bucketed by calendar month
    SixMonths,
}

impl SalesPeriod {
    /// Parses a period name case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "3months" => Some(Self::ThreeMonths),
            "6months" => Some(Self::SixMonths),
            _ => None,
        }
    }

    /// Wire representation of the period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
        }
    }

    /// Whole days the current window spans, counting today.
    const fn window_days(self) -> i64 {
        match self {
            Self::Today => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
        }
    }
}

/// Current and previous analytics windows. Both windows are the same length;
/// the previous one ends where the current one starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodRange {
    /// Start of the current window (midnight, `window_days - 1` days back)
    pub start: DateTime<Utc>,
    /// End of the current window (the `now` it was computed from)
    pub end: DateTime<Utc>,
    /// Start of the comparison window
    pub previous_start: DateTime<Utc>,
    /// End of the comparison window
    pub previous_end: DateTime<Utc>,
}

/// Computes the current and previous windows for a period, anchored at `now`.
#[must_use]
pub fn period_ranges(period: SalesPeriod, now: DateTime<Utc>) -> PeriodRange {
    let midnight = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    let days = period.window_days();
    let start = midnight - Duration::days(days - 1);

    PeriodRange {
        start,
        end: now,
        previous_start: start - Duration::days(days),
        previous_end: start,
    }
}

/// One labeled point of the sales chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Revenue in the bucket, rounded to 2 decimals
    pub value: f64,
    /// Bucket label, e.g. `"Mon"` or `"4PM"` or `"Jun"`
    pub label: String,
}

/// The computed analytics payload for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    /// The period the report covers
    pub period: SalesPeriod,
    /// Paid revenue in the current window
    pub total_sales: f64,
    /// Paid revenue in the previous window, for comparison
    pub previous_total_sales: f64,
    /// Chart buckets covering the current window
    pub data: Vec<ChartPoint>,
    /// The windows the figures were computed over
    pub range: PeriodRange,
}

/// Builds the chart bucket labels for a period starting at `start`.
#[must_use]
pub fn bucket_labels(period: SalesPeriod, start: DateTime<Utc>) -> Vec<String> {
    match period {
        SalesPeriod::Today => TODAY_LABELS.iter().map(ToString::to_string).collect(),
        SalesPeriod::Week => (0..7)
            .map(|i| (start + Duration::days(i)).format("%a").to_string())
            .collect(),
        SalesPeriod::Month => (0..5).map(|i| week_label(start, i)).collect(),
        SalesPeriod::ThreeMonths => month_labels(start, 3),
        SalesPeriod::SixMonths => month_labels(start, 6),
    }
}

/// `"20-26 Jun"`, or `"27 Jun-3 Jul"` when the week crosses a month boundary.
fn week_label(start: DateTime<Utc>, week: i64) -> String {
    let w_start = start + Duration::days(week * 7);
    let w_end = w_start + Duration::days(6);

    if w_start.month() == w_end.month() {
        format!("{}-{} {}", w_start.day(), w_end.day(), w_end.format("%b"))
    } else {
        format!(
            "{} {}-{} {}",
            w_start.day(),
            w_start.format("%b"),
            w_end.day(),
            w_end.format("%b")
        )
    }
}

fn month_labels(start: DateTime<Utc>, count: u32) -> Vec<String> {
    (0..count)
        .map(|i| MONTH_ABBR[((start.month0() + i) % 12) as usize].to_string())
        .collect()
}

/// Maps an invoice timestamp to its chart bucket. Out-of-window stragglers
/// clamp to the last bucket rather than being dropped.
fn bucket_index(period: SalesPeriod, created_at: DateTime<Utc>, start: DateTime<Utc>) -> usize {
    match period {
        SalesPeriod::Today => match created_at.hour() {
            0..=3 => 0,
            4..=7 => 1,
            8..=11 => 2,
            12..=15 => 3,
            16..=19 => 4,
            20..=22 => 5,
            _ => 6,
        },
        SalesPeriod::Week => days_since(created_at, start).min(6),
        SalesPeriod::Month => (days_since(created_at, start) / 7).min(4),
        SalesPeriod::ThreeMonths => month_offset(created_at, start).min(2),
        SalesPeriod::SixMonths => month_offset(created_at, start).min(5),
    }
}

fn days_since(created_at: DateTime<Utc>, start: DateTime<Utc>) -> usize {
    usize::try_from((created_at - start).num_days().max(0)).unwrap_or(0)
}

fn month_offset(created_at: DateTime<Utc>, start: DateTime<Utc>) -> usize {
    let months = (i64::from(created_at.year()) - i64::from(start.year())) * 12
        + (i64::from(created_at.month()) - i64::from(start.month()));
    usize::try_from(months.max(0)).unwrap_or(0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn paid_invoices_between(
    db: &DatabaseConnection,
    business_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .filter(invoice::Column::BusinessId.eq(business_id))
        .filter(invoice::Column::Status.eq(InvoiceStatus::Paid))
        .filter(invoice::Column::CreatedAt.gte(start))
        .filter(invoice::Column::CreatedAt.lte(end))
        .order_by_asc(invoice::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the sales analytics for a business over the given period.
///
/// `now` anchors both windows; it is a parameter so the window arithmetic is
/// deterministic under test. Unpaid and canceled invoices never count.
pub async fn aggregate_sales(
    db: &DatabaseConnection,
    business_id: i64,
    period: SalesPeriod,
    now: DateTime<Utc>,
) -> Result<SalesReport> {
    let range = period_ranges(period, now);

    let current = paid_invoices_between(db, business_id, range.start, range.end).await?;
    let previous =
        paid_invoices_between(db, business_id, range.previous_start, range.previous_end).await?;

    let labels = bucket_labels(period, range.start);
    let mut buckets = vec![0.0_f64; labels.len()];
    let mut total_sales = 0.0;

    for inv in &current {
        total_sales += inv.total_amount;
        let index = bucket_index(period, inv.created_at, range.start);
        if index < buckets.len() {
            buckets[index] += inv.total_amount;
        }
    }

    let previous_total_sales: f64 = previous.iter().map(|inv| inv.total_amount).sum();

    let data = labels
        .into_iter()
        .zip(buckets)
        .map(|(label, value)| ChartPoint {
            value: round2(value),
            label,
        })
        .collect();

    Ok(SalesReport {
        period,
        total_sales: round2(total_sales),
        previous_total_sales: round2(previous_total_sales),
        data,
        range,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{insert_invoice_at, seeded_tenant};

    fn at(value: &str) -> DateTime<Utc> {
        value.parse().unwrap()
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(SalesPeriod::parse("week"), Some(SalesPeriod::Week));
        assert_eq!(SalesPeriod::parse("3MONTHS"), Some(SalesPeriod::ThreeMonths));
        assert_eq!(SalesPeriod::parse("Today"), Some(SalesPeriod::Today));
        assert_eq!(SalesPeriod::parse("year"), None);
    }

    #[test]
    fn test_period_ranges_today() {
        let range = period_ranges(SalesPeriod::Today, at("2024-06-15T18:00:00Z"));
        assert_eq!(range.start, at("2024-06-15T00:00:00Z"));
        assert_eq!(range.end, at("2024-06-15T18:00:00Z"));
        assert_eq!(range.previous_start, at("2024-06-14T00:00:00Z"));
        assert_eq!(range.previous_end, at("2024-06-15T00:00:00Z"));
    }

    #[test]
    fn test_period_ranges_week() {
        let range = period_ranges(SalesPeriod::Week, at("2024-06-15T18:00:00Z"));
        assert_eq!(range.start, at("2024-06-09T00:00:00Z"));
        assert_eq!(range.previous_start, at("2024-06-02T00:00:00Z"));
        assert_eq!(range.previous_end, range.start);
    }

    #[test]
    fn test_period_ranges_month_spans_thirty_days() {
        let range = period_ranges(SalesPeriod::Month, at("2024-06-15T18:00:00Z"));
        assert_eq!(range.start, at("2024-05-17T00:00:00Z"));
        assert_eq!(range.previous_start, at("2024-04-17T00:00:00Z"));
    }

    #[test]
    fn test_week_labels_follow_weekdays() {
        // 2024-06-09 is a Sunday
        let labels = bucket_labels(SalesPeriod::Week, at("2024-06-09T00:00:00Z"));
        assert_eq!(labels, ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    }

    #[test]
    fn test_today_labels_are_hour_blocks() {
        let labels = bucket_labels(SalesPeriod::Today, at("2024-06-09T00:00:00Z"));
        assert_eq!(labels, ["12AM", "4AM", "8AM", "12PM", "4PM", "8PM", "11PM"]);
    }

    #[test]
    fn test_month_week_labels_cross_month_boundary() {
        let labels = bucket_labels(SalesPeriod::Month, at("2024-06-20T00:00:00Z"));
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], "20-26 Jun");
        assert_eq!(labels[1], "27 Jun-3 Jul");
        assert_eq!(labels[4], "18-24 Jul");
    }

    #[test]
    fn test_month_labels_wrap_the_year() {
        let labels = bucket_labels(SalesPeriod::ThreeMonths, at("2023-11-05T00:00:00Z"));
        assert_eq!(labels, ["Nov", "Dec", "Jan"]);

        let labels = bucket_labels(SalesPeriod::SixMonths, at("2024-01-10T00:00:00Z"));
        assert_eq!(labels, ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]);
    }

    #[test]
    fn test_today_bucket_hour_boundaries() {
        let start = at("2024-06-15T00:00:00Z");
        let cases = [
            ("2024-06-15T00:00:00Z", 0),
            ("2024-06-15T03:59:00Z", 0),
            ("2024-06-15T04:00:00Z", 1),
            ("2024-06-15T11:59:00Z", 2),
            ("2024-06-15T12:00:00Z", 3),
            ("2024-06-15T19:59:00Z", 4),
            ("2024-06-15T20:00:00Z", 5),
            ("2024-06-15T22:59:00Z", 5),
            ("2024-06-15T23:00:00Z", 6),
        ];
        for (timestamp, expected) in cases {
            assert_eq!(
                bucket_index(SalesPeriod::Today, at(timestamp), start),
                expected,
                "hour bucket for {timestamp}"
            );
        }
    }

    #[test]
    fn test_week_bucket_day_boundaries() {
        let start = at("2024-06-09T00:00:00Z");
        assert_eq!(bucket_index(SalesPeriod::Week, start, start), 0);
        assert_eq!(
            bucket_index(SalesPeriod::Week, at("2024-06-09T23:59:00Z"), start),
            0
        );
        assert_eq!(
            bucket_index(SalesPeriod::Week, at("2024-06-10T00:00:00Z"), start),
            1
        );
        assert_eq!(
            bucket_index(SalesPeriod::Week, at("2024-06-15T12:00:00Z"), start),
            6
        );
        // Stragglers past the window clamp to the last bucket
        assert_eq!(
            bucket_index(SalesPeriod::Week, at("2024-06-20T12:00:00Z"), start),
            6
        );
    }

    #[test]
    fn test_month_bucket_week_boundaries() {
        let start = at("2024-06-01T00:00:00Z");
        assert_eq!(
            bucket_index(SalesPeriod::Month, at("2024-06-07T23:00:00Z"), start),
            0
        );
        assert_eq!(
            bucket_index(SalesPeriod::Month, at("2024-06-08T00:00:00Z"), start),
            1
        );
        assert_eq!(
            bucket_index(SalesPeriod::Month, at("2024-06-30T12:00:00Z"), start),
            4
        );
    }

    #[test]
    fn test_calendar_month_bucket_clamps() {
        let start = at("2024-04-05T00:00:00Z");
        assert_eq!(
            bucket_index(SalesPeriod::ThreeMonths, at("2024-04-20T00:00:00Z"), start),
            0
        );
        assert_eq!(
            bucket_index(SalesPeriod::ThreeMonths, at("2024-05-01T00:00:00Z"), start),
            1
        );
        assert_eq!(
            bucket_index(SalesPeriod::ThreeMonths, at("2024-06-30T00:00:00Z"), start),
            2
        );
        // A row dated after the window still lands in the last bucket
        assert_eq!(
            bucket_index(SalesPeriod::ThreeMonths, at("2024-09-01T00:00:00Z"), start),
            2
        );
    }

    #[tokio::test]
    async fn test_aggregate_sales_totals_and_buckets() -> Result<()> {
        let (db, business, user) = seeded_tenant().await?;
        let now = at("2024-06-15T18:00:00Z");

        // Current week: 2024-06-09 .. now
        insert_invoice_at(&db, &business, &user, 100.0, InvoiceStatus::Paid,
            "2024-06-09T12:00:00Z").await?;
        insert_invoice_at(&db, &business, &user, 50.0, InvoiceStatus::Paid,
            "2024-06-15T12:00:00Z").await?;
        // Unpaid revenue never counts
        insert_invoice_at(&db, &business, &user, 999.0, InvoiceStatus::Unpaid,
            "2024-06-10T12:00:00Z").await?;
        // Previous week: 2024-06-02 .. 2024-06-09
        insert_invoice_at(&db, &business, &user, 25.0, InvoiceStatus::Paid,
            "2024-06-05T12:00:00Z").await?;

        let report = aggregate_sales(&db, business.id, SalesPeriod::Week, now).await?;

        assert_eq!(report.total_sales, 150.0);
        assert_eq!(report.previous_total_sales, 25.0);
        assert_eq!(report.data.len(), 7);
        assert_eq!(report.data[0].value, 100.0);
        assert_eq!(report.data[6].value, 50.0);
        assert_eq!(report.data[1].value, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_sales_rounds_to_two_decimals() -> Result<()> {
        let (db, business, user) = seeded_tenant().await?;
        let now = at("2024-06-15T18:00:00Z");

        insert_invoice_at(&db, &business, &user, 10.004, InvoiceStatus::Paid,
            "2024-06-15T12:00:00Z").await?;
        insert_invoice_at(&db, &business, &user, 10.004, InvoiceStatus::Paid,
            "2024-06-15T13:00:00Z").await?;

        let report = aggregate_sales(&db, business.id, SalesPeriod::Week, now).await?;
        assert_eq!(report.total_sales, 20.01);
        assert_eq!(report.data[6].value, 20.01);

        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_sales_empty_business() -> Result<()> {
        let (db, business, _user) = seeded_tenant().await?;

        let report =
            aggregate_sales(&db, business.id, SalesPeriod::Month, at("2024-06-15T18:00:00Z"))
                .await?;
        assert_eq!(report.total_sales, 0.0);
        assert_eq!(report.previous_total_sales, 0.0);
        assert!(report.data.iter().all(|point| point.value == 0.0));

        Ok(())
    }
}
