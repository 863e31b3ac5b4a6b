//! # Dashboard Aggregation
//!
//! Buckets a flat list of sales into fixed time windows and computes
//! trend deltas between adjacent buckets.
//!
//! ## Bucketing model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Daily window (30 buckets, ending at "now")                 │
//! │                                                                         │
//! │  [d-29] [d-28] [d-27]  ...  [d-2] [d-1] [today]                         │
//! │    │      │      │            │     │      │                            │
//! │    └──────┴──────┴── each bucket = [start of day, end of day] ──┘       │
//! │                                                                         │
//! │  Membership: strictly AFTER start AND strictly BEFORE end.              │
//! │  A sale timestamp exactly on a boundary can drop out of both            │
//! │  neighboring buckets. Known edge case, preserved as-is.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Weeks start on Sunday. Malformed sale timestamps are logged and the
//! record is skipped; the aggregation always completes with partial data.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Sale;

// =============================================================================
// Period
// =============================================================================

/// Aggregation window granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// Fixed number of buckets rendered for this granularity.
    #[inline]
    pub const fn bucket_count(&self) -> usize {
        match self {
            Period::Day => 30,
            Period::Week => 8,
            Period::Month => 12,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        })
    }
}

// =============================================================================
// Bucket
// =============================================================================

/// Aggregates for one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    /// Display label: `DD/MM`, `Sem N` or `MMM/YY`.
    pub label: String,
    pub sales_count: usize,
    pub revenue: f64,
    /// Distinct product ids appearing across the bucket's line items.
    pub distinct_products: usize,
    /// Distinct client ids across the bucket's sales.
    pub distinct_clients: usize,
}

// =============================================================================
// Bucketing
// =============================================================================

/// Buckets sales into the fixed window for `period`, ending now.
pub fn bucket_sales(sales: &[Sale], period: Period) -> Vec<TrendBucket> {
    bucket_sales_at(sales, period, Utc::now())
}

/// Buckets sales into the fixed window ending at `now`.
///
/// Buckets come back oldest-first, contiguous and non-overlapping
/// (modulo the boundary edge case described in the module docs), with
/// exactly [`Period::bucket_count`] entries.
pub fn bucket_sales_at(sales: &[Sale], period: Period, now: DateTime<Utc>) -> Vec<TrendBucket> {
    // Parse every timestamp once; a malformed record drops out here
    // instead of aborting the whole computation.
    let dated: Vec<(DateTime<Utc>, &Sale)> = sales
        .iter()
        .filter_map(|sale| match sale.fecha_parsed() {
            Some(ts) => Some((ts, sale)),
            None => {
                tracing::warn!(sale_id = sale.id, fecha = %sale.fecha, "skipping sale with unparseable date");
                None
            }
        })
        .collect();

    let count = period.bucket_count();
    let mut buckets = Vec::with_capacity(count);

    for i in (0..count).rev() {
        let (start, end, label) = bucket_bounds(period, now, i as i64);

        let mut revenue = 0.0;
        let mut sales_count = 0;
        let mut product_ids: HashSet<i64> = HashSet::new();
        let mut client_ids: HashSet<i64> = HashSet::new();

        for (_, sale) in dated.iter().filter(|(ts, _)| *ts > start && *ts < end) {
            sales_count += 1;
            revenue += sale.total;
            client_ids.insert(sale.cliente_id);
            for detalle in &sale.detalles {
                product_ids.insert(detalle.producto_id);
            }
        }

        buckets.push(TrendBucket {
            label,
            sales_count,
            revenue,
            distinct_products: product_ids.len(),
            distinct_clients: client_ids.len(),
        });
    }

    buckets
}

/// Half-open-ish bounds for the bucket `offset` periods before `now`,
/// plus its display label.
fn bucket_bounds(period: Period, now: DateTime<Utc>, offset: i64) -> (DateTime<Utc>, DateTime<Utc>, String) {
    match period {
        Period::Day => {
            let day = (now - Duration::days(offset)).date_naive();
            let start = start_of_day(day);
            let end = start + Duration::days(1) - Duration::milliseconds(1);
            (start, end, day.format("%d/%m").to_string())
        }
        Period::Week => {
            let anchor = (now - Duration::weeks(offset)).date_naive();
            let back = anchor.weekday().num_days_from_sunday() as i64;
            let week_start = anchor - Duration::days(back);
            let start = start_of_day(week_start);
            let end = start + Duration::days(7) - Duration::milliseconds(1);
            (start, end, format!("Sem {}", week_number(anchor)))
        }
        Period::Month => {
            let anchor = now
                .checked_sub_months(Months::new(offset as u32))
                .unwrap_or(now)
                .date_naive();
            let first = anchor.with_day(1).unwrap_or(anchor);
            let next = first
                .checked_add_months(Months::new(1))
                .unwrap_or(first + Duration::days(31));
            let start = start_of_day(first);
            let end = start_of_day(next) - Duration::milliseconds(1);
            (start, end, first.format("%b/%y").to_string())
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).expect("midnight always exists"))
}

/// Week-of-year used in weekly labels: days elapsed since January 1st,
/// shifted by January 1st's weekday, divided into seven-day slots.
fn week_number(date: NaiveDate) -> i64 {
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("january 1st always exists");
    let past_days = (date - jan1).num_days();
    let jan1_dow = jan1.weekday().num_days_from_sunday() as i64;
    // ceil((past_days + jan1_dow + 1) / 7)
    (past_days + jan1_dow + 1 + 6) / 7
}

// =============================================================================
// Trend Deltas
// =============================================================================

/// Percent change between two adjacent buckets.
///
/// A zero previous bucket would divide by zero; it reports 100% when the
/// current bucket has value, 0% when both are empty.
pub fn trend_delta(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        ((current - previous) / previous) * 100.0
    }
}

/// Delta of `metric` between the two most recent buckets.
pub fn latest_delta<F>(buckets: &[TrendBucket], metric: F) -> f64
where
    F: Fn(&TrendBucket) -> f64,
{
    match buckets {
        [.., previous, current] => trend_delta(metric(previous), metric(current)),
        _ => 0.0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleDetail;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn sale_on(id: i64, fecha: &str, total: f64, cliente_id: i64, producto_id: i64) -> Sale {
        Sale {
            id,
            cliente_id,
            fecha: fecha.to_string(),
            total,
            metodo_pago: "efectivo".to_string(),
            detalles: vec![SaleDetail {
                id: 0,
                venta_id: id,
                producto_id,
                cantidad: 1,
                precio_unitario: total,
                subtotal: None,
                producto: None,
            }],
            cliente: None,
            tipo_documento: None,
            serie: None,
            numero_documento: None,
        }
    }

    #[test]
    fn test_bucket_counts_per_period() {
        let sales = vec![];
        assert_eq!(bucket_sales_at(&sales, Period::Day, fixed_now()).len(), 30);
        assert_eq!(bucket_sales_at(&sales, Period::Week, fixed_now()).len(), 8);
        assert_eq!(bucket_sales_at(&sales, Period::Month, fixed_now()).len(), 12);
    }

    #[test]
    fn test_daily_labels_are_chronological_and_end_today() {
        let buckets = bucket_sales_at(&[], Period::Day, fixed_now());
        assert_eq!(buckets.first().unwrap().label, "15/02");
        assert_eq!(buckets.last().unwrap().label, "15/03");
    }

    #[test]
    fn test_five_sales_across_three_days() {
        let sales = vec![
            sale_on(1, "2024-03-15T09:00:00", 100.0, 1, 10),
            sale_on(2, "2024-03-15T10:00:00", 50.0, 2, 11),
            sale_on(3, "2024-03-14T09:00:00", 75.0, 1, 10),
            sale_on(4, "2024-03-10T16:30:00", 20.0, 3, 12),
            sale_on(5, "2024-03-10T18:00:00", 30.0, 3, 12),
        ];

        let buckets = bucket_sales_at(&sales, Period::Day, fixed_now());
        let non_zero: Vec<&TrendBucket> = buckets.iter().filter(|b| b.sales_count > 0).collect();

        assert_eq!(non_zero.len(), 3);
        assert_eq!(buckets.iter().filter(|b| b.sales_count == 0).count(), 27);

        let today = buckets.last().unwrap();
        assert_eq!(today.sales_count, 2);
        assert_eq!(today.revenue, 150.0);
        assert_eq!(today.distinct_products, 2);
        assert_eq!(today.distinct_clients, 2);
    }

    #[test]
    fn test_malformed_dates_are_skipped_not_fatal() {
        let sales = vec![
            sale_on(1, "2024-03-15T09:00:00", 100.0, 1, 10),
            sale_on(2, "garbage", 999.0, 2, 11),
        ];

        let buckets = bucket_sales_at(&sales, Period::Day, fixed_now());
        let total_revenue: f64 = buckets.iter().map(|b| b.revenue).sum();
        assert_eq!(total_revenue, 100.0);
    }

    #[test]
    fn test_midnight_boundary_is_excluded_from_both_sides() {
        // Exactly 00:00:00.000 is neither strictly after the day's start
        // nor strictly before the previous day's end.
        let sales = vec![sale_on(1, "2024-03-14T00:00:00", 100.0, 1, 10)];
        let buckets = bucket_sales_at(&sales, Period::Day, fixed_now());
        assert!(buckets.iter().all(|b| b.sales_count == 0));
    }

    #[test]
    fn test_weekly_buckets_capture_whole_week() {
        // 2024-03-15 is a Friday; the current week runs Sun 10th..Sat 16th.
        let sales = vec![
            sale_on(1, "2024-03-11T08:00:00", 40.0, 1, 10),
            sale_on(2, "2024-03-13T08:00:00", 60.0, 2, 11),
        ];
        let buckets = bucket_sales_at(&sales, Period::Week, fixed_now());
        let current = buckets.last().unwrap();
        assert_eq!(current.sales_count, 2);
        assert_eq!(current.revenue, 100.0);
    }

    #[test]
    fn test_monthly_labels() {
        let buckets = bucket_sales_at(&[], Period::Month, fixed_now());
        assert_eq!(buckets.last().unwrap().label, "Mar/24");
        assert_eq!(buckets.first().unwrap().label, "Apr/23");
    }

    #[test]
    fn test_trend_delta_zero_previous() {
        assert_eq!(trend_delta(0.0, 10.0), 100.0);
        assert_eq!(trend_delta(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_trend_delta_regular() {
        assert_eq!(trend_delta(100.0, 150.0), 50.0);
        assert_eq!(trend_delta(200.0, 100.0), -50.0);
    }

    #[test]
    fn test_latest_delta_uses_two_most_recent_buckets() {
        let sales = vec![
            sale_on(1, "2024-03-14T09:00:00", 100.0, 1, 10),
            sale_on(2, "2024-03-15T09:00:00", 150.0, 1, 10),
        ];
        let buckets = bucket_sales_at(&sales, Period::Day, fixed_now());
        assert_eq!(latest_delta(&buckets, |b| b.revenue), 50.0);
    }

    #[test]
    fn test_week_number_formula() {
        // January 1st 2024 is a Monday (dow-from-sunday = 1):
        // Jan 1 → ceil((0 + 1 + 1)/7) = 1
        assert_eq!(week_number(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 1);
        // Jan 7 (Sunday) → ceil((6 + 1 + 1)/7) = 2
        assert_eq!(week_number(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()), 2);
    }
}
