use crate::types::{DashboardSummary, DeliveryRecord};
use crate::util::{five_number_summary, mean, pearson};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Numeric columns feeding the correlation heatmap, in display order.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "driver_age",
    "driver_rating",
    "vehicle_condition",
    "multiple_deliveries",
    "time_taken_minutes",
];

#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// `cells[i][j]` is the pairwise-complete Pearson coefficient between
    /// `NUMERIC_COLUMNS[i]` and `NUMERIC_COLUMNS[j]`; `None` when fewer than
    /// two complete pairs exist (or an off-diagonal pair has zero variance).
    pub cells: [[Option<f64>; 5]; 5],
}

#[derive(Debug, Clone)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Five-number summary of delivery time within one category, the data
/// behind one box (or violin) in a grouped distribution plot.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// The three headline metrics. Means exclude nulls; the count includes
/// every record regardless of null fields.
pub fn summary(data: &[DeliveryRecord]) -> DashboardSummary {
    let times: Vec<f64> = data.iter().map(|r| r.time_taken_minutes as f64).collect();
    let ratings: Vec<f64> = data.iter().filter_map(|r| r.driver_rating).collect();
    DashboardSummary {
        avg_delivery_time_min: mean(&times),
        avg_rating: mean(&ratings),
        order_count: data.len(),
    }
}

/// Order count per hour of day, ascending by hour. Records whose order
/// time failed to parse carry no hour and are excluded here.
pub fn orders_by_hour(data: &[DeliveryRecord]) -> Vec<(u32, usize)> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for r in data {
        if let Some(h) = r.order_hour {
            *counts.entry(h).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

/// Mean delivery time per vehicle type, ascending by the mean.
pub fn mean_time_by_vehicle(data: &[DeliveryRecord]) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in data {
        groups
            .entry(r.vehicle_type.clone())
            .or_default()
            .push(r.time_taken_minutes as f64);
    }
    let mut rows: Vec<(String, f64)> = groups
        .into_iter()
        .filter_map(|(vehicle, times)| mean(&times).map(|m| (vehicle, m)))
        .collect();
    rows.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    rows
}

/// Frequency count of a categorical column, most frequent first
/// (ties broken by value for a stable display order).
pub fn category_counts<F>(data: &[DeliveryRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&DeliveryRecord) -> &str,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for r in data {
        *counts.entry(key(r).to_string()).or_insert(0) += 1;
    }
    let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

fn numeric_value(r: &DeliveryRecord, idx: usize) -> Option<f64> {
    match idx {
        0 => r.driver_age.map(|v| v as f64),
        1 => r.driver_rating,
        2 => r.vehicle_condition.map(|v| v as f64),
        3 => r.multiple_deliveries.map(|v| v as f64),
        4 => Some(r.time_taken_minutes as f64),
        _ => None,
    }
}

/// Pairwise-complete Pearson correlation over the five numeric columns.
/// Each pair only uses rows where both sides are non-null, independent of
/// the other columns.
pub fn correlation_matrix(data: &[DeliveryRecord]) -> CorrelationMatrix {
    let mut cells = [[None; 5]; 5];
    for i in 0..NUMERIC_COLUMNS.len() {
        for j in 0..NUMERIC_COLUMNS.len() {
            if i == j {
                let non_null = data.iter().filter(|r| numeric_value(r, i).is_some()).count();
                cells[i][j] = if non_null >= 2 { Some(1.0) } else { None };
                continue;
            }
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for r in data {
                if let (Some(x), Some(y)) = (numeric_value(r, i), numeric_value(r, j)) {
                    xs.push(x);
                    ys.push(y);
                }
            }
            cells[i][j] = pearson(&xs, &ys);
        }
    }
    CorrelationMatrix { cells }
}

/// Equal-width bucketing of delivery times for the histogram panel.
/// Every bin is returned, including empty ones, so the axis stays regular.
pub fn time_histogram(data: &[DeliveryRecord], bins: usize) -> Vec<HistogramBin> {
    if data.is_empty() || bins == 0 {
        return Vec::new();
    }
    let values: Vec<f64> = data.iter().map(|r| r.time_taken_minutes as f64).collect();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    // A single-valued sample still gets a well-defined unit-wide range.
    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Distribution of delivery time per category, sorted by category name.
/// Backs both the box plot (traffic density) and violin (weather) panels.
pub fn time_summary_by<F>(data: &[DeliveryRecord], key: F) -> Vec<GroupSummary>
where
    F: Fn(&DeliveryRecord) -> &str,
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in data {
        groups
            .entry(key(r).to_string())
            .or_default()
            .push(r.time_taken_minutes as f64);
    }
    groups
        .into_iter()
        .filter_map(|(category, times)| {
            let count = times.len();
            five_number_summary(times).map(|(min, q1, median, q3, max)| GroupSummary {
                category,
                count,
                min,
                q1,
                median,
                q3,
                max,
            })
        })
        .collect()
}

/// (rating, delivery minutes) points for the scatter panel; rows without a
/// rating are dropped.
pub fn rating_time_pairs(data: &[DeliveryRecord]) -> Vec<(f64, f64)> {
    data.iter()
        .filter_map(|r| r.driver_rating.map(|rt| (rt, r.time_taken_minutes as f64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(minutes: u32) -> DeliveryRecord {
        DeliveryRecord {
            driver_age: Some(30),
            driver_rating: Some(4.5),
            multiple_deliveries: Some(1),
            time_taken_minutes: minutes,
            order_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            order_hour: Some(12),
            weather_condition: "Sunny".to_string(),
            city: "Urban".to_string(),
            road_traffic_density: "High".to_string(),
            vehicle_type: "motorcycle".to_string(),
            order_type: "Snack".to_string(),
            festival_flag: "No".to_string(),
            vehicle_condition: Some(1),
        }
    }

    #[test]
    fn test_summary_mean_over_three_records() {
        let data = vec![record(10), record(20), record(30)];
        let s = summary(&data);
        assert_eq!(s.avg_delivery_time_min, Some(20.0));
        assert_eq!(s.order_count, 3);
    }

    #[test]
    fn test_summary_empty_collection() {
        let s = summary(&[]);
        assert_eq!(s.avg_delivery_time_min, None);
        assert_eq!(s.avg_rating, None);
        assert_eq!(s.order_count, 0);
    }

    #[test]
    fn test_summary_rating_excludes_nulls_count_does_not() {
        let mut no_rating = record(20);
        no_rating.driver_rating = None;
        let data = vec![record(10), no_rating];
        let s = summary(&data);
        assert_eq!(s.avg_rating, Some(4.5));
        assert_eq!(s.order_count, 2);
    }

    #[test]
    fn test_orders_by_hour_sorted_and_null_excluded() {
        let mut a = record(10);
        a.order_hour = Some(18);
        let mut b = record(10);
        b.order_hour = Some(9);
        let mut c = record(10);
        c.order_hour = Some(18);
        let mut d = record(10);
        d.order_hour = None;
        let rows = orders_by_hour(&[a, b, c, d]);
        assert_eq!(rows, vec![(9, 1), (18, 2)]);
    }

    #[test]
    fn test_mean_time_by_vehicle_grouped_mean() {
        let mut bike1 = record(10);
        bike1.vehicle_type = "bike".to_string();
        let mut bike2 = record(30);
        bike2.vehicle_type = "bike".to_string();
        let mut scooter = record(5);
        scooter.vehicle_type = "scooter".to_string();
        let rows = mean_time_by_vehicle(&[bike1, bike2, scooter]);
        // Ascending by mean: scooter (5.0) before bike (20.0).
        assert_eq!(rows[0], ("scooter".to_string(), 5.0));
        assert_eq!(rows[1], ("bike".to_string(), 20.0));
    }

    #[test]
    fn test_category_counts_descending() {
        let mut a = record(10);
        a.order_type = "Meal".to_string();
        let mut b = record(10);
        b.order_type = "Meal".to_string();
        let mut c = record(10);
        c.order_type = "Snack".to_string();
        let rows = category_counts(&[a, b, c], |r| &r.order_type);
        assert_eq!(rows, vec![("Meal".to_string(), 2), ("Snack".to_string(), 1)]);
    }

    #[test]
    fn test_correlation_self_is_one() {
        let data = vec![record(10), record(20), record(30)];
        let m = correlation_matrix(&data);
        // Diagonal is exactly 1.0 with at least two non-null values.
        assert_eq!(m.cells[4][4], Some(1.0));
        assert_eq!(m.cells[0][0], Some(1.0));
    }

    #[test]
    fn test_correlation_pairwise_complete() {
        let mut a = record(10);
        a.driver_age = Some(20);
        let mut b = record(20);
        b.driver_age = Some(30);
        let mut c = record(30);
        c.driver_age = None; // excluded from the (age, time) pair only
        let m = correlation_matrix(&[a, b, c]);
        let r = m.cells[0][4].unwrap();
        // Two complete pairs, perfectly linear.
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_empty_is_none() {
        let m = correlation_matrix(&[]);
        assert!(m.cells.iter().flatten().all(|c| c.is_none()));
    }

    #[test]
    fn test_histogram_counts_cover_all_records() {
        let data: Vec<DeliveryRecord> = (10..40).map(record).collect();
        let bins = time_histogram(&data, 30);
        assert_eq!(bins.len(), 30);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, data.len());
        assert_eq!(bins[0].lower, 10.0);
        assert!((bins[29].upper - 39.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_degenerate_and_empty() {
        let single = vec![record(25), record(25)];
        let bins = time_histogram(&single, 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(time_histogram(&[], 30).is_empty());
    }

    #[test]
    fn test_time_summary_by_traffic() {
        let mut low = record(10);
        low.road_traffic_density = "Low".to_string();
        let mut low2 = record(30);
        low2.road_traffic_density = "Low".to_string();
        let rows = time_summary_by(&[low, low2], |r| &r.road_traffic_density);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Low");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].median, 20.0);
        assert_eq!(rows[0].min, 10.0);
        assert_eq!(rows[0].max, 30.0);
    }

    #[test]
    fn test_rating_time_pairs_drop_null_ratings() {
        let mut rated = record(15);
        rated.driver_rating = Some(4.0);
        let mut unrated = record(25);
        unrated.driver_rating = None;
        let pairs = rating_time_pairs(&[rated, unrated]);
        assert_eq!(pairs, vec![(4.0, 15.0)]);
    }
}
