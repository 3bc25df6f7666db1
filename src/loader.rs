use crate::types::{DeliveryRecord, RawRow};
use crate::util::{parse_date, parse_f64_safe, parse_hour, parse_i64_safe};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

const TIME_TAKEN_PREFIX: &str = "(min) ";
const WEATHER_PREFIX: &str = "conditions ";

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub null_ages: usize,
    pub null_ratings: usize,
    pub null_multiple_deliveries: usize,
    pub null_order_hours: usize,
}

impl LoadReport {
    pub fn tolerated_nulls(&self) -> usize {
        self.null_ages + self.null_ratings + self.null_multiple_deliveries + self.null_order_hours
    }
}

/// Categorical cells come through as-is; a missing cell takes the literal
/// `"NaN"` the source file itself uses for unknowns.
fn categorical(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "NaN".to_string())
}

pub fn load_and_clean(path: &str) -> Result<(Vec<DeliveryRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut records: Vec<DeliveryRecord> = Vec::new();
    let mut null_ages = 0usize;
    let mut null_ratings = 0usize;
    let mut null_multiple_deliveries = 0usize;
    let mut null_order_hours = 0usize;

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = result.map_err(|e| format!("row {}: {}", total_rows, e))?;

        // Tolerant numeric coercion: a bad cell becomes a null, never a
        // load failure.
        let driver_age = parse_i64_safe(row.delivery_person_age.as_deref());
        if driver_age.is_none() {
            null_ages += 1;
        }
        let driver_rating = parse_f64_safe(row.delivery_person_ratings.as_deref());
        if driver_rating.is_none() {
            null_ratings += 1;
        }
        let multiple_deliveries = parse_i64_safe(row.multiple_deliveries.as_deref());
        if multiple_deliveries.is_none() {
            null_multiple_deliveries += 1;
        }
        let vehicle_condition = parse_i64_safe(row.vehicle_condition.as_deref());

        // `Time_taken(min)` is "(min) <N>"; strip the literal prefix and the
        // remainder must be a non-negative integer. Anything else is fatal.
        let raw_time = row
            .time_taken
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| format!("row {}: missing Time_taken(min)", total_rows))?;
        let time_taken_minutes = raw_time
            .strip_prefix(TIME_TAKEN_PREFIX)
            .unwrap_or(raw_time)
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("row {}: malformed Time_taken(min) {:?}", total_rows, raw_time))?;

        // Order date is mandatory and strictly DD-MM-YYYY.
        let raw_date = row
            .order_date
            .as_deref()
            .ok_or_else(|| format!("row {}: missing Order_Date", total_rows))?;
        let order_date = parse_date(raw_date)
            .ok_or_else(|| format!("row {}: malformed Order_Date {:?}", total_rows, raw_date))?;

        let order_hour = parse_hour(row.time_ordered.as_deref());
        if order_hour.is_none() {
            null_order_hours += 1;
        }

        let weather_raw = categorical(row.weather_conditions);
        let weather_condition = weather_raw
            .strip_prefix(WEATHER_PREFIX)
            .unwrap_or(&weather_raw)
            .to_string();

        records.push(DeliveryRecord {
            driver_age,
            driver_rating,
            multiple_deliveries,
            time_taken_minutes,
            order_date,
            order_hour,
            weather_condition,
            city: categorical(row.city),
            road_traffic_density: categorical(row.road_traffic_density),
            vehicle_type: categorical(row.type_of_vehicle),
            order_type: categorical(row.type_of_order),
            festival_flag: categorical(row.festival),
            vehicle_condition,
        });
    }

    let report = LoadReport {
        total_rows,
        null_ages,
        null_ratings,
        null_multiple_deliveries,
        null_order_hours,
    };
    Ok((records, report))
}

// Memoized load, keyed by canonical path + file modification time. Repeated
// loads of an unchanged file reuse the parsed dataset; the only invalidation
// path is an explicit `clear_cache`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl CacheKey {
    fn for_path(path: &str) -> CacheKey {
        let p = Path::new(path);
        CacheKey {
            path: p.canonicalize().unwrap_or_else(|_| p.to_path_buf()),
            modified: std::fs::metadata(p).and_then(|m| m.modified()).ok(),
        }
    }
}

type LoadedData = (Vec<DeliveryRecord>, LoadReport);

static LOAD_CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<LoadedData>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

pub fn load_cached(path: &str) -> Result<Arc<LoadedData>, Box<dyn Error>> {
    let key = CacheKey::for_path(path);
    if let Some(hit) = LOAD_CACHE.lock().unwrap().get(&key) {
        return Ok(Arc::clone(hit));
    }
    let loaded = Arc::new(load_and_clean(path)?);
    LOAD_CACHE
        .lock()
        .unwrap()
        .insert(key, Arc::clone(&loaded));
    Ok(loaded)
}

pub fn clear_cache() {
    LOAD_CACHE.lock().unwrap().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_missing_becomes_nan_literal() {
        assert_eq!(categorical(None), "NaN");
        assert_eq!(categorical(Some("  ".to_string())), "NaN");
        assert_eq!(categorical(Some(" Urban ".to_string())), "Urban");
    }
}
