use crate::types::DeliveryRecord;
use std::collections::BTreeSet;

/// The user's multi-select state: one set of accepted values per filterable
/// column. Membership in BOTH sets keeps a record; an empty set therefore
/// matches nothing (there is no implicit "select all").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub cities: BTreeSet<String>,
    pub traffic: BTreeSet<String>,
}

impl FilterSelection {
    /// Session-start default: every distinct value of both columns selected.
    pub fn all_of(data: &[DeliveryRecord]) -> FilterSelection {
        FilterSelection {
            cities: distinct(data, |r| &r.city),
            traffic: distinct(data, |r| &r.road_traffic_density),
        }
    }

    /// Pure projection of the cleaned dataset down to the selected rows.
    /// The input is never mutated, so this can be re-applied every time the
    /// selection changes without reloading.
    pub fn apply(&self, data: &[DeliveryRecord]) -> Vec<DeliveryRecord> {
        data.iter()
            .filter(|r| self.cities.contains(&r.city) && self.traffic.contains(&r.road_traffic_density))
            .cloned()
            .collect()
    }
}

pub fn distinct<F>(data: &[DeliveryRecord], key: F) -> BTreeSet<String>
where
    F: Fn(&DeliveryRecord) -> &str,
{
    data.iter().map(|r| key(r).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryRecord;
    use chrono::NaiveDate;

    fn record(city: &str, traffic: &str) -> DeliveryRecord {
        DeliveryRecord {
            driver_age: Some(30),
            driver_rating: Some(4.5),
            multiple_deliveries: Some(1),
            time_taken_minutes: 20,
            order_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            order_hour: Some(12),
            weather_condition: "Sunny".to_string(),
            city: city.to_string(),
            road_traffic_density: traffic.to_string(),
            vehicle_type: "motorcycle".to_string(),
            order_type: "Snack".to_string(),
            festival_flag: "No".to_string(),
            vehicle_condition: Some(1),
        }
    }

    #[test]
    fn test_default_selection_is_identity() {
        let data = vec![
            record("Urban", "High"),
            record("Metropolitian", "Low"),
            record("Urban", "Jam"),
        ];
        let sel = FilterSelection::all_of(&data);
        assert_eq!(sel.apply(&data).len(), data.len());
    }

    #[test]
    fn test_empty_city_selection_matches_nothing() {
        let data = vec![record("Urban", "High"), record("Urban", "Low")];
        let sel = FilterSelection {
            cities: BTreeSet::new(),
            traffic: distinct(&data, |r| &r.road_traffic_density),
        };
        assert!(sel.apply(&data).is_empty());
    }

    #[test]
    fn test_subset_selection() {
        let data = vec![
            record("Urban", "High"),
            record("Metropolitian", "High"),
            record("Urban", "Low"),
        ];
        let sel = FilterSelection {
            cities: ["Urban".to_string()].into_iter().collect(),
            traffic: ["High".to_string()].into_iter().collect(),
        };
        let kept = sel.apply(&data);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].city, "Urban");
        assert_eq!(kept[0].road_traffic_density, "High");
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let data = vec![record("Urban", "High")];
        let sel = FilterSelection {
            cities: BTreeSet::new(),
            traffic: BTreeSet::new(),
        };
        let _ = sel.apply(&data);
        assert_eq!(data.len(), 1);
    }
}
