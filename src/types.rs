use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Delivery_person_Age")]
    pub delivery_person_age: Option<String>,
    #[serde(rename = "Delivery_person_Ratings")]
    pub delivery_person_ratings: Option<String>,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: Option<String>,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken: Option<String>,
    #[serde(rename = "Order_Date")]
    pub order_date: Option<String>,
    #[serde(rename = "Time_Ordered")]
    pub time_ordered: Option<String>,
    #[serde(rename = "Weatherconditions")]
    pub weather_conditions: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Road_traffic_density")]
    pub road_traffic_density: Option<String>,
    #[serde(rename = "Type_of_vehicle")]
    pub type_of_vehicle: Option<String>,
    #[serde(rename = "Type_of_order")]
    pub type_of_order: Option<String>,
    #[serde(rename = "Festival")]
    pub festival: Option<String>,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: Option<String>,
}

/// One cleaned order. Fields coerced with a tolerant parser are `Option`;
/// `time_taken_minutes` and `order_date` are mandatory (malformed text there
/// aborts the whole load).
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    pub driver_age: Option<i64>,
    pub driver_rating: Option<f64>,
    pub multiple_deliveries: Option<i64>,
    pub time_taken_minutes: u32,
    pub order_date: NaiveDate,
    pub order_hour: Option<u32>,
    pub weather_condition: String,
    pub city: String,
    pub road_traffic_density: String,
    pub vehicle_type: String,
    pub order_type: String,
    pub festival_flag: String,
    pub vehicle_condition: Option<i64>,
}

/// The three headline metrics of the dashboard. Means are `None` when the
/// filtered set has no usable values.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub avg_delivery_time_min: Option<f64>,
    pub avg_rating: Option<f64>,
    pub order_count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct HourlyOrdersRow {
    #[serde(rename = "Hour")]
    #[tabled(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct VehicleTimeRow {
    #[serde(rename = "TypeOfVehicle")]
    #[tabled(rename = "TypeOfVehicle")]
    pub vehicle_type: String,
    #[serde(rename = "AvgTimeMin")]
    #[tabled(rename = "AvgTimeMin")]
    pub avg_time_min: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryCountRow {
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct HistogramBinRow {
    #[serde(rename = "Range")]
    #[tabled(rename = "Range")]
    pub range: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DistributionRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: String,
    #[serde(rename = "Min")]
    #[tabled(rename = "Min")]
    pub min: String,
    #[serde(rename = "Q1")]
    #[tabled(rename = "Q1")]
    pub q1: String,
    #[serde(rename = "Median")]
    #[tabled(rename = "Median")]
    pub median: String,
    #[serde(rename = "Q3")]
    #[tabled(rename = "Q3")]
    pub q3: String,
    #[serde(rename = "Max")]
    #[tabled(rename = "Max")]
    pub max: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CorrelationRow {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "DriverAge")]
    #[tabled(rename = "DriverAge")]
    pub driver_age: String,
    #[serde(rename = "DriverRating")]
    #[tabled(rename = "DriverRating")]
    pub driver_rating: String,
    #[serde(rename = "VehicleCondition")]
    #[tabled(rename = "VehicleCondition")]
    pub vehicle_condition: String,
    #[serde(rename = "MultipleDeliveries")]
    #[tabled(rename = "MultipleDeliveries")]
    pub multiple_deliveries: String,
    #[serde(rename = "TimeTakenMin")]
    #[tabled(rename = "TimeTakenMin")]
    pub time_taken_min: String,
}
