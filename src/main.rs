// Entry point and high-level console flow.
//
// The binary mirrors the interaction model of the dashboard it replaces:
// - Option [1] loads and cleans the delivery CSV, printing diagnostics.
// - Option [2] edits the City / traffic-density multi-selects; a change
//   immediately recomputes and re-renders the dashboard.
// - Option [3] re-renders the dashboard for the current selection.
// - Option [4] drops the memoized dataset so the next load re-reads disk.
use delivery_dashboard::aggregate;
use delivery_dashboard::filter::FilterSelection;
use delivery_dashboard::loader::{self, LoadReport};
use delivery_dashboard::output;
use delivery_dashboard::types::{
    CategoryCountRow, CorrelationRow, DeliveryRecord, DistributionRow, HistogramBinRow,
    HourlyOrdersRow, VehicleTimeRow,
};
use delivery_dashboard::util::{format_int, format_number, format_opt_number, pearson};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

const DEFAULT_PATH: &str = "train.csv";
const HISTOGRAM_BINS: usize = 30;

// In-memory app state: the memoized dataset plus the user's current filter
// selection. The dataset itself is loaded at most once per process (see
// `loader::load_cached`); only the selection changes between renders.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        selection: None,
    })
});

struct AppState {
    data: Option<Arc<(Vec<DeliveryRecord>, LoadReport)>>,
    selection: Option<FilterSelection>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    prompt_line("Enter choice: ")
}

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after rendering.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt_line("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the CSV file (memoized).
///
/// On success the dataset lands in `APP_STATE` and the filter selection
/// resets to every distinct City and traffic-density value.
fn handle_load() {
    let input = prompt_line(&format!("CSV path [{}]: ", DEFAULT_PATH));
    let path = if input.is_empty() {
        DEFAULT_PATH
    } else {
        input.as_str()
    };
    match loader::load_cached(path) {
        Ok(loaded) => {
            let report = &loaded.1;
            println!(
                "Processing dataset... ({} rows loaded)",
                format_int(report.total_rows as i64)
            );
            if report.tolerated_nulls() > 0 {
                println!(
                    "Note: tolerated nulls - age: {}, rating: {}, multiple deliveries: {}, order hour: {}.",
                    format_int(report.null_ages as i64),
                    format_int(report.null_ratings as i64),
                    format_int(report.null_multiple_deliveries as i64),
                    format_int(report.null_order_hours as i64)
                );
            }
            println!();
            let selection = FilterSelection::all_of(&loaded.0);
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(loaded);
            state.selection = Some(selection);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Prompt for a multi-select over `available` values.
///
/// Blank input keeps everything selected, `none` selects nothing, and
/// otherwise a comma-separated list picks a subset (unknown values are
/// reported and skipped).
fn prompt_selection(label: &str, available: &BTreeSet<String>) -> BTreeSet<String> {
    let joined: Vec<&str> = available.iter().map(String::as_str).collect();
    println!("{} values: {}", label, joined.join(", "));
    let input = prompt_line("Select (comma-separated, blank = all, 'none' = none): ");
    if input.is_empty() {
        return available.clone();
    }
    if input.eq_ignore_ascii_case("none") {
        return BTreeSet::new();
    }
    let mut picked = BTreeSet::new();
    for part in input.split(',') {
        let v = part.trim();
        if v.is_empty() {
            continue;
        }
        if available.contains(v) {
            picked.insert(v.to_string());
        } else {
            println!("Ignoring unknown {} value: {}", label, v);
        }
    }
    picked
}

/// Handle option [2]: edit the filter selection, then immediately recompute
/// and re-render (the explicit filter-changed -> recompute -> render chain).
fn handle_set_filters() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let defaults = FilterSelection::all_of(&data.0);
    let selection = FilterSelection {
        cities: prompt_selection("City", &defaults.cities),
        traffic: prompt_selection("Traffic density", &defaults.traffic),
    };
    {
        let mut state = APP_STATE.lock().unwrap();
        state.selection = Some(selection);
    }
    println!();
    handle_render();
}

/// Handle option [3]: apply the current filter selection and print the
/// metrics block plus all nine chart-data panels.
fn handle_render() {
    let (data, selection) = {
        let state = APP_STATE.lock().unwrap();
        (state.data.clone(), state.selection.clone())
    };
    let (Some(data), Some(selection)) = (data, selection) else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let filtered = selection.apply(&data.0);
    render_dashboard(&filtered);
}

fn render_dashboard(filtered: &[DeliveryRecord]) {
    let summary = aggregate::summary(filtered);
    println!("Food Delivery Delay Analysis");
    println!(
        "Avg Delivery Time: {} min | Avg Rating: {} | Orders: {}\n",
        format_opt_number(summary.avg_delivery_time_min, 2),
        format_opt_number(summary.avg_rating, 2),
        format_int(summary.order_count as i64)
    );

    let hist_rows: Vec<HistogramBinRow> = aggregate::time_histogram(filtered, HISTOGRAM_BINS)
        .into_iter()
        .map(|b| HistogramBinRow {
            range: format!("{:.1}-{:.1}", b.lower, b.upper),
            count: format_int(b.count as i64),
        })
        .collect();
    output::print_panel(1, "Distribution of Delivery Time (histogram, 30 bins)", &hist_rows);

    let box_rows = distribution_rows(aggregate::time_summary_by(filtered, |r| {
        &r.road_traffic_density
    }));
    output::print_panel(2, "Traffic Density vs Delivery Time (box plot)", &box_rows);

    let violin_rows =
        distribution_rows(aggregate::time_summary_by(filtered, |r| &r.weather_condition));
    output::print_panel(3, "Weather Impact on Delivery Time (violin plot)", &violin_rows);

    let hourly_rows: Vec<HourlyOrdersRow> = aggregate::orders_by_hour(filtered)
        .into_iter()
        .map(|(hour, orders)| HourlyOrdersRow {
            hour,
            orders: format_int(orders as i64),
        })
        .collect();
    output::print_panel(4, "Orders by Hour (trend)", &hourly_rows);

    let pairs = aggregate::rating_time_pairs(filtered);
    println!("[5] Driver Rating vs Delivery Time (scatter)");
    let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    println!(
        "{} points, Pearson r = {}\n",
        format_int(pairs.len() as i64),
        format_opt_number(pearson(&xs, &ys), 3)
    );

    let corr_rows = correlation_rows(&aggregate::correlation_matrix(filtered));
    output::print_panel(6, "Correlation Heatmap (numeric columns)", &corr_rows);

    let vehicle_rows: Vec<VehicleTimeRow> = aggregate::mean_time_by_vehicle(filtered)
        .into_iter()
        .map(|(vehicle_type, avg)| VehicleTimeRow {
            vehicle_type,
            avg_time_min: format_number(avg, 2),
        })
        .collect();
    output::print_panel(7, "Vehicle Type vs Avg Delivery Time (bar)", &vehicle_rows);

    let order_rows = count_rows(
        aggregate::category_counts(filtered, |r| &r.order_type),
        summary.order_count,
    );
    output::print_panel(8, "Order Type Frequency (count plot)", &order_rows);

    let festival_rows = count_rows(
        aggregate::category_counts(filtered, |r| &r.festival_flag),
        summary.order_count,
    );
    output::print_panel(9, "Festival Orders Proportion (pie)", &festival_rows);

    if let Err(e) = output::print_json("Summary", &summary) {
        eprintln!("Summary serialization error: {}", e);
    }
}

fn distribution_rows(groups: Vec<aggregate::GroupSummary>) -> Vec<DistributionRow> {
    groups
        .into_iter()
        .map(|g| DistributionRow {
            category: g.category,
            count: format_int(g.count as i64),
            min: format_number(g.min, 1),
            q1: format_number(g.q1, 1),
            median: format_number(g.median, 1),
            q3: format_number(g.q3, 1),
            max: format_number(g.max, 1),
        })
        .collect()
}

fn count_rows(counts: Vec<(String, usize)>, total: usize) -> Vec<CategoryCountRow> {
    counts
        .into_iter()
        .map(|(value, count)| {
            let share = if total == 0 {
                "n/a".to_string()
            } else {
                format!("{}%", format_number(count as f64 / total as f64 * 100.0, 1))
            };
            CategoryCountRow {
                value,
                count: format_int(count as i64),
                share,
            }
        })
        .collect()
}

fn correlation_rows(matrix: &aggregate::CorrelationMatrix) -> Vec<CorrelationRow> {
    let cell = |v: Option<f64>| match v {
        Some(r) => format!("{:.2}", r),
        None => "n/a".to_string(),
    };
    aggregate::NUMERIC_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| CorrelationRow {
            column: name.to_string(),
            driver_age: cell(matrix.cells[i][0]),
            driver_rating: cell(matrix.cells[i][1]),
            vehicle_condition: cell(matrix.cells[i][2]),
            multiple_deliveries: cell(matrix.cells[i][3]),
            time_taken_min: cell(matrix.cells[i][4]),
        })
        .collect()
}

fn main() {
    loop {
        println!("Food Delivery EDA Dashboard");
        println!("[1] Load the dataset");
        println!("[2] Set filters");
        println!("[3] Render dashboard");
        println!("[4] Clear cached data");
        println!("[5] Exit\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                handle_set_filters();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!();
                handle_render();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => {
                loader::clear_cache();
                println!("Cache cleared. The next load will re-read the file.\n");
            }
            "5" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 1-5.\n");
            }
        }
    }
}
