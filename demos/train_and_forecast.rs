use chrono::{Duration, NaiveDate};
use demand_forecast::engine::{EngineConfig, ForecastEngine};
use demand_forecast::models::recurrent::RecurrentConfig;
use demand_forecast::series::{self, KeyMode, SeriesBuilder, TransactionRecord};
use demand_forecast::store::ModelStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Train and Forecast Example");
    println!("===========================================\n");

    // Create sample sales history: ~8 weeks with a weekly rhythm
    println!("Creating sample sales history...");
    let sales = create_sample_sales();
    println!("Sample history created: {} transactions\n", sales.len());

    // Group transactions into a daily series
    let builder = SeriesBuilder::new(KeyMode::ByName);
    let daily = builder.build(&sales);
    let day_map = &daily["Widget"];
    let (start, end) = series::span(day_map).expect("non-empty history");
    let materialized = series::materialize(day_map, start, end);
    println!(
        "Daily series for 'Widget': {} days ({} to {})\n",
        materialized.len(),
        start,
        end
    );

    // Train a model with a one-week input window
    println!("Training model...");
    let store = ModelStore::new(std::env::temp_dir().join("demand_forecast_demo"));
    let config = EngineConfig {
        window: 7,
        model: RecurrentConfig::default(),
    };
    let engine = ForecastEngine::with_config(store, config)?;
    match engine.train("Widget", &materialized)? {
        Some(path) => println!("Model saved to {}\n", path.display()),
        None => {
            println!("Not enough history to train");
            return Ok(());
        }
    }

    // Forecast the next week from the trailing window
    let recent = series::recent_window(day_map, start, end, 7);
    println!("Recent window: {:?}", recent);

    let forecast = engine.forecast("Widget", &recent, 7)?;
    println!("\n7-day forecast:");
    for (i, value) in forecast.iter().enumerate() {
        println!("  Day +{}: {:.2}", i + 1, value);
    }

    println!("\nForecasting complete!");
    Ok(())
}

fn create_sample_sales() -> Vec<TransactionRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..56)
        .map(|i| TransactionRecord {
            product_id: Some(1),
            product_name: Some("Widget".to_string()),
            // Weekend peaks over a small weekday baseline
            quantity: match i % 7 {
                5 | 6 => 6.0,
                3 => 0.0,
                _ => 2.0,
            },
            date: Some(start + Duration::days(i)),
        })
        .collect()
}
