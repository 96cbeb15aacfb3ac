use chrono::{Duration, NaiveDate};
use demand_forecast::engine::{EngineConfig, ForecastEngine};
use demand_forecast::ledger::{MemoryLedger, MemorySink};
use demand_forecast::models::recurrent::RecurrentConfig;
use demand_forecast::orchestrator::TrainingOrchestrator;
use demand_forecast::series::{KeyMode, SeriesBuilder, TransactionRecord};
use demand_forecast::store::ModelStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Batch Training Example");
    println!("=======================================\n");

    // Three products: two with enough history, one too new to train
    let mut sales = product_history("Widget", 1, 30);
    sales.extend(product_history("Gizmo", 2, 45));
    sales.extend(product_history("Newcomer", 3, 6));
    println!("Ledger holds {} transactions\n", sales.len());

    let store = ModelStore::new(std::env::temp_dir().join("demand_forecast_batch_demo"));
    let config = EngineConfig {
        window: 7,
        model: RecurrentConfig::default(),
    };
    let engine = ForecastEngine::with_config(store, config)?;
    let orchestrator = TrainingOrchestrator::new(engine, SeriesBuilder::new(KeyMode::ByName));

    println!("Running batch training...");
    let ledger = MemoryLedger::new(sales);
    let mut sink = MemorySink::new();
    let report = orchestrator.run_all(&ledger, &mut sink)?;

    println!(
        "\nBatch finished: {} trained, {} skipped\n",
        report.trained, report.skipped
    );
    for name in ["Widget", "Gizmo", "Newcomer"] {
        match sink.get(name) {
            Some(record) => println!("  {}: next-day forecast {:.2}", name, record.values[0]),
            None => println!("  {}: no forecast (skipped)", name),
        }
    }

    Ok(())
}

fn product_history(name: &str, id: i64, days: usize) -> Vec<TransactionRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    (0..days)
        .map(|i| TransactionRecord {
            product_id: Some(id),
            product_name: Some(name.to_string()),
            quantity: ((i * id as usize) % 4) as f64,
            date: Some(start + Duration::days(i as i64)),
        })
        .collect()
}
