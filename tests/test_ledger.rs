use chrono::NaiveDate;
use demand_forecast::ledger::CsvLedger;
use demand_forecast::orchestrator::LedgerReader;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn reads_transactions_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "product_id,product_name,qty,date").unwrap();
    writeln!(file, "1,Widget,2.5,2024-01-05").unwrap();
    writeln!(file, ",Gizmo,1.0,2024-01-06").unwrap();
    writeln!(file, "2,,3.0,").unwrap();
    file.flush().unwrap();

    let records = CsvLedger::new(file.path()).list_transactions().unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].product_id, Some(1));
    assert_eq!(records[0].product_name.as_deref(), Some("Widget"));
    assert_eq!(records[0].quantity, 2.5);
    assert_eq!(
        records[0].date,
        Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    );

    // Missing id falls through as None, not an error
    assert_eq!(records[1].product_id, None);

    // Missing name and date stay None; nothing is silently dropped
    assert_eq!(records[2].product_name, None);
    assert_eq!(records[2].date, None);
}

#[test]
fn missing_file_is_an_error() {
    assert!(CsvLedger::new("/nonexistent/sales.csv")
        .list_transactions()
        .is_err());
}
