use serde_json::json;

use appslog_storage::{write_records, LogReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "/tmp/device_apps.log.gz".to_string());

    let batch = vec![
        json!({
            "device": {"id": "e7e1a50c0ec2747ca56cd9e1558c0d7c", "type": "idfa"},
            "lat": 67.7835424444,
            "lon": -22.8044005471,
            "apps": [1, 2, 3, 42],
        }),
        json!({
            "device": {"id": "aab3b3aa91f1c4999a61b2b4e6b9e3b0", "type": "gaid"},
            "lat": 42,
            "lon": -7,
            "apps": [101, 202],
        }),
        json!({"apps": [7]}),
    ];

    let count = batch.len();
    let bytes = write_records(&path, batch)?;
    println!("\n✅ Appended {count} records ({bytes} framed bytes) to {path}\n");

    println!("📖 Reading {}\n", path);
    for (i, record) in LogReader::open(&path)?.enumerate() {
        let record = record?;

        println!("─────────────────────────────────────────");
        println!("Record #{}", i);
        println!("─────────────────────────────────────────");

        match &record.device {
            Some(device) => {
                println!("  Device id:   {}", device.id.as_deref().unwrap_or("(none)"));
                println!("  Device type: {}", device.kind.as_deref().unwrap_or("(none)"));
            }
            None => println!("  Device:      (none)"),
        }
        println!("  Lat:         {}", fmt_coord(record.lat));
        println!("  Lon:         {}", fmt_coord(record.lon));
        println!("  Apps:        {:?}", record.apps);
        println!();
    }

    Ok(())
}

fn fmt_coord(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(none)".to_string())
}
