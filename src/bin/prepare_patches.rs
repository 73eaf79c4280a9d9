use anomaly_patches::config::load_config;
use anomaly_patches::image::io::write_json_file;
use anomaly_patches::DatasetPreparer;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let report_path = config.output.report_json.clone();

    let prepared = DatasetPreparer::new(config)
        .run()
        .map_err(|e| e.to_string())?;
    let report = &prepared.report;

    println!(
        "Partitioned {} of {} images ({} skipped) using layout {}",
        report.images_partitioned,
        report.images_listed,
        report.skipped.len(),
        report.layout_image.as_deref().unwrap_or("-")
    );
    for strategy in &report.strategies {
        println!("  plan {}: {} splices", strategy.label, strategy.splice_count);
    }
    println!(
        "Patches: {} normal / {} anomalous -> balanced {} / {}",
        report.patches.normal,
        report.patches.anomalous,
        report.balanced.normal,
        report.balanced.anomalous
    );
    println!(
        "Feature rows: {} train / {} test",
        report.train_rows, report.test_rows
    );

    if let Some(path) = report_path {
        write_json_file(&path, report).map_err(|e| e.to_string())?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: prepare_patches <config.json>".to_string()
}
