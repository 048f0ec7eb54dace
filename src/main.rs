use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use timetable_import::{open_database, table_counts, ImportConfig, Importer, MappingTable};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = ImportConfig::from_env();

    match args.first().map(String::as_str) {
        Some("summary") => run_summary(config, &args[1..]),
        Some("import") => run_import(config, &args[1..]),
        _ => run_import(config, &args),
    }
}

/// `[DATA_DIR [DB_PATH]]`
fn run_import(mut config: ImportConfig, args: &[String]) -> Result<()> {
    if let Some(data_dir) = args.first() {
        config = config.with_data_dir(PathBuf::from(data_dir));
    }
    if let Some(db_path) = args.get(1) {
        config = config.with_db_path(PathBuf::from(db_path));
    }

    let files = config
        .xml_files()
        .with_context(|| format!("Failed to list timetable files in {}", config.data_dir.display()))?;
    println!("📂 Found {} timetable files in {}", files.len(), config.data_dir.display());

    let mut conn = open_database(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let mappings = MappingTable::load_or_default(&config.mapping_file);

    let mut importer = Importer::new(&mut conn, mappings).context("Failed to prepare import")?;
    let stats = importer.import_files(&files).context("Import aborted")?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Files:     {}", stats.files);
    println!("✓ Companies: {} new", stats.companies_added);
    println!("✓ Trains:    {} new, {} already stored", stats.trains_added, stats.trains_skipped);
    println!("✓ Routes:    {} new, {} already stored", stats.routes_added, stats.routes_skipped);
    println!("✓ Segments:  {} new, {} already stored", stats.segments_added, stats.segments_skipped);
    println!("✓ Stations:  {} new", stats.stations_added);

    Ok(())
}

/// `[DB_PATH]`
fn run_summary(mut config: ImportConfig, args: &[String]) -> Result<()> {
    if let Some(db_path) = args.first() {
        config = config.with_db_path(PathBuf::from(db_path));
    }

    let conn = open_database(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    println!("📊 {}", config.db_path.display());
    for count in table_counts(&conn)? {
        println!("  {:<14} {}", count.table, count.rows);
    }

    Ok(())
}
