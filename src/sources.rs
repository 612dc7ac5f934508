use anyhow::Result;

use crate::config::Config;
use crate::models::ProductRecord;

pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<12} {:<40} {:>8}  STATUS", "SOURCE", "PATH", "RECORDS");

    for source in &config.catalog.sources {
        let path_display = source.path.display().to_string();
        if !source.path.exists() {
            let status = if source.optional {
                "MISSING (optional)"
            } else {
                "MISSING"
            };
            println!("{:<12} {:<40} {:>8}  {}", source.name, path_display, "-", status);
            continue;
        }

        match count_records(&source.path) {
            Ok(count) => {
                println!("{:<12} {:<40} {:>8}  OK", source.name, path_display, count);
            }
            Err(err) => {
                println!(
                    "{:<12} {:<40} {:>8}  UNREADABLE ({})",
                    source.name, path_display, "-", err
                );
            }
        }
    }

    Ok(())
}

/// Count the well-formed records in one source file, mirroring what the
/// loader would keep.
fn count_records(path: &std::path::Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    Ok(values
        .into_iter()
        .filter(|v| serde_json::from_value::<ProductRecord>(v.clone()).is_ok())
        .count())
}
