use anyhow::{anyhow, Result};
use std::env;

use policy_analyzer::{data_dir, Catalog, DatasetKind, InferenceClient};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("show") => run_show(args.get(2).map(String::as_str))?,
        Some("ask") => run_ask(&args[2..])?,
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: policy-analyzer [show <dataset> | ask <question...>]");
            std::process::exit(1);
        }
        None => run_summary()?,
    }

    Ok(())
}

fn load_catalog() -> Result<Catalog> {
    let dir = data_dir();
    println!("📂 Loading datasets from {:?}...", dir);
    let catalog = Catalog::load(&dir)?;
    for dataset in catalog.datasets() {
        if let Some(warning) = &dataset.load_warning {
            eprintln!("⚠️  {}", warning);
        }
    }
    Ok(catalog)
}

fn run_summary() -> Result<()> {
    println!("🤖 Policy Impact Analyzer");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = load_catalog()?;

    for dataset in catalog.datasets() {
        println!(
            "\n📋 {} ({} rows, {} columns)",
            dataset.kind.label(),
            dataset.table.row_count(),
            dataset.table.column_count()
        );
        println!("   Columns: {}", dataset.table.columns.join(", "));
        if let Ok((index, name)) = dataset.filter_column() {
            let distinct = dataset.table.distinct_values(index);
            println!("   Filter column '{}': {} distinct values", name, distinct.len());
        }
    }

    println!("\n✓ Loaded at {}", catalog.loaded_at().to_rfc3339());
    println!("  Web UI: cargo run --bin policy-server --features server");

    Ok(())
}

fn run_show(dataset: Option<&str>) -> Result<()> {
    let slug = dataset.ok_or_else(|| anyhow!("Usage: policy-analyzer show <dataset>"))?;
    let kind = DatasetKind::from_slug(slug).ok_or_else(|| {
        anyhow!(
            "Unknown dataset '{}' (expected one of: {})",
            slug,
            DatasetKind::ALL
                .iter()
                .map(|k| k.slug())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let catalog = load_catalog()?;
    let dataset = catalog.get(kind);

    println!("\n📋 {} (first 20 rows)", kind.label());
    print!("{}", dataset.table.head(20).render_text());
    println!(
        "\n✓ {} of {} rows shown",
        dataset.table.row_count().min(20),
        dataset.table.row_count()
    );

    Ok(())
}

fn run_ask(words: &[String]) -> Result<()> {
    if words.is_empty() {
        return Err(anyhow!("Usage: policy-analyzer ask <question...>"));
    }
    let question = words.join(" ");

    let catalog = load_catalog()?;
    let context = catalog.combined_context();

    println!("\n🤔 Question: {}", question);
    println!("   Querying hosted model...");

    let client = InferenceClient::new();
    let answer = client.ask(&question, &context)?;

    println!("\n💬 Answer: {}", answer);

    Ok(())
}
