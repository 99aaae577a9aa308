use anyhow::{Context, Result};
use clap::Parser;
use foodfacets::{config::Cli, run};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) resolve configuration ────────────────────────────────────
    let config = Cli::parse().resolve()?;
    info!(
        food_des = %config.food_des.display(),
        fd_group = %config.fd_group.display(),
        output_dir = %config.output_dir.display(),
        on_malformed = ?config.on_malformed,
        "configured"
    );

    // ─── 3) parse, group, write ──────────────────────────────────────
    let summary = run(&config).with_context(|| {
        format!(
            "building modifier lists from {} and {}",
            config.food_des.display(),
            config.fd_group.display()
        )
    })?;

    info!(
        food_records = summary.food_records,
        category_records = summary.category_records,
        skipped_lines = summary.skipped_lines,
        categories = summary.categories,
        foods = summary.foods,
        modifiers = summary.modifiers,
        files = summary.files_written,
        "all done"
    );
    Ok(())
}
