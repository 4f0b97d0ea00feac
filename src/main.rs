// Entry point and high-level CLI flow.
//
// Loads the shelter dataset and county mapping once, runs every dashboard
// question over them, prints Markdown previews and writes the artifacts:
// - `<question>_statewide.csv`: chart series for the statewide view,
// - `<question>_counties.csv`: the ranked county list,
// - `dashboard.json`: every processed dataset plus load diagnostics.
use anyhow::{Context, Result};
use shelter_report::cli::Args;
use shelter_report::config::Config;
use shelter_report::dashboard::{build_dashboard, Dashboard};
use shelter_report::output;
use shelter_report::reports::{county_ranking_rows, Adoption, Intake, Question, Rto, Tno};
use shelter_report::series::{adoption_series, intake_series, rto_series, tno_series, YearWindow};
use shelter_report::sources::DataSources;
use shelter_report::types::CountyEntry;
use shelter_report::util;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse_args();
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Report generation failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_init_config() -> Result<()> {
    let path = Path::new(shelter_report::config::DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists; edit it or remove it first", path.display());
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {} with default settings.", path.display());
    Ok(())
}

fn init_logging(args: &Args) {
    let directives = std::env::var("RUST_LOG").ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(args.log_filter(directives.as_deref()))
        .with_target(false)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(args);
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let sources = DataSources::new(&config.input.dataset, &config.input.mapping);

    let dashboard = build_dashboard(&sources)
        .with_context(|| format!("Failed to load {}", config.input.dataset.display()))?;

    let load = &dashboard.load;
    println!(
        "Processing dataset... ({} rows read, {} kept)",
        util::format_int(load.total_rows),
        util::format_int(load.kept_rows)
    );
    if load.dropped_bad_year > 0 || load.malformed_rows > 0 {
        println!(
            "Note: {} rows skipped for an unreadable year, {} malformed.",
            util::format_int(load.dropped_bad_year),
            util::format_int(load.malformed_rows)
        );
    }
    println!(
        "County mapping: {} counties.\n",
        util::format_int(dashboard.mapped_counties)
    );

    let out_dir = &config.output.dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    write_outputs(&dashboard, out_dir, config.output.preview_rows)?;
    info!(dir = %out_dir.display(), "reports written");
    Ok(())
}

fn write_outputs(dashboard: &Dashboard, out_dir: &Path, preview_rows: usize) -> Result<()> {
    let statewide = YearWindow::statewide();

    emit_question::<Adoption, _>(
        "Adoption Rate (adoptions / total intake)",
        &adoption_series(&dashboard.adoption.statewide, &statewide),
        &dashboard.adoption.counties,
        out_dir,
        preview_rows,
    )?;
    emit_question::<Rto, _>(
        "Return to Owner (returns / stray intake)",
        &rto_series(&dashboard.rto.statewide, &statewide),
        &dashboard.rto.counties,
        out_dir,
        preview_rows,
    )?;
    emit_question::<Intake, _>(
        "Intake by Reason",
        &intake_series(&dashboard.intake.statewide, &statewide),
        &dashboard.intake.counties,
        out_dir,
        preview_rows,
    )?;
    emit_question::<Tno, _>(
        "Out-of-State Transfers and Negative Outcomes",
        &tno_series(&dashboard.tno.statewide, &statewide),
        &dashboard.tno.counties,
        out_dir,
        preview_rows,
    )?;

    let json_path = out_dir.join("dashboard.json");
    output::write_json(&json_path, dashboard)?;
    println!("(Full dataset exported to {})", json_path.display());
    Ok(())
}

fn emit_question<Q, P>(
    title: &str,
    series: &[P],
    counties: &[CountyEntry<Q::Record>],
    out_dir: &Path,
    preview_rows: usize,
) -> Result<()>
where
    Q: Question,
    P: Serialize + Tabled + Clone,
{
    let series_path = out_dir.join(format!("{}_statewide.csv", Q::NAME));
    output::write_csv(&series_path, series)?;
    output::preview_table(title, Some("Statewide, by year"), series, preview_rows);

    let ranking = county_ranking_rows::<Q>(counties);
    let ranking_path = out_dir.join(format!("{}_counties.csv", Q::NAME));
    output::write_csv(&ranking_path, &ranking)?;
    output::preview_table(
        title,
        Some("By county, ranked on 2024"),
        &ranking,
        preview_rows,
    );
    println!(
        "(Full tables exported to {} and {})\n",
        series_path.display(),
        ranking_path.display()
    );
    Ok(())
}
