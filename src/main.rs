use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use trial_dqi::algorithm::aggregation::{
    RiskMatrix, aggregate_sites, calculate_operational_metrics, calculate_query_stats,
    calculate_summary, enrollment_trend, generate_insights,
};
use trial_dqi::algorithm::scoring::{score_patients, score_record_batch};
use trial_dqi::filter::{DashboardFilters, paginate};
use trial_dqi::generator::{GeneratorConfig, generate};
use trial_dqi::io::{
    PATIENTS_FILE, SITES_FILE, load_dataset_dir, load_sites_csv, patients_from_batch,
    read_csv_batches, site_summaries_to_record_batch, write_csv, write_dataset_dir,
    write_parquet, write_summary_json,
};
use trial_dqi::utils::ensure_directory;
use trial_dqi::utils::logging::{create_main_progress_bar, finish_progress_bar};
use trial_dqi::{RiskLevel, ScoringConfig, TrialInfo};

#[derive(Parser)]
#[command(name = "trial-dqi")]
#[command(about = "Data-quality scoring and site aggregation for clinical trial data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic trial dataset
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Number of patients
        #[arg(short, long, default_value = "250")]
        patients: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Probability that a patient is clean (0.0-1.0)
        #[arg(long, default_value = "0.4")]
        clean_ratio: f64,

        /// Resolved queries to add
        #[arg(long, default_value = "50")]
        resolved_queries: usize,
    },

    /// Score patients and aggregate sites
    Score {
        /// Data directory containing patients.csv (and optionally sites.csv)
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Scoring configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output table format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,
    },

    /// Log a monitoring report for a filtered view
    Report {
        /// Data directory containing patients.csv
        #[arg(short, long)]
        data: PathBuf,

        /// Scoring configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Site ids to include (repeatable)
        #[arg(long = "site")]
        sites: Vec<String>,

        /// Subject statuses to include (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Risk levels to include (repeatable)
        #[arg(long = "risk")]
        risk_levels: Vec<String>,

        /// Only clean patients
        #[arg(long)]
        clean_only: bool,

        /// Only patients with issues
        #[arg(long)]
        issues_only: bool,

        /// Minimum DQI
        #[arg(long)]
        min_dqi: Option<f64>,

        /// Maximum DQI
        #[arg(long)]
        max_dqi: Option<f64>,

        /// Earliest enrollment date (YYYY-MM-DD)
        #[arg(long)]
        enrolled_from: Option<NaiveDate>,

        /// Latest enrollment date (YYYY-MM-DD)
        #[arg(long)]
        enrolled_to: Option<NaiveDate>,

        /// Disease area
        #[arg(long)]
        disease: Option<String>,

        /// Free-text search
        #[arg(long)]
        search: Option<String>,

        /// Page of patient rows to log
        #[arg(long, default_value = "1")]
        page: usize,

        /// Patient rows per page
        #[arg(long, default_value = "10")]
        per_page: usize,
    },
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let config = match path {
        Some(path) => ScoringConfig::from_json_file(path)
            .with_context(|| format!("Failed to load scoring config {}", path.display()))?,
        None => ScoringConfig::default(),
    };
    info!("{config}");
    Ok(config)
}

fn run_generate(
    output: &Path,
    patients: usize,
    seed: u64,
    clean_ratio: f64,
    resolved_queries: usize,
) -> Result<()> {
    let config = GeneratorConfig {
        seed,
        num_patients: patients,
        clean_ratio,
        resolved_queries,
        show_progress: true,
        ..Default::default()
    };
    info!("{config}");

    let dataset = generate(&config).context("Failed to generate dataset")?;
    write_dataset_dir(output, &dataset.patients, &dataset.sites, &dataset.queries)
        .with_context(|| format!("Failed to write dataset to {}", output.display()))?;
    Ok(())
}

fn run_score(data: &Path, output: &Path, config: &ScoringConfig, format: OutputFormat) -> Result<()> {
    let start = Instant::now();
    let patients_path = data.join(PATIENTS_FILE);
    let (schema, batches) = read_csv_batches(&patients_path)
        .with_context(|| format!("Failed to read {}", patients_path.display()))?;

    let pb = create_main_progress_bar(batches.len() as u64, Some("Scoring batches"));
    let scored = batches
        .par_iter()
        .map(|batch| {
            let result = score_record_batch(batch, config);
            pb.inc(1);
            result
        })
        .collect::<trial_dqi::Result<Vec<RecordBatch>>>()
        .context("Failed to score patients")?;
    finish_progress_bar(&pb, Some("Scoring complete"));

    let scored_schema = match scored.first() {
        Some(batch) => batch.schema(),
        None => score_record_batch(&RecordBatch::new_empty(schema), config)?.schema(),
    };
    let scored = concat_batches(&scored_schema, &scored)?;
    let patients = patients_from_batch(&scored)?;

    let sites_path = data.join(SITES_FILE);
    let roster = if sites_path.is_file() {
        load_sites_csv(&sites_path)
            .with_context(|| format!("Failed to read {}", sites_path.display()))?
    } else {
        Vec::new()
    };
    let sites = aggregate_sites(&patients, &roster, config);
    let summary = calculate_summary(&patients, config);

    ensure_directory(output)?;
    let sites_batch = site_summaries_to_record_batch(&sites)?;
    let ext = format.extension();
    let scored_path = output.join(format!("scored_patients.{ext}"));
    let sites_out = output.join(format!("site_summaries.{ext}"));
    match format {
        OutputFormat::Csv => {
            write_csv(&scored, &scored_path)?;
            write_csv(&sites_batch, &sites_out)?;
        }
        OutputFormat::Parquet => {
            write_parquet(&scored, &scored_path)?;
            write_parquet(&sites_batch, &sites_out)?;
        }
    }
    write_summary_json(&summary, &output.join("summary.json"))?;

    info!("{summary}");
    info!(
        "Scored {} patients across {} sites in {:?}",
        patients.len(),
        sites.len(),
        start.elapsed()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_filters(
    sites: Vec<String>,
    statuses: Vec<String>,
    risk_levels: &[String],
    clean_only: bool,
    issues_only: bool,
    dqi_range: (Option<f64>, Option<f64>),
    enrolled: (Option<NaiveDate>, Option<NaiveDate>),
    disease: Option<String>,
    search: Option<String>,
) -> Result<DashboardFilters> {
    let risk_levels = risk_levels
        .iter()
        .map(|s| s.parse::<RiskLevel>())
        .collect::<trial_dqi::Result<Vec<_>>>()?;

    let dqi_range = match dqi_range {
        (None, None) => None,
        (min, max) => {
            let (min, max) = (min.unwrap_or(0.0), max.unwrap_or(100.0));
            if min > max {
                bail!("--min-dqi ({min}) must not exceed --max-dqi ({max})");
            }
            Some((min, max))
        }
    };

    Ok(DashboardFilters {
        sites,
        subject_statuses: statuses,
        clean_only,
        issues_only,
        risk_levels,
        dqi_range,
        enrolled_from: enrolled.0,
        enrolled_to: enrolled.1,
        disease,
        search,
    })
}

fn run_report(
    data: &Path,
    config: &ScoringConfig,
    filters: &DashboardFilters,
    page: usize,
    per_page: usize,
) -> Result<()> {
    let dataset = load_dataset_dir(data)
        .with_context(|| format!("Failed to load data directory {}", data.display()))?;
    let scored = score_patients(&dataset.patients, config);
    let patients = filters.apply(&scored, config);

    let in_view: FxHashSet<&str> = patients.iter().map(|p| p.patient_id.as_str()).collect();
    let queries: Vec<_> = dataset
        .queries
        .iter()
        .filter(|q| in_view.contains(q.patient_id.as_str()))
        .cloned()
        .collect();

    let trial = TrialInfo::default();
    let summary = calculate_summary(&patients, config);
    let metrics = calculate_operational_metrics(&patients, &trial);
    let matrix = RiskMatrix::from_patients(&patients, config);
    let sites = aggregate_sites(&patients, &dataset.sites, config);
    let query_stats = calculate_query_stats(&queries, None);

    info!("{trial}");
    info!("{summary}");
    info!(
        "Operations: {} active, {:.1} visits on average, {:.1}% queries resolved, \
         {:.1}% forms verified, {} protocol deviations, {:.1}% enrolled",
        metrics.active_patients,
        metrics.avg_visits_completed,
        metrics.query_resolution_rate,
        metrics.forms_verified_rate,
        metrics.total_protocol_deviations,
        metrics.enrollment_progress
    );
    for (risk, [clean, not_clean]) in matrix.rows() {
        info!("Risk {risk}: {clean} clean, {not_clean} not clean");
    }
    for point in enrollment_trend(&patients) {
        info!("Enrolled {}: {}", point.month.format("%Y-%m"), point.count);
    }
    info!(
        "Queries: {} total, {} open ({:.1} days average age), {} resolved",
        query_stats.total, query_stats.open, query_stats.avg_open_age_days, query_stats.resolved
    );
    for site in &sites {
        info!(
            "{}: {} patients, {:.1}% clean, DQI {:.1} [{}]",
            site.site_id,
            site.total_patients_enrolled,
            site.clean_percentage,
            site.avg_dqi,
            site.performance_status
        );
    }
    for insight in generate_insights(&sites, &summary, config) {
        info!("{insight}");
    }

    let view = paginate(&patients, page, per_page);
    info!(
        "Patients {}-{} of {} (page {}/{})",
        view.first_row(),
        view.last_row(),
        view.total_items,
        view.page,
        view.total_pages
    );
    for patient in view.items {
        info!(
            "  {} {} {} DQI {:.1} {}",
            patient.patient_id,
            patient.site_id.as_deref().unwrap_or("-"),
            patient.clean_status.map_or("-", |s| s.as_str()),
            patient.dqi_score.unwrap_or_default(),
            patient.risk_level.map_or("-", |r| r.as_str())
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            output,
            patients,
            seed,
            clean_ratio,
            resolved_queries,
        } => run_generate(&output, patients, seed, clean_ratio, resolved_queries),
        Commands::Score {
            data,
            output,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            run_score(&data, &output, &config, format)
        }
        Commands::Report {
            data,
            config,
            sites,
            statuses,
            risk_levels,
            clean_only,
            issues_only,
            min_dqi,
            max_dqi,
            enrolled_from,
            enrolled_to,
            disease,
            search,
            page,
            per_page,
        } => {
            let config = load_config(config.as_deref())?;
            let filters = build_filters(
                sites,
                statuses,
                &risk_levels,
                clean_only,
                issues_only,
                (min_dqi, max_dqi),
                (enrolled_from, enrolled_to),
                disease,
                search,
            )?;
            run_report(&data, &config, &filters, page, per_page)
        }
    }
}
