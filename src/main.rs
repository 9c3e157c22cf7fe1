use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

mod config;
mod error;
mod filter;
mod models;
mod report;
mod risk;
mod seed;
mod state;
mod thresholds;
mod upload;

use config::DashboardConfig;
use error::UploadError;
use models::{StudentRecord, ALL};
use state::FilterState;
use upload::{UploadKind, UploadStatus, Uploader};

#[derive(Parser)]
#[command(name = "student-risk-dashboard")]
#[command(about = "Student risk monitoring dashboard", long_about = None)]
struct Cli {
    /// TOML config file (falls back to $STUDENT_RISK_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// CSV or JSON roster used instead of the built-in mock students
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive search over name and class
    #[arg(long)]
    query: Option<String>,
    /// Exact class value, or "all"
    #[arg(long)]
    class: Option<String>,
    /// low, medium, high, or "all"
    #[arg(long)]
    risk: Option<String>,
    /// Ignore the configured default class and risk filters
    #[arg(long)]
    clear: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show risk tier counts across all students
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// List students matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Export a markdown report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upload a student data file
    Upload {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = UploadKind::Roster)]
        kind: UploadKind,
    },
    /// Classify attendance and test percentages
    Classify {
        #[arg(long)]
        attendance: Option<f64>,
        #[arg(long)]
        test_score: Option<f64>,
    },
    /// List selectable class values
    Classes,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn load_students(
    data: Option<PathBuf>,
    config: &DashboardConfig,
) -> anyhow::Result<Vec<StudentRecord>> {
    let Some(path) = data.or_else(|| config.data.clone()) else {
        debug!("using built-in mock students");
        return Ok(seed::mock_students());
    };

    let uploader = Uploader::new(UploadKind::Roster, config.accepted_formats.clone());
    let outcome = uploader
        .run(path.clone())
        .await
        .with_context(|| format!("failed to load students from {}", path.display()))?;
    Ok(outcome.records)
}

fn filter_state(filters: FilterArgs, config: &DashboardConfig) -> FilterState {
    let mut state = FilterState::new();
    state.set_class_filter(config.default_class.as_str());
    state.set_risk_filter(config.default_risk.as_str());
    if filters.clear {
        state.reset();
    }

    if let Some(query) = filters.query {
        state.set_query(query);
    }
    if let Some(class) = filters.class {
        state.set_class_filter(class);
    }
    if let Some(risk) = filters.risk {
        state.set_risk_filter(risk);
    }
    state
}

fn apply_filters(
    students: &[StudentRecord],
    state: &FilterState,
) -> anyhow::Result<Vec<StudentRecord>> {
    let spec = state.spec();
    if spec.risk_filter != ALL {
        let tier = risk::resolve_tier(&spec.risk_filter)
            .context("--risk (or default_risk) must be low, medium, high or all")?;
        debug!(tier = tier.label, severity = tier.severity_rank, "risk filter resolved");
    }
    if state.is_permissive() {
        debug!("no filters active");
    }

    let filtered = filter::filter_records(students, spec)?;
    info!(
        matched = filtered.len(),
        total = students.len(),
        "filters applied"
    );
    Ok(filtered)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary { json } => {
            let students = load_students(cli.data, &config).await?;
            let counts = report::count_by_tier(&students);
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                print!("{}", report::render_summary(&counts));
            }
        }
        Commands::List { filters, json } => {
            let students = load_students(cli.data, &config).await?;
            let state = filter_state(filters, &config);
            let filtered = apply_filters(&students, &state)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&filtered)?);
            } else {
                print!("{}", report::render_roster(&filtered));
            }
        }
        Commands::Report { filters, out } => {
            let students = load_students(cli.data, &config).await?;
            let state = filter_state(filters, &config);
            let filtered = apply_filters(&students, &state)?;
            let out = out.unwrap_or_else(|| config.report_out.clone());
            let report = report::build_report(
                &students,
                &filtered,
                state.spec(),
                chrono::Utc::now().date_naive(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Upload { file, kind } => {
            let uploader = Uploader::new(kind, config.accepted_formats.clone());
            println!("{}: {}", kind.title(), kind.description());
            println!(
                "Supported formats: {}",
                uploader.accepted_formats().join(", ")
            );
            println!("{}", uploader.status().message());

            let uploading = UploadStatus::Uploading {
                file_name: file.display().to_string(),
            };
            println!("{}", uploading.message());

            let mut status = uploader.subscribe();
            let handle = uploader.start(file);
            let result = handle
                .await
                .map_err(|err| UploadError::Aborted(err.to_string()))
                .and_then(|result| result);

            match result {
                Ok(outcome) => {
                    println!("{}", status.borrow_and_update().message());
                    println!(
                        "{} ({:.2} MB, {} records) at {}",
                        outcome.file.name,
                        outcome.file.size_mb(),
                        outcome.records.len(),
                        outcome.file.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                    let counts = report::count_by_tier(&outcome.records);
                    print!("{}", report::render_summary(&counts));
                }
                Err(err) => {
                    println!("{}", status.borrow_and_update().message());
                    let title = uploader.kind().title();
                    return Err(err).context(format!("{title} upload failed"));
                }
            }
        }
        Commands::Classify {
            attendance,
            test_score,
        } => {
            if attendance.is_none() && test_score.is_none() {
                anyhow::bail!("pass --attendance and/or --test-score");
            }
            if let Some(pct) = attendance {
                println!(
                    "attendance {}%: {}",
                    pct,
                    thresholds::classify_attendance(pct).label()
                );
            }
            if let Some(pct) = test_score {
                println!(
                    "test score {}%: {}",
                    pct,
                    thresholds::classify_test_score(pct).label()
                );
            }
        }
        Commands::Classes => {
            let students = load_students(cli.data, &config).await?;
            for class in filter::available_classes(&students) {
                println!("{class}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(risk: Option<&str>, clear: bool) -> FilterArgs {
        FilterArgs {
            query: None,
            class: None,
            risk: risk.map(str::to_string),
            clear,
        }
    }

    fn config_with_defaults() -> DashboardConfig {
        DashboardConfig {
            default_class: "10B".to_string(),
            default_risk: "medium".to_string(),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn clear_drops_configured_defaults() {
        let config = config_with_defaults();
        let state = filter_state(args(None, false), &config);
        assert_eq!(state.spec().class_filter, "10B");
        assert_eq!(state.spec().risk_filter, "medium");

        let cleared = filter_state(args(None, true), &config);
        assert!(cleared.is_permissive());

        let cleared_with_risk = filter_state(args(Some("high"), true), &config);
        assert_eq!(cleared_with_risk.spec().class_filter, ALL);
        assert_eq!(cleared_with_risk.spec().risk_filter, "high");
    }

    #[test]
    fn apply_filters_rejects_unknown_risk_level() {
        let state = filter_state(args(Some("extreme"), false), &DashboardConfig::default());
        let err = apply_filters(&seed::mock_students(), &state).unwrap_err();
        assert_eq!(
            err.downcast_ref::<error::DashboardError>(),
            Some(&error::DashboardError::InvalidRiskLevel("extreme".to_string()))
        );
    }

    #[test]
    fn apply_filters_uses_configured_defaults() {
        let state = filter_state(args(None, false), &config_with_defaults());
        let filtered = apply_filters(&seed::mock_students(), &state).unwrap();
        let names: Vec<&str> = filtered.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sneha Patel", "Aditya Jain"]);
    }
}
