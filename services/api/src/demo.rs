use crate::infra::load_defect_source;
use clap::Args;
use road_triage::config::AppConfig;
use road_triage::error::AppError;
use road_triage::workflows::triage::{
    AllocationConstraints, AllocationReport, AllocationRequest, DefectAnalytics,
    InMemoryDefectSource, InvalidDefect, TriageService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Available repair budget in major currency units
    #[arg(long)]
    pub(crate) budget: f64,
    /// Defect CSV export (defaults to APP_DEFECTS_CSV, then the built-in Oxford dataset)
    #[arg(long)]
    pub(crate) defects_csv: Option<PathBuf>,
    /// Fund at most this many defects
    #[arg(long)]
    pub(crate) max_projects: Option<i64>,
    /// Defer non-High defects whose condition is at or above this score
    #[arg(long)]
    pub(crate) target_condition: Option<i64>,
    /// Prefer busier roads when priority scores tie
    #[arg(long)]
    pub(crate) prioritize_traffic: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyticsArgs {
    /// Defect CSV export (defaults to APP_DEFECTS_CSV, then the built-in Oxford dataset)
    #[arg(long)]
    pub(crate) defects_csv: Option<PathBuf>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_allocation(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        budget,
        defects_csv,
        max_projects,
        target_condition,
        prioritize_traffic,
        json,
    } = args;

    let service = build_service(defects_csv)?;
    let mut request = AllocationRequest::new(budget);
    request.constraints = Some(AllocationConstraints {
        prioritize_traffic,
        maximum_projects: max_projects,
        target_condition_score: target_condition,
    });

    let report = service.recommend(request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_allocation(&report);
    }
    Ok(())
}

pub(crate) fn run_analytics(args: AnalyticsArgs) -> Result<(), AppError> {
    let service = build_service(args.defects_csv)?;
    let analytics = service.analytics()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
    } else {
        render_analytics(&analytics);
    }
    Ok(())
}

fn build_service(
    defects_csv: Option<PathBuf>,
) -> Result<TriageService<InMemoryDefectSource>, AppError> {
    let config = AppConfig::load()?;
    let path = defects_csv.or(config.defects_csv);
    let source = load_defect_source(path.as_deref())?;
    Ok(TriageService::new(Arc::new(source), config.scoring)?)
}

pub(crate) fn render_allocation(report: &AllocationReport) {
    let recommendation = &report.recommendation;
    let summary = &recommendation.summary;

    println!("Road repair budget allocation");
    println!(
        "Budget {} | allocated {} | remaining {} | requested {}",
        summary.budget, summary.total_allocated, summary.budget_remaining, summary.total_requested
    );

    if recommendation.funded.is_empty() {
        println!("\nFunded: none");
    } else {
        println!("\nFunded ({})", summary.funded_count);
        for item in &recommendation.funded {
            let road = item.details.road_name.as_deref().unwrap_or("unnamed road");
            let share = if item.partial { " (partial)" } else { "" };
            println!(
                "- #{} [{}] {}, score {}, {} of {}{}",
                item.rank,
                item.defect_id,
                road,
                item.priority_score,
                item.amount,
                item.estimated_repair_cost,
                share
            );
            println!("    {}", item.recommended_action);
        }
    }

    if recommendation.deferred.is_empty() {
        println!("\nDeferred: none");
    } else {
        println!("\nDeferred ({})", summary.deferred_count);
        for group in &recommendation.deferred {
            let members: Vec<String> = group
                .defects
                .iter()
                .map(|entry| format!("#{} [{}]", entry.rank, entry.defect_id))
                .collect();
            println!("- {}: {}", group.reason.label(), members.join(", "));
        }
    }

    render_rejected(&report.rejected);
}

pub(crate) fn render_analytics(analytics: &DefectAnalytics) {
    println!("Defect analytics");
    println!(
        "Total defects {} | critical {} | average repair cost {}",
        analytics.total_defects, analytics.critical_count, analytics.average_repair_cost
    );

    if analytics.worst_affected_areas.is_empty() {
        println!("\nWorst-affected areas: none");
        return;
    }

    println!("\nWorst-affected areas");
    for area in &analytics.worst_affected_areas {
        println!(
            "- ({:.4}, {:.4}): {} defects, mean score {:.1}, density {}",
            area.location.lat, area.location.lng, area.defect_count, area.severity, area.score_density
        );
    }
}

fn render_rejected(rejected: &[InvalidDefect]) {
    if rejected.is_empty() {
        return;
    }
    println!("\nRejected records ({})", rejected.len());
    for invalid in rejected {
        println!("- {invalid}");
    }
}
