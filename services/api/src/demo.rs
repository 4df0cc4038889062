use crate::infra::{InMemoryJobStore, InMemoryRecordStore};
use clap::Args;
use docflow::automation::{
    standard_registry, AutomationDispatcher, DispatchError, FilingRecord, JobId, JobStore,
    JobTicket, RecordStore, ServiceType, SubmissionId, STANDARD_BLUEPRINTS,
};
use docflow::config::AutomationConfig;
use docflow::error::AppError;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Submission identifier used for the demo record
    #[arg(long, default_value = "DEMO-0001")]
    pub(crate) submission_id: String,
    /// Raw service-type label to run (normalized on entry)
    #[arg(long, default_value = "gst registration")]
    pub(crate) service_type: String,
    /// Skip the failing unknown-service pipeline at the end
    #[arg(long)]
    pub(crate) skip_failure_demo: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        submission_id,
        service_type,
        skip_failure_demo,
    } = args;

    println!("Document automation demo");

    let records = Arc::new(InMemoryRecordStore::default());
    let jobs = Arc::new(InMemoryJobStore::default());
    let registry = Arc::new(standard_registry());
    println!("- {} strategies registered across the verticals", registry.len());

    let dispatcher = Arc::new(AutomationDispatcher::new(
        records.clone(),
        jobs.clone(),
        registry,
        &AutomationConfig::default(),
    ));

    let submission = SubmissionId(submission_id);
    let normalized = ServiceType::normalize(&service_type);
    println!("- Raw label '{service_type}' normalized to '{normalized}'");

    seed_uploads(&records, &submission, &normalized).map_err(AppError::from)?;

    let job_id = dispatcher
        .start(&submission, &service_type)
        .map_err(AppError::from)?;
    println!("- Started pipeline {job_id}");

    match wait_for_terminal(&jobs, &job_id).await {
        Some(ticket) => render_outcome(&records, &submission, &ticket),
        None => println!("  Pipeline did not settle in time; inspect the ticket store"),
    }

    if skip_failure_demo {
        return Ok(());
    }

    println!("\nUnknown service demo");
    let failing = dispatcher
        .start(&submission, "unknown service")
        .map_err(AppError::from)?;
    println!("- Started pipeline {failing}");

    match wait_for_terminal(&jobs, &failing).await {
        Some(ticket) => {
            println!("  Final status: {}", ticket.status.label());
            if let Some(line) = ticket.logs.last() {
                println!("  Last log line: {line}");
            }
        }
        None => println!("  Pipeline did not settle in time; inspect the ticket store"),
    }

    Ok(())
}

/// Place a placeholder upload for every document the chosen service
/// requires, mirroring what the upload surface would have stored.
fn seed_uploads(
    records: &InMemoryRecordStore,
    submission: &SubmissionId,
    service_type: &ServiceType,
) -> Result<(), DispatchError> {
    records.insert_if_absent(FilingRecord::new(
        submission.clone(),
        service_type.clone(),
    ))?;

    let uploads: BTreeMap<String, String> = STANDARD_BLUEPRINTS
        .iter()
        .find(|blueprint| &ServiceType::normalize(blueprint.service_type) == service_type)
        .map(|blueprint| {
            blueprint
                .required_documents
                .iter()
                .map(|key| {
                    (
                        (*key).to_string(),
                        format!("/uploads/demo/{}_{key}.pdf", submission.0),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    if uploads.is_empty() {
        println!("- No catalog entry for '{service_type}'; starting without uploads");
        return Ok(());
    }

    println!("- Seeded {} uploaded document(s)", uploads.len());
    records.attach_documents(submission, uploads)?;
    Ok(())
}

async fn wait_for_terminal(jobs: &InMemoryJobStore, job_id: &JobId) -> Option<JobTicket> {
    for _ in 0..200 {
        if let Ok(Some(ticket)) = jobs.fetch(job_id) {
            if ticket.status.is_terminal() {
                return Some(ticket);
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    None
}

fn render_outcome(records: &InMemoryRecordStore, submission: &SubmissionId, ticket: &JobTicket) {
    println!("  Final status: {}", ticket.status.label());
    println!("  Ticket log:");
    for line in &ticket.logs {
        println!("    {line}");
    }

    let record = match records.fetch(submission) {
        Ok(Some(record)) => record,
        Ok(None) => {
            println!("  Record lookup returned no row");
            return;
        }
        Err(err) => {
            println!("  Record store unavailable: {err}");
            return;
        }
    };

    println!("  Record status: {}", record.status.label());
    if record.generated_drafts.is_empty() {
        println!("  Generated drafts: none");
    } else {
        println!("  Generated drafts:");
        for (name, location) in &record.generated_drafts {
            println!("    - {name} -> {location}");
        }
    }
    if let Some(path) = &record.package_path {
        println!("  Package staged at {path}");
    }
}
