use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::domain::{FilingRecord, JobId, JobTicket, SubmissionId};
use super::engine::OrchestrationEngine;
use super::registry::StrategyRegistry;
use super::service_type::ServiceType;
use super::store::{JobStore, RecordStore, StoreError};
use crate::config::AutomationConfig;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Error raised while accepting a start request.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Accepts start requests synchronously and hands pipeline execution to
/// independently scheduled tasks.
///
/// The synchronous half normalizes the service type, creates the domain
/// record if absent, and persists a fresh `PENDING` ticket; it may block
/// briefly on that I/O but never on pipeline execution. Spawned tasks wait
/// on a semaphore sized by configuration, bounding how many pipelines run
/// at once without ever stalling the caller.
pub struct AutomationDispatcher<R, J> {
    engine: Arc<OrchestrationEngine<R, J>>,
    records: Arc<R>,
    jobs: Arc<J>,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl<R, J> AutomationDispatcher<R, J>
where
    R: RecordStore + 'static,
    J: JobStore + 'static,
{
    pub fn new(
        records: Arc<R>,
        jobs: Arc<J>,
        registry: Arc<StrategyRegistry>,
        config: &AutomationConfig,
    ) -> Self {
        let engine = Arc::new(OrchestrationEngine::new(
            records.clone(),
            jobs.clone(),
            registry,
            config.stage_deadline(),
        ));

        Self {
            engine,
            records,
            jobs,
            permits: Arc::new(Semaphore::new(config.workers)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Fire-and-forget trigger for one execution attempt.
    ///
    /// Returns the freshly minted ticket id without waiting for the
    /// pipeline; callers observe progress by polling the stores. Every call
    /// creates a new ticket; prior tickets for the same submission remain
    /// as history and are never deduplicated. No ordering is guaranteed
    /// between concurrent calls for one submission.
    pub fn start(
        &self,
        submission_id: &SubmissionId,
        raw_service_type: &str,
    ) -> Result<JobId, DispatchError> {
        let service_type = ServiceType::normalize(raw_service_type);

        self.records.insert_if_absent(FilingRecord::new(
            submission_id.clone(),
            service_type.clone(),
        ))?;

        let mut ticket = JobTicket::new(next_job_id(), submission_id.clone(), service_type.clone());
        ticket.append_log(format!(
            "accepted start request; raw type '{raw_service_type}' normalized to '{service_type}'"
        ));
        let ticket = self.jobs.insert(ticket)?;
        let job_id = ticket.id;

        info!(
            job = %job_id,
            submission = %submission_id,
            service_type = %service_type,
            "scheduling automation pipeline"
        );

        let engine = self.engine.clone();
        let permits = self.permits.clone();
        let cancel = self.shutdown.clone();
        let task_job_id = job_id.clone();
        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                // Semaphore closed: the dispatcher is gone, drop the work.
                Err(_) => return,
            };

            match engine.run(&task_job_id, &cancel).await {
                Ok(status) => {
                    info!(job = %task_job_id, status = status.label(), "pipeline task finished");
                }
                Err(err) => {
                    error!(job = %task_job_id, error = %err, "pipeline task aborted");
                }
            }
        });

        Ok(job_id)
    }

    /// Cancel in-flight pipelines; their tickets fail with a log line naming
    /// the interrupted stage.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
