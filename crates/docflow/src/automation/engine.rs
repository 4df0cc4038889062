use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::domain::{JobId, JobStatus, JobTicket, PipelineStage, SubmissionId};
use super::registry::StrategyRegistry;
use super::store::{JobStore, RecordStore, StoreError};

/// Failure of the engine itself, as opposed to a failed pipeline, which is
/// recorded on the job ticket and reported as `Ok(JobStatus::Failed)`.
///
/// A missing job or record is an explicit result here rather than a silent
/// return, so spawners and observers can log it.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("job '{0}' not found")]
    JobNotFound(JobId),
    #[error("record for submission '{0}' not found")]
    RecordNotFound(SubmissionId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

enum StageInterrupt {
    Cancelled,
    DeadlineExceeded,
}

/// Drives one job ticket through the fixed stage sequence, consulting the
/// strategy registry and persisting progress into both stores.
///
/// ```text
/// INITIATED -> VERIFICATION -> DRAFTING -> PACKAGING -> COMPLETED
///       \------------------------------------------------> FAILED
/// ```
///
/// Each transition appends one ticket log line and persists the ticket
/// before the stage body runs; a crash mid-pipeline leaves the ticket
/// visibly parked at its last persisted stage. Stalled tickets are not
/// resumed automatically.
pub struct OrchestrationEngine<R, J> {
    records: Arc<R>,
    jobs: Arc<J>,
    registry: Arc<StrategyRegistry>,
    stage_deadline: Duration,
}

impl<R, J> OrchestrationEngine<R, J>
where
    R: RecordStore,
    J: JobStore,
{
    pub fn new(
        records: Arc<R>,
        jobs: Arc<J>,
        registry: Arc<StrategyRegistry>,
        stage_deadline: Duration,
    ) -> Self {
        Self {
            records,
            jobs,
            registry,
            stage_deadline,
        }
    }

    /// Run the pipeline for one ticket to a terminal status.
    ///
    /// Pipeline-level failures (no strategy, validation, drafting, deadline
    /// overrun, cancellation) end up on the ticket and yield
    /// `Ok(JobStatus::Failed)`; only store trouble and missing rows surface
    /// as [`EngineError`].
    pub async fn run(
        &self,
        job_id: &JobId,
        cancel: &CancellationToken,
    ) -> Result<JobStatus, EngineError> {
        let mut ticket = self
            .jobs
            .fetch(job_id)?
            .ok_or_else(|| EngineError::JobNotFound(job_id.clone()))?;

        let record = match self.records.fetch(&ticket.submission_id)? {
            Some(record) => record,
            None => {
                let submission_id = ticket.submission_id.clone();
                self.fail(
                    &mut ticket,
                    format!("record for submission '{submission_id}' is missing"),
                )?;
                return Err(EngineError::RecordNotFound(submission_id));
            }
        };

        self.advance(&mut ticket, PipelineStage::Verification)?;
        let strategy = match self.registry.resolve(&ticket.service_type) {
            Some(strategy) => strategy,
            None => {
                let reason = format!("NO_STRATEGY_FOR_{}", ticket.service_type);
                return self.fail(&mut ticket, reason);
            }
        };
        match self.bounded(cancel, strategy.validate(&record)).await {
            Ok(Ok(())) => {}
            // Nothing has written to the record yet, so a validation
            // failure leaves it untouched.
            Ok(Err(validation)) => return self.fail(&mut ticket, validation.to_string()),
            Err(interrupt) => {
                return self.interrupted(&mut ticket, PipelineStage::Verification, interrupt)
            }
        }

        self.advance(&mut ticket, PipelineStage::Drafting)?;
        let drafts = match self.bounded(cancel, strategy.generate_drafts(&record)).await {
            Ok(Ok(drafts)) => drafts,
            Ok(Err(draft_error)) => return self.fail(&mut ticket, draft_error.to_string()),
            Err(interrupt) => {
                return self.interrupted(&mut ticket, PipelineStage::Drafting, interrupt)
            }
        };
        let merged = self.records.merge_drafts(&ticket.submission_id, drafts)?;
        ticket.append_log(format!(
            "merged drafts; record now holds {} artifact(s)",
            merged.generated_drafts.len()
        ));
        self.jobs.update(ticket.clone())?;

        self.advance(&mut ticket, PipelineStage::Packaging)?;
        let package_path = strategy.vertical().package_path(&ticket.submission_id);
        self.records
            .complete_packaging(&ticket.submission_id, package_path.clone())?;
        ticket.append_log(format!("package staged at {package_path}"));
        self.jobs.update(ticket.clone())?;

        ticket.status = JobStatus::Completed;
        ticket.append_log("pipeline completed; record is ready for filing");
        self.jobs.update(ticket.clone())?;
        info!(
            job = %ticket.id,
            submission = %ticket.submission_id,
            service_type = %ticket.service_type,
            "automation pipeline completed"
        );

        Ok(JobStatus::Completed)
    }

    /// Move the ticket to the next stage and persist before the stage body
    /// runs.
    fn advance(&self, ticket: &mut JobTicket, stage: PipelineStage) -> Result<(), EngineError> {
        ticket.current_stage = stage;
        ticket.append_log(format!("stage {} started", stage.label()));
        self.jobs.update(ticket.clone())?;
        Ok(())
    }

    /// Terminal failure for this attempt; retrying means a fresh `start`
    /// call and a fresh ticket.
    fn fail(
        &self,
        ticket: &mut JobTicket,
        reason: impl AsRef<str>,
    ) -> Result<JobStatus, EngineError> {
        let reason = reason.as_ref();
        ticket.status = JobStatus::Failed;
        ticket.append_log(reason);
        self.jobs.update(ticket.clone())?;
        warn!(
            job = %ticket.id,
            submission = %ticket.submission_id,
            stage = ticket.current_stage.label(),
            reason,
            "automation pipeline failed"
        );
        Ok(JobStatus::Failed)
    }

    fn interrupted(
        &self,
        ticket: &mut JobTicket,
        stage: PipelineStage,
        interrupt: StageInterrupt,
    ) -> Result<JobStatus, EngineError> {
        let reason = match interrupt {
            StageInterrupt::Cancelled => {
                format!("pipeline cancelled during stage {}", stage.label())
            }
            StageInterrupt::DeadlineExceeded => format!(
                "stage {} exceeded its deadline of {:?}",
                stage.label(),
                self.stage_deadline
            ),
        };
        self.fail(ticket, reason)
    }

    /// Bound a stage body with the configured per-stage deadline and the
    /// dispatcher's cancellation token.
    async fn bounded<T>(
        &self,
        cancel: &CancellationToken,
        work: impl Future<Output = T>,
    ) -> Result<T, StageInterrupt> {
        tokio::select! {
            _ = cancel.cancelled() => Err(StageInterrupt::Cancelled),
            outcome = timeout(self.stage_deadline, work) => {
                outcome.map_err(|_| StageInterrupt::DeadlineExceeded)
            }
        }
    }
}
