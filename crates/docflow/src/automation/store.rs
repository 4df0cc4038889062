use std::collections::BTreeMap;

use super::domain::{FilingRecord, JobId, JobTicket, SubmissionId};

/// Storage abstraction over the per-vertical application records so the
/// engine can be exercised in isolation; persistence technology lives
/// behind it.
///
/// Draft and document merges happen inside the store so that two pipelines
/// racing on one submission can only lose colliding keys (last merge wins),
/// never each other's distinct artifacts.
pub trait RecordStore: Send + Sync {
    /// Insert the record unless one already exists for its submission id;
    /// returns the surviving row either way.
    fn insert_if_absent(&self, record: FilingRecord) -> Result<FilingRecord, StoreError>;

    fn fetch(&self, submission_id: &SubmissionId) -> Result<Option<FilingRecord>, StoreError>;

    /// Union caller-supplied uploads into the record, last write winning
    /// per document name.
    fn attach_documents(
        &self,
        submission_id: &SubmissionId,
        documents: BTreeMap<String, String>,
    ) -> Result<FilingRecord, StoreError>;

    /// Union generated drafts into the record. Colliding artifact names take
    /// the merged value; non-colliding names accumulate.
    fn merge_drafts(
        &self,
        submission_id: &SubmissionId,
        drafts: BTreeMap<String, String>,
    ) -> Result<FilingRecord, StoreError>;

    /// Record the staged package and mark the record ready for filing.
    fn complete_packaging(
        &self,
        submission_id: &SubmissionId,
        package_path: String,
    ) -> Result<FilingRecord, StoreError>;
}

/// Job-ticket store keyed by job id. One row per execution attempt; rows
/// are history and are never reused across `start` calls.
pub trait JobStore: Send + Sync {
    fn insert(&self, ticket: JobTicket) -> Result<JobTicket, StoreError>;

    fn update(&self, ticket: JobTicket) -> Result<(), StoreError>;

    fn fetch(&self, id: &JobId) -> Result<Option<JobTicket>, StoreError>;

    /// Every execution attempt recorded for a submission, oldest first.
    fn find_by_submission(&self, submission_id: &SubmissionId)
        -> Result<Vec<JobTicket>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
