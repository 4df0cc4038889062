use chrono::Utc;
use docflow::automation::{
    FilingRecord, JobId, JobStore, JobTicket, RecordStatus, RecordStore, StoreError, SubmissionId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    records: Arc<Mutex<HashMap<SubmissionId, FilingRecord>>>,
}

impl RecordStore for InMemoryRecordStore {
    fn insert_if_absent(&self, record: FilingRecord) -> Result<FilingRecord, StoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .entry(record.submission_id.clone())
            .or_insert(record)
            .clone())
    }

    fn fetch(&self, submission_id: &SubmissionId) -> Result<Option<FilingRecord>, StoreError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard.get(submission_id).cloned())
    }

    fn attach_documents(
        &self,
        submission_id: &SubmissionId,
        documents: BTreeMap<String, String>,
    ) -> Result<FilingRecord, StoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        let record = guard.get_mut(submission_id).ok_or(StoreError::NotFound)?;
        record.uploaded_documents.extend(documents);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn merge_drafts(
        &self,
        submission_id: &SubmissionId,
        drafts: BTreeMap<String, String>,
    ) -> Result<FilingRecord, StoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        let record = guard.get_mut(submission_id).ok_or(StoreError::NotFound)?;
        record.generated_drafts.extend(drafts);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn complete_packaging(
        &self,
        submission_id: &SubmissionId,
        package_path: String,
    ) -> Result<FilingRecord, StoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        let record = guard.get_mut(submission_id).ok_or(StoreError::NotFound)?;
        record.package_path = Some(package_path);
        record.status = RecordStatus::ReadyForFiling;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

/// Ticket rows kept in insertion order so submission history reads oldest
/// first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryJobStore {
    tickets: Arc<Mutex<Vec<JobTicket>>>,
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, ticket: JobTicket) -> Result<JobTicket, StoreError> {
        let mut guard = self.tickets.lock().expect("job mutex poisoned");
        if guard.iter().any(|existing| existing.id == ticket.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(ticket.clone());
        Ok(ticket)
    }

    fn update(&self, ticket: JobTicket) -> Result<(), StoreError> {
        let mut guard = self.tickets.lock().expect("job mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == ticket.id) {
            Some(existing) => {
                *existing = ticket;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobTicket>, StoreError> {
        let guard = self.tickets.lock().expect("job mutex poisoned");
        Ok(guard.iter().find(|ticket| &ticket.id == id).cloned())
    }

    fn find_by_submission(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<Vec<JobTicket>, StoreError> {
        let guard = self.tickets.lock().expect("job mutex poisoned");
        Ok(guard
            .iter()
            .filter(|ticket| &ticket.submission_id == submission_id)
            .cloned()
            .collect())
    }
}
