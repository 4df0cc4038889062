use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::service_type::ServiceType;

/// Caller-supplied identifier correlating a domain record, its job tickets,
/// and uploaded or generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one pipeline execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle tag on the durable per-submission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Initiated,
    ReadyForFiling,
}

impl RecordStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initiated => "INITIATED",
            Self::ReadyForFiling => "READY_FOR_FILING",
        }
    }
}

/// One step of the fixed automation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Initiated,
    Verification,
    Drafting,
    Packaging,
}

impl PipelineStage {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Initiated,
            Self::Verification,
            Self::Drafting,
            Self::Packaging,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Initiated => "INITIATED",
            Self::Verification => "VERIFICATION",
            Self::Drafting => "DRAFTING",
            Self::Packaging => "PACKAGING",
        }
    }
}

/// Outcome tag on a job ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Business vertical owning a family of service offerings.
///
/// The vertical fixes where packaged output lands: generated package paths
/// follow `/uploads/<domain>/<submissionId>_<suffix>` so artifacts stay
/// diagnosable by humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    CompanyRegistration,
    TaxFiling,
    LegalDrafting,
    LabourCompliance,
    IntellectualProperty,
    Licensing,
}

impl Vertical {
    pub const fn domain_segment(self) -> &'static str {
        match self {
            Self::CompanyRegistration => "roc",
            Self::TaxFiling => "tax",
            Self::LegalDrafting => "legal",
            Self::LabourCompliance => "labour",
            Self::IntellectualProperty => "ip",
            Self::Licensing => "licenses",
        }
    }

    pub const fn package_suffix(self) -> &'static str {
        match self {
            Self::CompanyRegistration => "ComplianceKit.zip",
            Self::TaxFiling => "ReturnPackage.zip",
            Self::LegalDrafting => "DraftBundle.zip",
            Self::LabourCompliance => "RegisterKit.zip",
            Self::IntellectualProperty => "FilingPack.zip",
            Self::Licensing => "LicenseKit.zip",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyRegistration => "Company Registration",
            Self::TaxFiling => "Tax Filing",
            Self::LegalDrafting => "Legal Drafting",
            Self::LabourCompliance => "Labour Compliance",
            Self::IntellectualProperty => "Intellectual Property",
            Self::Licensing => "Licenses",
        }
    }

    pub fn package_path(self, submission_id: &SubmissionId) -> String {
        format!(
            "/uploads/{}/{}_{}",
            self.domain_segment(),
            submission_id.0,
            self.package_suffix()
        )
    }
}

/// Durable per-submission business record owned by a vertical.
///
/// Created lazily the first time automation starts for a submission id;
/// never deleted by the engine. `uploaded_documents` is caller-supplied,
/// `generated_drafts` and `package_path` are engine-populated.
#[derive(Debug, Clone, Serialize)]
pub struct FilingRecord {
    pub submission_id: SubmissionId,
    pub service_type: ServiceType,
    pub status: RecordStatus,
    pub uploaded_documents: BTreeMap<String, String>,
    pub generated_drafts: BTreeMap<String, String>,
    pub package_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilingRecord {
    pub fn new(submission_id: SubmissionId, service_type: ServiceType) -> Self {
        let now = Utc::now();
        Self {
            submission_id,
            service_type,
            status: RecordStatus::Initiated,
            uploaded_documents: BTreeMap::new(),
            generated_drafts: BTreeMap::new(),
            package_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status_view(&self) -> RecordStatusView {
        RecordStatusView {
            submission_id: self.submission_id.clone(),
            service_type: self.service_type.clone(),
            status: self.status.label(),
            generated_drafts: self.generated_drafts.clone(),
            package_path: self.package_path.clone(),
        }
    }
}

/// Progress record for one execution attempt, distinct from the domain
/// record it operates on. `submission_id` is a lookup-only back-reference;
/// several tickets may co-exist for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct JobTicket {
    pub id: JobId,
    pub submission_id: SubmissionId,
    pub service_type: ServiceType,
    pub current_stage: PipelineStage,
    pub status: JobStatus,
    pub logs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobTicket {
    pub fn new(id: JobId, submission_id: SubmissionId, service_type: ServiceType) -> Self {
        let now = Utc::now();
        Self {
            id,
            submission_id,
            service_type,
            current_stage: PipelineStage::Initiated,
            status: JobStatus::Pending,
            logs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append one timestamped line. Lines are never rewritten or removed.
    pub fn append_log(&mut self, message: impl AsRef<str>) {
        let now = Utc::now();
        self.logs.push(format!(
            "{} {}",
            now.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            message.as_ref()
        ));
        self.updated_at = now;
    }

    pub fn status_view(&self) -> JobStatusView {
        JobStatusView {
            job_id: self.id.clone(),
            submission_id: self.submission_id.clone(),
            service_type: self.service_type.clone(),
            stage: self.current_stage.label(),
            status: self.status.label(),
            logs: self.logs.clone(),
        }
    }
}

/// Sanitized projection of a ticket for status polling.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusView {
    pub job_id: JobId,
    pub submission_id: SubmissionId,
    pub service_type: ServiceType,
    pub stage: &'static str,
    pub status: &'static str,
    pub logs: Vec<String>,
}

/// Sanitized projection of a record for status polling.
#[derive(Debug, Clone, Serialize)]
pub struct RecordStatusView {
    pub submission_id: SubmissionId,
    pub service_type: ServiceType,
    pub status: &'static str,
    pub generated_drafts: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_path_follows_the_upload_convention() {
        let submission = SubmissionId("SUB-2041".to_string());
        assert_eq!(
            Vertical::CompanyRegistration.package_path(&submission),
            "/uploads/roc/SUB-2041_ComplianceKit.zip"
        );
        assert_eq!(
            Vertical::TaxFiling.package_path(&submission),
            "/uploads/tax/SUB-2041_ReturnPackage.zip"
        );
    }

    #[test]
    fn ticket_logs_are_append_only_and_ordered() {
        let mut ticket = JobTicket::new(
            JobId("job-000001".to_string()),
            SubmissionId("SUB-1".to_string()),
            ServiceType::normalize("gst registration"),
        );

        ticket.append_log("first");
        ticket.append_log("second");

        assert_eq!(ticket.logs.len(), 2);
        assert!(ticket.logs[0].ends_with("first"));
        assert!(ticket.logs[1].ends_with("second"));
    }

    #[test]
    fn fresh_tickets_start_pending_at_the_initial_stage() {
        let ticket = JobTicket::new(
            JobId("job-000002".to_string()),
            SubmissionId("SUB-2".to_string()),
            ServiceType::normalize("income tax return"),
        );

        assert_eq!(ticket.current_stage, PipelineStage::Initiated);
        assert_eq!(ticket.status, JobStatus::Pending);
        assert!(!ticket.status.is_terminal());
    }

    #[test]
    fn status_labels_match_the_published_vocabulary() {
        assert_eq!(RecordStatus::ReadyForFiling.label(), "READY_FOR_FILING");
        assert_eq!(JobStatus::Failed.label(), "FAILED");
        assert_eq!(PipelineStage::ordered().map(PipelineStage::label).to_vec(), vec![
            "INITIATED",
            "VERIFICATION",
            "DRAFTING",
            "PACKAGING"
        ]);
    }
}
