use std::collections::BTreeMap;

use async_trait::async_trait;

use super::domain::{FilingRecord, Vertical};
use super::service_type::ServiceType;

/// Pluggable per-service-type behavior supplying validation and draft
/// generation.
///
/// Document rendering is an external collaborator; implementations may
/// return placeholder locations for the artifacts they name.
#[async_trait]
pub trait AutomationStrategy: Send + Sync {
    /// The single canonical tag this strategy serves. Resolution is
    /// exact-match against this value.
    fn service_type(&self) -> ServiceType;

    /// Vertical owning the submissions this strategy operates on.
    fn vertical(&self) -> Vertical;

    /// Check the record against the strategy's preconditions. A failure
    /// here fails the job and leaves the record unchanged.
    async fn validate(&self, record: &FilingRecord) -> Result<(), ValidationError>;

    /// Produce draft artifacts as a name -> location mapping.
    async fn generate_drafts(
        &self,
        record: &FilingRecord,
    ) -> Result<BTreeMap<String, String>, DraftError>;
}

/// Strategy-specific precondition failure. The message travels into the
/// failed ticket's logs verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("mandatory document '{key}' has not been uploaded")]
    MissingDocument { key: String },
    #[error("submission data invalid: {detail}")]
    Invalid { detail: String },
}

/// Draft generation failure.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("failed to render '{artifact}': {detail}")]
    Render { artifact: String, detail: String },
}

/// Declarative description of one service's checklist-driven automation.
#[derive(Debug, Clone, Copy)]
pub struct StrategyBlueprint {
    pub service_type: &'static str,
    pub vertical: Vertical,
    pub required_documents: &'static [&'static str],
    pub draft_artifacts: &'static [&'static str],
}

/// Generic strategy realizing a [`StrategyBlueprint`]: validation requires
/// each listed document key to be uploaded with a non-empty location, and
/// drafting emits one placeholder location per artifact name.
#[derive(Debug)]
pub struct ChecklistStrategy {
    service_type: ServiceType,
    vertical: Vertical,
    required_documents: &'static [&'static str],
    draft_artifacts: &'static [&'static str],
}

impl ChecklistStrategy {
    pub fn from_blueprint(blueprint: &StrategyBlueprint) -> Self {
        Self {
            service_type: ServiceType::normalize(blueprint.service_type),
            vertical: blueprint.vertical,
            required_documents: blueprint.required_documents,
            draft_artifacts: blueprint.draft_artifacts,
        }
    }

    fn draft_location(&self, record: &FilingRecord, artifact: &str) -> String {
        format!(
            "/uploads/{}/drafts/{}_{}.docx",
            self.vertical.domain_segment(),
            record.submission_id.0,
            artifact
        )
    }
}

#[async_trait]
impl AutomationStrategy for ChecklistStrategy {
    fn service_type(&self) -> ServiceType {
        self.service_type.clone()
    }

    fn vertical(&self) -> Vertical {
        self.vertical
    }

    async fn validate(&self, record: &FilingRecord) -> Result<(), ValidationError> {
        for key in self.required_documents {
            match record.uploaded_documents.get(*key) {
                Some(location) if !location.trim().is_empty() => {}
                Some(_) => {
                    return Err(ValidationError::Invalid {
                        detail: format!("document '{key}' points at an empty location"),
                    })
                }
                None => {
                    return Err(ValidationError::MissingDocument {
                        key: (*key).to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    async fn generate_drafts(
        &self,
        record: &FilingRecord,
    ) -> Result<BTreeMap<String, String>, DraftError> {
        let mut drafts = BTreeMap::new();
        for artifact in self.draft_artifacts {
            drafts.insert(
                (*artifact).to_string(),
                self.draft_location(record, artifact),
            );
        }
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::domain::SubmissionId;

    fn strategy() -> ChecklistStrategy {
        ChecklistStrategy::from_blueprint(&StrategyBlueprint {
            service_type: "gst registration",
            vertical: Vertical::TaxFiling,
            required_documents: &["pan_card", "address_proof"],
            draft_artifacts: &["gst_application_form"],
        })
    }

    fn record_with_documents(documents: &[(&str, &str)]) -> FilingRecord {
        let mut record = FilingRecord::new(
            SubmissionId("SUB-9".to_string()),
            ServiceType::normalize("gst registration"),
        );
        for (name, location) in documents {
            record
                .uploaded_documents
                .insert((*name).to_string(), (*location).to_string());
        }
        record
    }

    #[tokio::test]
    async fn validate_accepts_a_complete_checklist() {
        let record = record_with_documents(&[
            ("pan_card", "/uploads/tax/SUB-9/pan.pdf"),
            ("address_proof", "/uploads/tax/SUB-9/address.pdf"),
        ]);

        assert!(strategy().validate(&record).await.is_ok());
    }

    #[tokio::test]
    async fn validate_names_the_first_missing_document() {
        let record = record_with_documents(&[("pan_card", "/uploads/tax/SUB-9/pan.pdf")]);

        let err = strategy().validate(&record).await.unwrap_err();
        assert!(err.to_string().contains("address_proof"));
    }

    #[tokio::test]
    async fn validate_rejects_empty_document_locations() {
        let record = record_with_documents(&[("pan_card", "  "), ("address_proof", "x")]);

        let err = strategy().validate(&record).await.unwrap_err();
        assert!(matches!(err, ValidationError::Invalid { .. }));
    }

    #[tokio::test]
    async fn drafts_carry_placeholder_locations_per_artifact() {
        let record = record_with_documents(&[]);
        let drafts = strategy().generate_drafts(&record).await.expect("drafts");

        assert_eq!(
            drafts.get("gst_application_form").map(String::as_str),
            Some("/uploads/tax/drafts/SUB-9_gst_application_form.docx")
        );
    }

    #[test]
    fn blueprint_tags_normalize_to_themselves_after_construction() {
        assert_eq!(strategy().service_type().as_str(), "GST_REGISTRATION");
    }
}
