use std::sync::Arc;

use super::domain::Vertical;
use super::registry::StrategyRegistry;
use super::strategy::{ChecklistStrategy, StrategyBlueprint};

/// Build the registry the six business verticals register at startup.
pub fn standard_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    for blueprint in STANDARD_BLUEPRINTS {
        registry.register(Arc::new(ChecklistStrategy::from_blueprint(blueprint)));
    }
    registry
}

/// Standard service catalog: canonical tag, owning vertical, mandatory
/// uploaded-document keys, and the draft artifacts each pipeline produces.
pub const STANDARD_BLUEPRINTS: &[StrategyBlueprint] = &[
    // Company registration (ROC)
    StrategyBlueprint {
        service_type: "PRIVATE_LIMITED_INCORPORATION",
        vertical: Vertical::CompanyRegistration,
        required_documents: &["director_pan", "director_address_proof", "registered_office_proof"],
        draft_artifacts: &["spice_part_b", "moa_draft", "aoa_draft"],
    },
    StrategyBlueprint {
        service_type: "LLP_INCORPORATION",
        vertical: Vertical::CompanyRegistration,
        required_documents: &["partner_pan", "partner_address_proof", "registered_office_proof"],
        draft_artifacts: &["fillip_form", "llp_agreement_draft"],
    },
    StrategyBlueprint {
        service_type: "ANNUAL_ROC_FILING",
        vertical: Vertical::CompanyRegistration,
        required_documents: &["financial_statements", "board_report"],
        draft_artifacts: &["aoc4_form", "mgt7_form"],
    },
    // Tax filing
    StrategyBlueprint {
        service_type: "GST_REGISTRATION",
        vertical: Vertical::TaxFiling,
        required_documents: &["pan_card", "address_proof", "bank_statement"],
        draft_artifacts: &["gst_reg_01", "authorization_letter"],
    },
    StrategyBlueprint {
        service_type: "GST_RETURN_FILING",
        vertical: Vertical::TaxFiling,
        required_documents: &["sales_register", "purchase_register"],
        draft_artifacts: &["gstr1_summary", "gstr3b_summary"],
    },
    StrategyBlueprint {
        service_type: "INCOME_TAX_RETURN",
        vertical: Vertical::TaxFiling,
        required_documents: &["form_16", "bank_statement"],
        draft_artifacts: &["itr_computation", "itr_form"],
    },
    // Legal drafting
    StrategyBlueprint {
        service_type: "NDA_NON_DISCLOSURE",
        vertical: Vertical::LegalDrafting,
        required_documents: &["party_details"],
        draft_artifacts: &["nda_draft"],
    },
    StrategyBlueprint {
        service_type: "EMPLOYMENT_AGREEMENT",
        vertical: Vertical::LegalDrafting,
        required_documents: &["party_details", "role_terms"],
        draft_artifacts: &["employment_agreement_draft"],
    },
    StrategyBlueprint {
        service_type: "FOUNDERS_AGREEMENT",
        vertical: Vertical::LegalDrafting,
        required_documents: &["party_details", "equity_split"],
        draft_artifacts: &["founders_agreement_draft"],
    },
    // Labour compliance
    StrategyBlueprint {
        service_type: "PF_REGISTRATION",
        vertical: Vertical::LabourCompliance,
        required_documents: &["establishment_proof", "employee_roster"],
        draft_artifacts: &["pf_application", "employee_declarations"],
    },
    StrategyBlueprint {
        service_type: "ESI_REGISTRATION",
        vertical: Vertical::LabourCompliance,
        required_documents: &["establishment_proof", "employee_roster"],
        draft_artifacts: &["esi_application"],
    },
    // Intellectual property
    StrategyBlueprint {
        service_type: "TRADEMARK_REGISTRATION",
        vertical: Vertical::IntellectualProperty,
        required_documents: &["mark_specimen", "applicant_details"],
        draft_artifacts: &["tm_a_form", "user_affidavit"],
    },
    StrategyBlueprint {
        service_type: "PATENT_PROVISIONAL",
        vertical: Vertical::IntellectualProperty,
        required_documents: &["invention_disclosure", "applicant_details"],
        draft_artifacts: &["provisional_specification"],
    },
    // Licenses
    StrategyBlueprint {
        service_type: "FSSAI_LICENSE",
        vertical: Vertical::Licensing,
        required_documents: &["premises_proof", "proprietor_id"],
        draft_artifacts: &["form_b_application"],
    },
    StrategyBlueprint {
        service_type: "SHOPS_ESTABLISHMENT_LICENSE",
        vertical: Vertical::Licensing,
        required_documents: &["premises_proof", "proprietor_id"],
        draft_artifacts: &["registration_application"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::service_type::ServiceType;

    #[test]
    fn standard_registry_covers_every_blueprint() {
        let registry = standard_registry();
        assert_eq!(registry.len(), STANDARD_BLUEPRINTS.len());
    }

    #[test]
    fn catalog_tags_are_normalization_fixed_points() {
        for blueprint in STANDARD_BLUEPRINTS {
            let normalized = ServiceType::normalize(blueprint.service_type);
            assert_eq!(
                normalized.as_str(),
                blueprint.service_type,
                "catalog tag must already be canonical"
            );
        }
    }

    #[test]
    fn every_vertical_contributes_at_least_one_service() {
        for vertical in [
            Vertical::CompanyRegistration,
            Vertical::TaxFiling,
            Vertical::LegalDrafting,
            Vertical::LabourCompliance,
            Vertical::IntellectualProperty,
            Vertical::Licensing,
        ] {
            assert!(
                STANDARD_BLUEPRINTS
                    .iter()
                    .any(|blueprint| blueprint.vertical == vertical),
                "no catalog entry for {}",
                vertical.label()
            );
        }
    }

    #[test]
    fn resolving_a_raw_catalog_label_finds_its_strategy() {
        let registry = standard_registry();
        let strategy = registry
            .resolve(&ServiceType::normalize("gst registration"))
            .expect("strategy registered");
        assert_eq!(strategy.vertical(), Vertical::TaxFiling);
    }
}
