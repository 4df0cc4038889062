//! Asynchronous document-automation pipeline shared by the business
//! verticals.
//!
//! A start request resolves the submission's raw service-type label to a
//! registered strategy and drives it through a fixed stage sequence
//! (verify, draft, package), persisting progress into the per-submission
//! domain record and a per-attempt job ticket as it goes. Upstream CRUD
//! surfaces and persistence adapters plug in through the store traits.

pub mod catalog;
pub mod dispatcher;
pub mod domain;
pub mod engine;
pub mod registry;
pub mod router;
pub mod service_type;
pub mod store;
pub mod strategy;

pub use catalog::{standard_registry, STANDARD_BLUEPRINTS};
pub use dispatcher::{AutomationDispatcher, DispatchError};
pub use domain::{
    FilingRecord, JobId, JobStatus, JobStatusView, JobTicket, PipelineStage, RecordStatus,
    RecordStatusView, SubmissionId, Vertical,
};
pub use engine::{EngineError, OrchestrationEngine};
pub use registry::StrategyRegistry;
pub use router::{automation_router, AutomationState, StartAutomationRequest};
pub use service_type::ServiceType;
pub use store::{JobStore, RecordStore, StoreError};
pub use strategy::{
    AutomationStrategy, ChecklistStrategy, DraftError, StrategyBlueprint, ValidationError,
};
