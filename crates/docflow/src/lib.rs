//! Unified document-automation engine for the business-services platform.
//!
//! One orchestration pipeline serves every vertical (company registration,
//! tax filing, legal drafting, labour compliance, IP filings, licenses);
//! per-service behavior plugs in as strategies resolved by canonical
//! service-type tag.

pub mod automation;
pub mod config;
pub mod error;
pub mod telemetry;
