//! SkinSight analysis - turn free-form model output into a fixed result shape.
//!
//! Multimodal models rarely answer in exactly the requested format: the JSON
//! may be wrapped in markdown fences, embedded in prose, spelled with
//! alternate keys, or missing entirely. This crate coerces whatever came back
//! into a [`NormalizedResult`] that a UI can render without further checks.
//!
//! # Example
//!
//! ```
//! use skinsight_analysis::{normalize, RiskLevel};
//!
//! let raw = "Here you go:\n```json\n{\"diagnosis\": \"Rosacea\", \"causes\": \"Sun exposure\"}\n```";
//! let result = normalize(raw).with_risk();
//!
//! assert_eq!(result.condition, "Rosacea");
//! assert_eq!(result.causes, vec!["Sun exposure".to_string()]);
//! assert_eq!(result.risk, Some(RiskLevel::Low));
//! ```
//!
//! # Architecture
//!
//! - [`normalize`]: fence stripping, brace-region extraction, parsing and key aliasing
//! - [`risk`]: keyword triage into [`RiskLevel`] tiers
//! - [`types`]: the [`NormalizedResult`] record

pub mod normalize;
pub mod risk;
pub mod types;

pub use normalize::{normalize, normalize_bytes};
pub use risk::{classify_risk, RiskLevel};
pub use types::NormalizedResult;
