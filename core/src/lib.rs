// Core of dorkcraft: turns a natural-language objective into a search dork
// through the Gemini API, validates it and iterates on it.

// Export client module - AI boundary trait and Gemini client
pub mod client;
pub use client::*;

// Export types module - Gemini request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Request builders for enhancement and generation
pub mod prompts;
pub use prompts::{build_enhancement_request, build_generation_request, generation_response_schema};

// Structured generation result
pub mod result;
pub use result::{parse_generation_result, GenerationResult, RiskLevel};

// Payload validator
pub mod validator;
pub use validator::{validate, IssueSeverity, ValidationIssue};

// History ledger
pub mod history;
pub use history::{HistoryEntry, HistoryLedger, HISTORY_CAPACITY};

// Manual query composition
pub mod manual;
pub use manual::{compose_manual_query, ManualField, ManualOverride};

// Search URL for launching a query
pub mod launch;
pub use launch::search_url;

// Session state and the generation controller
pub mod session;
pub use session::{GenerationState, Session};

pub mod controller;
pub use controller::{GenerationController, GenerationOutcome, GenerationTicket};
