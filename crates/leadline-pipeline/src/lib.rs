//! Leadline Pipeline
//!
//! Turns a free-text meeting summary into a canonical CRM lead.
//!
//! # Overview
//!
//! Each summary is scanned for PII, sent to an LLM for field extraction,
//! normalized onto the canonical schema, scored for completeness and
//! persisted. Malformed model output is an expected outcome and comes back
//! as a failed `ProcessingResult`, not as an error.
//!
//! # Architecture
//!
//! ```text
//! Summary → PiiDetector → LlmProvider → interpret → normalize → score → LeadStore
//! ```
//!
//! PII detection and persistence are auxiliary: their failures are logged
//! and the pipeline carries on with the best result it has.
//!
//! # Example Usage
//!
//! ```no_run
//! use leadline_llm::MockProvider;
//! use leadline_pii::PatternDetector;
//! use leadline_pipeline::{Pipeline, PipelineConfig};
//! use leadline_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(
//!     PatternDetector::default_config(),
//!     MockProvider::new(r#"{"contact": {"name": "Jane Doe"}}"#),
//!     SqliteStore::new(":memory:")?,
//!     PipelineConfig::default(),
//! );
//!
//! let result = pipeline.process("Met with Jane Doe (jane@x.com).").await?;
//!
//! println!("Success: {}", result.success);
//! println!("Confidence: {:.2}", result.confidence);
//! println!("PII spans: {}", result.pii.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod pipeline;
mod prompt;
mod types;


pub use config::{FailurePolicy, PipelineConfig};
pub use error::{ExtractionError, PipelineError};
pub use parser::{interpret, RawExtraction};
pub use pipeline::Pipeline;
pub use prompt::PromptBuilder;
pub use types::ProcessingResult;
