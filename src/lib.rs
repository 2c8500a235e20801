//! # Precis
//!
//! A TUI application for webpage summarization and follow-up questions using LLMs.
//!
//! ## Features
//!
//! - **Two extractors**: Readability article parsing or CSS selector text extraction
//! - **Fixed menus**: four summary styles and three hosted models, as enums
//! - **Follow-up Q&A**: questions are answered from the last summarised page

pub mod agent;
pub mod config;
pub mod prompt;
pub mod scraper;
pub mod session;
pub mod summary;
pub mod ui;

pub use agent::{CompletionModel, GroqClient, InferenceError};
pub use config::Config;
pub use scraper::{ContentExtractor, ExtractError, PageContent};
pub use session::{Orchestrator, Outcome, Session, SessionState};
pub use summary::{ModelId, SummaryRequest, SummaryStyle};
