//! Session orchestration: the summarise and answer actions.
//!
//! A [`Session`] holds the last successfully summarised page and is passed
//! explicitly to the [`Orchestrator`], which owns the extractor and model.

use crate::agent::CompletionModel;
use crate::prompt;
use crate::scraper::{ContentExtractor, PageContent};
use crate::summary::{ModelId, SummaryRequest};
use tracing::{info, warn};

pub const MISSING_URL_WARNING: &str = "Please enter a valid URL.";
pub const MISSING_PAGE_WARNING: &str = "Please summarize the webpage first.";
pub const MISSING_QUESTION_WARNING: &str = "Please enter a question.";
pub const ANSWER_HEADING: &str = "🤖 Answer:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Extracting,
    Summarized,
    Answering,
}

impl SessionState {
    pub fn is_busy(self) -> bool {
        matches!(self, SessionState::Extracting | SessionState::Answering)
    }
}

/// One user's interaction context
#[derive(Debug, Clone, Default)]
pub struct Session {
    page: Option<PageContent>,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The page questions are answered from, if one has been summarised
    pub fn page(&self) -> Option<&PageContent> {
        self.page.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

/// What a surface should show after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Summary { heading: String, text: String },
    Answer { text: String },
    Warning(String),
    Error(String),
}

impl Outcome {
    pub fn heading(&self) -> Option<&str> {
        match self {
            Outcome::Summary { heading, .. } => Some(heading),
            Outcome::Answer { .. } => Some(ANSWER_HEADING),
            Outcome::Warning(_) | Outcome::Error(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Summary { .. } | Outcome::Answer { .. })
    }
}

/// A question about the stored page
#[derive(Debug, Clone, Copy)]
pub struct QaRequest<'a> {
    pub page: &'a PageContent,
    pub question: &'a str,
}

impl QaRequest<'_> {
    pub fn prompt(&self) -> String {
        prompt::question_prompt(&self.page.text, self.question)
    }
}

pub struct Orchestrator {
    extractor: Box<dyn ContentExtractor>,
    model: Box<dyn CompletionModel>,
    max_chars: Option<usize>,
}

impl Orchestrator {
    /// `max_chars` caps the page text in summary prompts only.
    pub fn new(
        extractor: Box<dyn ContentExtractor>,
        model: Box<dyn CompletionModel>,
        max_chars: Option<usize>,
    ) -> Self {
        Self {
            extractor,
            model,
            max_chars,
        }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Extract the page, summarise it and store it for follow-up questions.
    ///
    /// On any failure the session keeps the page it already had.
    pub async fn summarize(
        &self,
        session: &mut Session,
        url: &str,
        request: SummaryRequest,
    ) -> Outcome {
        let url = url.trim();
        if url.is_empty() {
            return Outcome::Warning(MISSING_URL_WARNING.to_string());
        }

        let previous = session.state;
        session.state = SessionState::Extracting;

        let page = match self.extractor.extract(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url, extractor = self.extractor.name(), error = %e, "extraction failed");
                session.state = previous;
                return Outcome::Error(e.to_string());
            }
        };

        let prompt = prompt::summary_prompt(&page.text, request.style, self.max_chars);
        match self.model.complete(request.model, &prompt).await {
            Ok(text) => {
                info!(url, style = request.style.key(), model = %request.model, "page summarised");
                session.page = Some(page);
                session.state = SessionState::Summarized;
                Outcome::Summary {
                    heading: request.heading(),
                    text,
                }
            }
            Err(e) => {
                warn!(url, model = %request.model, error = %e, "summary failed");
                session.state = previous;
                Outcome::Error(e.to_string())
            }
        }
    }

    /// Answer a question from the whole stored page
    pub async fn answer(&self, session: &mut Session, question: &str, model: ModelId) -> Outcome {
        let Some(page) = session.page.as_ref() else {
            return Outcome::Warning(MISSING_PAGE_WARNING.to_string());
        };
        let question = question.trim();
        if question.is_empty() {
            return Outcome::Warning(MISSING_QUESTION_WARNING.to_string());
        }

        let prompt = QaRequest { page, question }.prompt();
        session.state = SessionState::Answering;
        let result = self.model.complete(model, &prompt).await;
        session.state = SessionState::Summarized;

        match result {
            Ok(text) => Outcome::Answer { text },
            Err(e) => {
                warn!(model = %model, error = %e, "answer failed");
                Outcome::Error(e.to_string())
            }
        }
    }
}
