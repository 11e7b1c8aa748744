//! Generation controller: one request/response cycle against the AI boundary,
//! the enhancement pass and the refinement loop.

use tracing::{debug, info, warn};

use crate::client::{AiBoundary, GeminiClient};
use crate::config::DorkConfig;
use crate::errors::{DorkError, DorkResult, ErrorKind};
use crate::launch::search_url;
use crate::prompts::{build_enhancement_request, build_generation_request};
use crate::result::parse_generation_result;
use crate::session::Session;
use crate::types::GenerateContentRequest;

/// How a controller call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Nothing to do (blank objective, nothing to refine); session untouched
    Skipped,
    /// A new result is active and recorded in history
    Generated,
    /// The objective was rewritten by the enhancement pass
    Enhanced,
    /// The error is stored on the session
    Failed(ErrorKind),
    /// A newer request superseded this one; its reply was dropped
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Generation,
    Enhancement,
}

/// Handle for one in-flight request, issued on entry to Pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    sequence: u64,
    objective: String,
    kind: RequestKind,
}

impl GenerationTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Objective as it was when the request started
    pub fn objective(&self) -> &str {
        &self.objective
    }
}

pub struct GenerationController {
    config: DorkConfig,
    boundary: Option<Box<dyn AiBoundary>>,
}

impl GenerationController {
    /// `boundary` is `None` when no credential is available
    pub fn new(config: DorkConfig, boundary: Option<Box<dyn AiBoundary>>) -> Self {
        Self { config, boundary }
    }

    /// Builds a Gemini-backed controller. Without an API key every AI call
    /// fails with a config error.
    pub fn from_config(config: DorkConfig) -> Self {
        let boundary = match GeminiClient::new(&config) {
            Ok(client) => Some(Box::new(client) as Box<dyn AiBoundary>),
            Err(e) => {
                warn!("AI boundary unavailable: {}", e);
                None
            }
        };
        Self::new(config, boundary)
    }

    pub fn config(&self) -> &DorkConfig {
        &self.config
    }

    pub fn has_credential(&self) -> bool {
        self.boundary.is_some()
    }

    fn missing_credential() -> DorkError {
        DorkError::ConfigError(
            "No API key configured; set GEMINI_API_KEY or api_key in the config file".to_string(),
        )
    }

    fn begin(
        &self,
        session: &mut Session,
        kind: RequestKind,
    ) -> Result<GenerationTicket, GenerationOutcome> {
        let objective = session.objective().trim().to_string();
        if objective.is_empty() {
            debug!("Ignoring request with blank objective");
            return Err(GenerationOutcome::Skipped);
        }

        if self.boundary.is_none() {
            let err = Self::missing_credential();
            warn!("{}", err);
            session.apply_error(err.to_string());
            return Err(GenerationOutcome::Failed(ErrorKind::Config));
        }

        let sequence = session.enter_pending(kind == RequestKind::Generation);
        Ok(GenerationTicket {
            sequence,
            objective,
            kind,
        })
    }

    /// Idle -> Pending for a generation request.
    ///
    /// `Err` carries the terminal outcome when no request should be sent:
    /// `Skipped` for a blank objective (no state change), `Failed(Config)`
    /// when there is no credential.
    pub fn begin_generation(
        &self,
        session: &mut Session,
    ) -> Result<GenerationTicket, GenerationOutcome> {
        self.begin(session, RequestKind::Generation)
    }

    /// Idle -> Pending for an enhancement request; the active result is kept
    pub fn begin_enhancement(
        &self,
        session: &mut Session,
    ) -> Result<GenerationTicket, GenerationOutcome> {
        self.begin(session, RequestKind::Enhancement)
    }

    /// The request to send for `ticket`
    pub fn request_for(&self, ticket: &GenerationTicket) -> GenerateContentRequest {
        match ticket.kind {
            RequestKind::Generation => build_generation_request(&ticket.objective, &self.config),
            RequestKind::Enhancement => build_enhancement_request(&ticket.objective, &self.config),
        }
    }

    /// Applies the boundary's reply for `ticket` to the session
    pub fn complete(
        &self,
        session: &mut Session,
        ticket: GenerationTicket,
        reply: DorkResult<String>,
    ) -> GenerationOutcome {
        if ticket.sequence != session.sequence() {
            warn!(
                sequence = ticket.sequence,
                latest = session.sequence(),
                "Discarding stale reply"
            );
            return GenerationOutcome::Stale;
        }

        match ticket.kind {
            RequestKind::Generation => self.complete_generation(session, ticket, reply),
            RequestKind::Enhancement => self.complete_enhancement(session, reply),
        }
    }

    fn complete_generation(
        &self,
        session: &mut Session,
        ticket: GenerationTicket,
        reply: DorkResult<String>,
    ) -> GenerationOutcome {
        match reply.and_then(|text| parse_generation_result(&text)) {
            Ok(result) => {
                info!(query = %result.query, risk = %result.risk_level, "Generated dork");
                session.apply_result(ticket.objective, result);
                debug!(issues = session.issues().len(), "Validated generated query");
                GenerationOutcome::Generated
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                let kind = e.kind();
                session.apply_error(e.to_string());
                GenerationOutcome::Failed(kind)
            }
        }
    }

    fn complete_enhancement(
        &self,
        session: &mut Session,
        reply: DorkResult<String>,
    ) -> GenerationOutcome {
        match reply {
            Ok(text) => {
                let enhanced = text.trim();
                session.settle();
                if enhanced.is_empty() {
                    warn!("Enhancement returned no text; objective unchanged");
                    return GenerationOutcome::Skipped;
                }
                info!("Objective enhanced");
                session.set_objective(enhanced);
                GenerationOutcome::Enhanced
            }
            Err(e) => {
                warn!("Enhancement failed: {}", e);
                let kind = e.kind();
                session.apply_error(e.to_string());
                GenerationOutcome::Failed(kind)
            }
        }
    }

    async fn call_boundary(&self, request: GenerateContentRequest) -> DorkResult<String> {
        let boundary = self.boundary.as_deref().ok_or_else(Self::missing_credential)?;
        boundary.generate_text(request).await
    }

    async fn run(&self, session: &mut Session, kind: RequestKind) -> GenerationOutcome {
        let ticket = match self.begin(session, kind) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        info!(objective = %ticket.objective, ?kind, "Request started");

        let request = self.request_for(&ticket);
        let reply = self.call_boundary(request).await;
        self.complete(session, ticket, reply)
    }

    /// One full generation cycle for the session's current objective
    pub async fn generate(&self, session: &mut Session) -> GenerationOutcome {
        self.run(session, RequestKind::Generation).await
    }

    /// Rewrites the session's objective with the enhancement pass
    pub async fn enhance(&self, session: &mut Session) -> GenerationOutcome {
        self.run(session, RequestKind::Enhancement).await
    }

    /// Adopts the active result's refined objective and generates again
    pub async fn refine(&self, session: &mut Session) -> GenerationOutcome {
        let Some(next) = session
            .result()
            .and_then(|result| result.next_objective())
            .map(str::to_string)
        else {
            debug!("Nothing to refine");
            return GenerationOutcome::Skipped;
        };

        session.set_objective(next);
        self.generate(session).await
    }

    /// Search URL for the session's current query; `None` when the query is empty
    pub fn launch_url(&self, session: &Session) -> DorkResult<Option<String>> {
        let query = session.current_query();
        if query.trim().is_empty() {
            return Ok(None);
        }
        search_url(self.config.search_engine_url(), &query).map(Some)
    }
}
