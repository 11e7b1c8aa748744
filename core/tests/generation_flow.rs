use async_trait::async_trait;
use dorkcraft_core::{
    validate, AiBoundary, DorkConfig, DorkError, DorkResult, ErrorKind, GenerateContentRequest,
    GenerationController, GenerationOutcome, GenerationState, IssueSeverity, ManualField,
    RiskLevel, Session, ValidationIssue, HISTORY_CAPACITY,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Boundary double that replays canned reply texts and records what it was sent
#[derive(Clone, Default)]
struct CannedBoundary {
    replies: Arc<Mutex<VecDeque<String>>>,
    objectives_seen: Arc<Mutex<Vec<String>>>,
}

impl CannedBoundary {
    fn push(&self, reply: serde_json::Value) {
        self.replies.lock().unwrap().push_back(reply.to_string());
    }

    fn calls(&self) -> usize {
        self.objectives_seen.lock().unwrap().len()
    }
}

#[async_trait]
impl AiBoundary for CannedBoundary {
    async fn generate_text(&self, request: GenerateContentRequest) -> DorkResult<String> {
        let prompt = request.prompt_text().unwrap_or_default().to_string();
        self.objectives_seen.lock().unwrap().push(prompt);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DorkError::RequestError("connection refused".to_string()))
    }
}

fn reply(dork: &str, risk: &str, refined: &str) -> serde_json::Value {
    json!({
        "dork": dork,
        "explanation": "Файлы .env часто содержат учетные данные",
        "riskLevel": risk,
        "suggestedOperators": ["intitle:index.of", "inurl:config", "-inurl:example"],
        "validationAnalysis": "Синтаксис корректен",
        "improvementReasoning": "Добавлен фильтр по домену",
        "refinedObjective": refined
    })
}

fn setup() -> (CannedBoundary, GenerationController) {
    let boundary = CannedBoundary::default();
    let controller = GenerationController::new(
        DorkConfig {
            api_key: Some("test-key".to_string()),
            ..DorkConfig::default()
        },
        Some(Box::new(boundary.clone())),
    );
    (boundary, controller)
}

#[tokio::test]
async fn test_env_files_on_edu_domains() {
    let (boundary, controller) = setup();
    boundary.push(reply("site:.edu filetype:env", "HIGH", ""));

    let mut session = Session::new();
    session.set_objective("find exposed .env files on edu domains");
    let outcome = controller.generate(&mut session).await;

    assert_eq!(outcome, GenerationOutcome::Generated);
    assert_eq!(session.current_query(), "site:.edu filetype:env");
    assert!(session.issues().is_empty());
    assert_eq!(session.history().len(), 1);
    let result = session.result().unwrap();
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(
        result.suggested_vectors,
        ["intitle:index.of", "inurl:config", "-inurl:example"]
    );
}

#[tokio::test]
async fn test_cyrillic_dork_is_displayed_with_critical_issue() {
    let (boundary, controller) = setup();
    boundary.push(reply("сайт:example.ru", "MEDIUM", ""));

    let mut session = Session::new();
    session.set_objective("russian sites");
    assert_eq!(controller.generate(&mut session).await, GenerationOutcome::Generated);

    assert_eq!(session.current_query(), "сайт:example.ru");
    assert!(session
        .issues()
        .iter()
        .any(|issue| issue.severity() == IssueSeverity::Critical));
}

#[tokio::test]
async fn test_refinement_loop_runs_one_cycle_with_refined_objective() {
    let (boundary, controller) = setup();
    boundary.push(reply("site:.edu filetype:env", "HIGH", "X"));
    boundary.push(reply("site:.edu filetype:env intext:DB_PASSWORD", "CRITICAL", ""));

    let mut session = Session::new();
    session.set_objective("find exposed .env files on edu domains");
    controller.generate(&mut session).await;
    assert_eq!(boundary.calls(), 1);

    assert_eq!(controller.refine(&mut session).await, GenerationOutcome::Generated);
    assert_eq!(session.objective(), "X");
    assert_eq!(boundary.calls(), 2);
    assert_eq!(session.result().unwrap().risk_level, RiskLevel::Critical);

    let objectives: Vec<&str> = session.history().entries().map(|e| e.objective()).collect();
    assert_eq!(objectives, ["X", "find exposed .env files on edu domains"]);
}

#[tokio::test]
async fn test_history_keeps_ten_most_recent() {
    let (boundary, controller) = setup();
    let mut session = Session::new();

    for i in 0..11 {
        boundary.push(reply(&format!("site:host{}.com", i), "LOW", ""));
        session.set_objective(format!("objective {}", i));
        controller.generate(&mut session).await;
    }

    assert_eq!(session.history().len(), HISTORY_CAPACITY);
    let queries: Vec<String> = session
        .history()
        .entries()
        .map(|e| e.result().query.clone())
        .collect();
    let expected: Vec<String> = (1..11).rev().map(|i| format!("site:host{}.com", i)).collect();
    assert_eq!(queries, expected);
}

#[tokio::test]
async fn test_boundary_failure_keeps_session_usable() {
    let (boundary, controller) = setup();
    let mut session = Session::new();
    session.set_objective("anything");

    // No canned reply queued: the double reports a connection failure
    let outcome = controller.generate(&mut session).await;
    assert_eq!(outcome, GenerationOutcome::Failed(ErrorKind::Boundary));
    assert_eq!(session.state(), GenerationState::Failed);
    assert!(session.error().unwrap().contains("connection refused"));

    // Manual mode still works
    session.set_manual_field(ManualField::Site, "example.com");
    session.set_manual_field(ManualField::FileType, "sql");
    assert_eq!(session.current_query(), "site:example.com filetype:sql");
    assert_eq!(session.state(), GenerationState::Idle);
    assert!(session.error().is_none());

    // And the next generation supersedes the manual fields
    boundary.push(reply("inurl:backup ext:sql", "HIGH", ""));
    assert_eq!(controller.generate(&mut session).await, GenerationOutcome::Generated);
    assert!(session.manual().is_empty());
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_missing_credential_never_calls_boundary() {
    let boundary = CannedBoundary::default();
    boundary.push(reply("site:a.com", "LOW", ""));
    let controller = GenerationController::new(DorkConfig::default(), None);

    let mut session = Session::new();
    session.set_objective("anything");
    let outcome = controller.generate(&mut session).await;

    assert_eq!(outcome, GenerationOutcome::Failed(ErrorKind::Config));
    assert_eq!(boundary.calls(), 0);
    assert!(session.result().is_none());
}

#[tokio::test]
async fn test_recall_revalidates_historical_query() {
    let (boundary, controller) = setup();
    let mut session = Session::new();

    boundary.push(reply("site: old.com", "LOW", ""));
    session.set_objective("old");
    controller.generate(&mut session).await;

    boundary.push(reply("site:new.com", "LOW", ""));
    session.set_objective("new");
    controller.generate(&mut session).await;
    assert!(session.issues().is_empty());

    assert!(session.recall(1));
    assert_eq!(session.objective(), "old");
    assert_eq!(session.issues(), validate("site: old.com").as_slice());
    assert!(matches!(
        session.issues()[0],
        ValidationIssue::OperatorSpacing { .. }
    ));
    // Recall does not add history
    assert_eq!(session.history().len(), 2);
}
