//! Shared test doubles and helpers
//!
//! In-memory repository implementations and a scripted completion client so
//! the integration suite can drive the full router without a live database
//! or network access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

use wayfarer_api::api::{router, AppState};
use wayfarer_api::domain::errors::{PlannerError, PlannerResult};
use wayfarer_api::domain::plan::PlanStatus;
use wayfarer_api::domain::preferences::VacationType;
use wayfarer_api::domain::repositories::{
    FeedbackRepository, HistoryEntry, HistoryRepository, PlanRepository, TemplateFragment,
    TemplateRepository, User, UserRepository, UserUpdate, ROTATION_MODULUS,
};
use wayfarer_api::domain::user::value_objects::Email;
use wayfarer_api::llm::{CompletionClient, CompletionRequest, LlmError};
use wayfarer_api::planner::{CoordinatorConfig, PlanCoordinator};

// ===== Template repository =====

struct TemplateState {
    templates: HashMap<VacationType, (String, u8)>,
    general: String,
    instructions: String,
}

pub struct InMemoryTemplates {
    state: Mutex<TemplateState>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            VacationType::Family,
            (
                "We are a family aged {ages} traveling from {from_country} to {to_country} \
                 between {date1} and {date2} with a budget between {budget1} and {budget2}. "
                    .to_string(),
                0,
            ),
        );
        templates.insert(
            VacationType::Couple,
            (
                "We are a couple aged {ages} traveling from {from_country} to {to_country} \
                 between {date1} and {date2} with a budget between {budget1} and {budget2}. "
                    .to_string(),
                0,
            ),
        );

        Self {
            state: Mutex::new(TemplateState {
                templates,
                general: "the general template".to_string(),
                instructions: "Answer as JSON.".to_string(),
            }),
        }
    }

    pub fn set_rotation_index(&self, vacation_type: VacationType, index: u8) {
        let mut state = self.state.lock().unwrap();
        state
            .templates
            .get_mut(&vacation_type)
            .expect("seeded template")
            .1 = index;
    }

    pub fn template_text(&self, vacation_type: VacationType) -> String {
        let state = self.state.lock().unwrap();
        state.templates[&vacation_type].0.clone()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplates {
    async fn increment_and_fetch(
        &self,
        vacation_type: VacationType,
    ) -> PlannerResult<TemplateFragment> {
        let mut state = self.state.lock().unwrap();
        let entry = state
            .templates
            .get_mut(&vacation_type)
            .ok_or_else(|| PlannerError::NotFound("template".to_string()))?;
        entry.1 = (entry.1 + 1) % ROTATION_MODULUS;
        Ok(TemplateFragment {
            template: entry.0.clone(),
            rotation_index: entry.1,
            output_schema: None,
        })
    }

    async fn append_to_template(
        &self,
        vacation_type: VacationType,
        text: &str,
    ) -> PlannerResult<()> {
        let mut state = self.state.lock().unwrap();
        let entry = state
            .templates
            .get_mut(&vacation_type)
            .ok_or_else(|| PlannerError::NotFound("template".to_string()))?;
        entry.0.push_str(text);
        Ok(())
    }

    async fn general_template(&self) -> PlannerResult<String> {
        Ok(self.state.lock().unwrap().general.clone())
    }

    async fn instructions(&self) -> PlannerResult<String> {
        Ok(self.state.lock().unwrap().instructions.clone())
    }

    async fn set_general_template(&self, template: &str) -> PlannerResult<()> {
        self.state.lock().unwrap().general = template.to_string();
        Ok(())
    }
}

// ===== Feedback repository =====

#[derive(Default)]
pub struct InMemoryFeedback {
    notes: Mutex<HashMap<VacationType, Vec<String>>>,
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedback {
    async fn push_note(&self, vacation_type: VacationType, note: &str) -> PlannerResult<()> {
        self.notes
            .lock()
            .unwrap()
            .entry(vacation_type)
            .or_default()
            .push(note.to_string());
        Ok(())
    }

    async fn notes(&self, vacation_type: VacationType) -> PlannerResult<Vec<String>> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .get(&vacation_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self, vacation_type: VacationType) -> PlannerResult<()> {
        self.notes.lock().unwrap().remove(&vacation_type);
        Ok(())
    }
}

// ===== Plan repository =====

#[derive(Default)]
pub struct InMemoryPlans {
    slots: Mutex<HashMap<String, PlanStatus>>,
}

impl InMemoryPlans {
    pub fn has_slot(&self, requester_key: &str) -> bool {
        self.slots.lock().unwrap().contains_key(requester_key)
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlans {
    async fn clear(&self, requester_key: &str) -> PlannerResult<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(requester_key.to_string(), PlanStatus::Empty);
        Ok(())
    }

    async fn mark_ready(&self, requester_key: &str, plan: &Value) -> PlannerResult<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(requester_key.to_string(), PlanStatus::Ready(plan.clone()));
        Ok(())
    }

    async fn mark_failed(&self, requester_key: &str, reason: &str) -> PlannerResult<()> {
        self.slots.lock().unwrap().insert(
            requester_key.to_string(),
            PlanStatus::Failed {
                reason: reason.to_string(),
            },
        );
        Ok(())
    }

    async fn status(&self, requester_key: &str) -> PlannerResult<PlanStatus> {
        Ok(self
            .slots
            .lock()
            .unwrap()
            .get(requester_key)
            .cloned()
            .unwrap_or(PlanStatus::Empty))
    }
}

// ===== User repository =====

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> PlannerResult<Uuid> {
        let id = user.id;
        self.users
            .lock()
            .unwrap()
            .insert(user.email.to_string(), user);
        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> PlannerResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(email.as_str()).cloned())
    }

    async fn update(&self, email: &Email, update: UserUpdate) -> PlannerResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(email.as_str())
            .ok_or_else(|| PlannerError::NotFound("user".to_string()))?;
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(terms) = update.terms {
            user.terms = terms;
        }
        Ok(())
    }
}

// ===== History repository =====

#[derive(Default)]
pub struct InMemoryHistory {
    entries: Mutex<HashMap<String, Vec<HistoryEntry>>>,
}

#[async_trait]
impl HistoryRepository for InMemoryHistory {
    async fn init(&self, email: &str) -> PlannerResult<()> {
        self.entries
            .lock()
            .unwrap()
            .entry(email.to_string())
            .or_default();
        Ok(())
    }

    async fn append(&self, email: &str, data: Value) -> PlannerResult<i32> {
        let mut entries = self.entries.lock().unwrap();
        let list = entries.entry(email.to_string()).or_default();
        let index = list.iter().map(|e| e.index).max().unwrap_or(0) + 1;
        list.push(HistoryEntry { index, data });
        Ok(index)
    }

    async fn remove(&self, email: &str, index: i32) -> PlannerResult<()> {
        let mut entries = self.entries.lock().unwrap();
        let list = entries
            .get_mut(email)
            .ok_or_else(|| PlannerError::NotFound("history".to_string()))?;
        let before = list.len();
        list.retain(|e| e.index != index);
        if list.len() == before {
            return Err(PlannerError::NotFound("history entry".to_string()));
        }
        Ok(())
    }

    async fn entries(&self, email: &str) -> PlannerResult<Vec<HistoryEntry>> {
        self.entries
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or_else(|| PlannerError::NotFound("history".to_string()))
    }
}

// ===== Completion client =====

/// Scripted completion client
///
/// Replies depend on the request: JSON-constrained requests (plan
/// generation) get `plan_reply`, free-text requests (feedback
/// summarization) get `text_reply`. Tracks in-flight overlap so tests can
/// assert the admission gate holds.
pub struct MockCompletionClient {
    pub plan_reply: Mutex<String>,
    pub text_reply: Mutex<String>,
    pub fail: AtomicBool,
    pub requests: Mutex<Vec<CompletionRequest>>,
    pub max_in_flight: AtomicUsize,
    in_flight: AtomicUsize,
    delay: Duration,
}

impl MockCompletionClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            plan_reply: Mutex::new(r#"{"destination": "Budapest", "days": ["day one"]}"#.to_string()),
            text_reply: Mutex::new("NOT FOUND".to_string()),
            fail: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            max_in_flight: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            delay,
        }
    }

    /// Prompts of the plan-generation requests seen so far
    pub fn plan_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.json_object)
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// Number of feedback-summarization requests seen so far
    pub fn feedback_calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.json_object)
            .count()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let json_object = request.json_object;
        self.requests.lock().unwrap().push(request);

        if self.fail.load(Ordering::SeqCst) {
            return Err(LlmError::Api {
                status: 500,
                message: "completion service exploded".to_string(),
            });
        }

        if json_object {
            Ok(self.plan_reply.lock().unwrap().clone())
        } else {
            Ok(self.text_reply.lock().unwrap().clone())
        }
    }
}

// ===== Application wiring =====

pub struct TestApp {
    pub app: Router,
    pub templates: Arc<InMemoryTemplates>,
    pub feedback: Arc<InMemoryFeedback>,
    pub plans: Arc<InMemoryPlans>,
    pub client: Arc<MockCompletionClient>,
}

/// Builds the full application router over in-memory adapters
pub fn test_app_with_delay(delay: Duration) -> TestApp {
    let templates = Arc::new(InMemoryTemplates::new());
    let feedback = Arc::new(InMemoryFeedback::default());
    let plans = Arc::new(InMemoryPlans::default());
    let client = Arc::new(MockCompletionClient::new(delay));

    let templates_port: Arc<dyn TemplateRepository> = templates.clone();
    let feedback_port: Arc<dyn FeedbackRepository> = feedback.clone();
    let plans_port: Arc<dyn PlanRepository> = plans.clone();
    let client_port: Arc<dyn CompletionClient> = client.clone();

    let coordinator = Arc::new(PlanCoordinator::new(
        Arc::clone(&templates_port),
        feedback_port,
        Arc::clone(&plans_port),
        client_port,
        CoordinatorConfig::default(),
    ));

    let state = AppState {
        users: Arc::new(InMemoryUsers::default()),
        templates: templates_port,
        plans: plans_port,
        history: Arc::new(InMemoryHistory::default()),
        coordinator,
    };

    TestApp {
        app: router(state),
        templates,
        feedback,
        plans,
        client,
    }
}

pub fn test_app() -> TestApp {
    test_app_with_delay(Duration::ZERO)
}

// ===== Request helpers =====

/// Sends one request and returns the status plus the parsed body
///
/// Non-JSON bodies (extractor rejections, the health probe) come back as a
/// JSON string value.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// Polls the result endpoint until it stops reporting not-ready
pub async fn poll_until_settled(app: &Router, requester_key: &str) -> (StatusCode, Value) {
    for _ in 0..200 {
        let (status, body) = send(
            app,
            "GET",
            &format!("/get-improved-response/{}", requester_key),
            None,
        )
        .await;
        if status != StatusCode::SERVICE_UNAVAILABLE {
            return (status, body);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job for {} never settled", requester_key);
}

/// The preference record from the reference scenario
pub fn natali_preferences() -> Value {
    json!({
        "vacationType": "Family Vacation",
        "originCountry": "Israel",
        "destCountry": "Budapest",
        "dates": ["2024-05-08", "2024-05-12"],
        "ages": "30-40",
        "budget": [1000, 2500],
        "adultsAmount": 2,
        "childrenAmount": 2
    })
}
