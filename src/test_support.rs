//! Fixtures, mock gateways and an in-process fake backend for tests.
//!
//! The fake backend speaks the studio REST API over real HTTP on
//! `127.0.0.1:0`. It is seeded with the admin account, one member, two
//! teachers and one class session, and accepts the fixture tokens
//! `admin-token` / `member-token` so tests can log in without a round trip.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::config::ClientConfig;
use crate::net::auth::{AuthApi, AuthError, RegistrationError};
use crate::net::error::ApiError;
use crate::net::sessions::SessionApi;
use crate::net::teachers::TeacherApi;
use crate::net::types::{
    ClassSession, LoginRequest, RegisterRequest, SessionId, SessionInformation, SessionPayload, Teacher, TeacherId,
    UserAccount, UserId,
};
use crate::net::users::UserApi;
use crate::net::{ApiClient, Gateways};
use crate::state::session::SessionStore;

pub const ADMIN_EMAIL: &str = "yoga@studio.com";
pub const ADMIN_PASSWORD: &str = "test!1234";
pub const MEMBER_EMAIL: &str = "member@studio.com";
pub const MEMBER_PASSWORD: &str = "member!1234";

// =============================================================================
// FIXTURES
// =============================================================================

#[must_use]
pub fn admin_info() -> SessionInformation {
    SessionInformation {
        token: "admin-token".into(),
        token_type: "Bearer".into(),
        id: 1,
        username: ADMIN_EMAIL.into(),
        first_name: "Admin".into(),
        last_name: "Admin".into(),
        admin: true,
    }
}

#[must_use]
pub fn member_info() -> SessionInformation {
    SessionInformation {
        token: "member-token".into(),
        token_type: "Bearer".into(),
        id: 2,
        username: MEMBER_EMAIL.into(),
        first_name: "Mia".into(),
        last_name: "Member".into(),
        admin: false,
    }
}

#[must_use]
pub fn account_for(info: &SessionInformation) -> UserAccount {
    UserAccount {
        id: info.id,
        email: info.username.clone(),
        first_name: info.first_name.clone(),
        last_name: info.last_name.clone(),
        admin: info.admin,
        created_at: Some(datetime!(2024-01-01 0:00 UTC)),
        updated_at: None,
    }
}

#[must_use]
pub fn teachers() -> Vec<Teacher> {
    let teacher = |id: TeacherId, first: &str, last: &str| Teacher {
        id,
        first_name: first.into(),
        last_name: last.into(),
        created_at: Some(datetime!(2024-01-01 0:00 UTC)),
        updated_at: Some(datetime!(2024-01-01 0:00 UTC)),
    };
    vec![teacher(1, "Margot", "Delahaye"), teacher(2, "Hélène", "Thiercelin")]
}

#[must_use]
pub fn class_session(id: SessionId, name: &str) -> ClassSession {
    ClassSession {
        id,
        name: name.into(),
        description: "Séance pour débutants".into(),
        date: datetime!(2025-04-10 0:00 UTC),
        teacher_id: 1,
        participants: BTreeSet::new(),
        created_at: Some(datetime!(2025-01-15 10:00 UTC)),
        updated_at: Some(datetime!(2025-01-15 10:00 UTC)),
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status { status, body: json!({ "message": "mock failure" }).to_string() }
}

// =============================================================================
// MOCK GATEWAYS
// =============================================================================

/// Auth mock: accepts exactly one credential pair unless `fail_with` is set.
pub struct MockAuth {
    pub accepts: Option<(LoginRequest, SessionInformation)>,
    pub fail_with: Option<u16>,
    pub logins: Mutex<Vec<LoginRequest>>,
    pub registrations: Mutex<Vec<RegisterRequest>>,
}

impl MockAuth {
    #[must_use]
    pub fn accepting(email: &str, password: &str, info: SessionInformation) -> Self {
        let request = LoginRequest { email: email.into(), password: password.into() };
        Self { accepts: Some((request, info)), fail_with: None, logins: Mutex::default(), registrations: Mutex::default() }
    }

    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self { accepts: None, fail_with: Some(status), logins: Mutex::default(), registrations: Mutex::default() }
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AuthApi for MockAuth {
    async fn login(&self, request: &LoginRequest) -> Result<SessionInformation, AuthError> {
        self.logins.lock().unwrap().push(request.clone());
        if let Some(status) = self.fail_with {
            return Err(status_error(status).into());
        }
        match &self.accepts {
            Some((expected, info)) if expected == request => Ok(info.clone()),
            _ => Err(AuthError::Rejected { status: 401, message: "Bad credentials".into() }),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), RegistrationError> {
        self.registrations.lock().unwrap().push(request.clone());
        match self.fail_with {
            Some(status) => Err(status_error(status).into()),
            None => Ok(()),
        }
    }
}

/// In-memory session store that records every call as `"<op> <args>"`.
#[derive(Default)]
pub struct MockSessions {
    pub sessions: Mutex<BTreeMap<SessionId, ClassSession>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_with: Mutex<Option<u16>>,
}

impl MockSessions {
    #[must_use]
    pub fn with(sessions: impl IntoIterator<Item = ClassSession>) -> Self {
        let map = sessions.into_iter().map(|s| (s.id, s)).collect();
        Self { sessions: Mutex::new(map), ..Self::default() }
    }

    pub fn fail_with(&self, status: Option<u16>) {
        *self.fail_with.lock().unwrap() = status;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get(&self, id: SessionId) -> Option<ClassSession> {
        self.sessions.lock().unwrap().get(&id).cloned()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match *self.fail_with.lock().unwrap() {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }

    fn with_session<T>(&self, id: SessionId, f: impl FnOnce(&mut ClassSession) -> T) -> Result<T, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.get_mut(&id).map(f).ok_or_else(|| status_error(404))
    }
}

#[async_trait::async_trait]
impl SessionApi for MockSessions {
    async fn all(&self) -> Result<Vec<ClassSession>, ApiError> {
        self.record("all".into())?;
        Ok(self.sessions.lock().unwrap().values().cloned().collect())
    }

    async fn detail(&self, id: SessionId) -> Result<ClassSession, ApiError> {
        self.record(format!("detail {id}"))?;
        self.with_session(id, |s| s.clone())
    }

    async fn create(&self, payload: &SessionPayload) -> Result<ClassSession, ApiError> {
        self.record(format!("create {}", payload.name))?;
        let mut sessions = self.sessions.lock().unwrap();
        let id = sessions.keys().next_back().map_or(1, |id| id + 1);
        let mut session = class_session(id, &payload.name);
        session.description.clone_from(&payload.description);
        session.date = payload.date.midnight().assume_utc();
        session.teacher_id = payload.teacher_id;
        sessions.insert(id, session.clone());
        Ok(session)
    }

    async fn update(&self, id: SessionId, payload: &SessionPayload) -> Result<ClassSession, ApiError> {
        self.record(format!("update {id} {}", payload.name))?;
        self.with_session(id, |s| {
            s.name.clone_from(&payload.name);
            s.description.clone_from(&payload.description);
            s.date = payload.date.midnight().assume_utc();
            s.teacher_id = payload.teacher_id;
            s.clone()
        })
    }

    async fn delete(&self, id: SessionId) -> Result<(), ApiError> {
        self.record(format!("delete {id}"))?;
        self.sessions.lock().unwrap().remove(&id).map(|_| ()).ok_or_else(|| status_error(404))
    }

    async fn participate(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError> {
        self.record(format!("participate {id} {user_id}"))?;
        self.with_session(id, |s| {
            s.participants.insert(user_id);
        })
    }

    async fn un_participate(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError> {
        self.record(format!("un_participate {id} {user_id}"))?;
        self.with_session(id, |s| {
            s.participants.remove(&user_id);
        })
    }
}

#[derive(Default)]
pub struct MockTeachers {
    pub teachers: Vec<Teacher>,
    pub fail_with: Option<u16>,
    pub calls: Mutex<Vec<String>>,
}

impl MockTeachers {
    #[must_use]
    pub fn seeded() -> Self {
        Self { teachers: teachers(), ..Self::default() }
    }
}

#[async_trait::async_trait]
impl TeacherApi for MockTeachers {
    async fn all(&self) -> Result<Vec<Teacher>, ApiError> {
        self.calls.lock().unwrap().push("all".into());
        match self.fail_with {
            Some(status) => Err(status_error(status)),
            None => Ok(self.teachers.clone()),
        }
    }

    async fn detail(&self, id: TeacherId) -> Result<Teacher, ApiError> {
        self.calls.lock().unwrap().push(format!("detail {id}"));
        if let Some(status) = self.fail_with {
            return Err(status_error(status));
        }
        self.teachers.iter().find(|t| t.id == id).cloned().ok_or_else(|| status_error(404))
    }
}

#[derive(Default)]
pub struct MockUsers {
    pub users: Vec<UserAccount>,
    pub fail_with: Option<u16>,
    pub deleted: Mutex<Vec<UserId>>,
}

impl MockUsers {
    #[must_use]
    pub fn with(users: impl IntoIterator<Item = UserAccount>) -> Self {
        Self { users: users.into_iter().collect(), ..Self::default() }
    }
}

#[async_trait::async_trait]
impl UserApi for MockUsers {
    async fn get_by_id(&self, id: UserId) -> Result<UserAccount, ApiError> {
        if let Some(status) = self.fail_with {
            return Err(status_error(status));
        }
        self.users.iter().find(|u| u.id == id).cloned().ok_or_else(|| status_error(404))
    }

    async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        if let Some(status) = self.fail_with {
            return Err(status_error(status));
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

// =============================================================================
// FAKE BACKEND
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Body parsed as JSON, `Null` when empty.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        if self.body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&self.body).expect("recorded body is JSON")
        }
    }
}

struct FakeUser {
    account: UserAccount,
    password: String,
}

struct FakeState {
    users: BTreeMap<UserId, FakeUser>,
    sessions: BTreeMap<SessionId, ClassSession>,
    teachers: Vec<Teacher>,
    tokens: HashMap<String, UserId>,
    next_user_id: UserId,
    next_session_id: SessionId,
    issued: u64,
    fail_with: Option<u16>,
    requests: Vec<RecordedRequest>,
}

impl FakeState {
    fn seeded() -> Self {
        let mut users = BTreeMap::new();
        for (info, password) in [(admin_info(), ADMIN_PASSWORD), (member_info(), MEMBER_PASSWORD)] {
            users.insert(info.id, FakeUser { account: account_for(&info), password: password.into() });
        }
        let tokens = [(admin_info().token, admin_info().id), (member_info().token, member_info().id)]
            .into_iter()
            .collect();
        let sessions = [(1, class_session(1, "Yoga débutant"))].into_iter().collect();
        Self {
            users,
            sessions,
            teachers: teachers(),
            tokens,
            next_user_id: 3,
            next_session_id: 2,
            issued: 0,
            fail_with: None,
            requests: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<FakeState>>;
type Reply = Result<Response, Response>;

/// Handle to a running fake backend. The server lives until the test's
/// runtime shuts down.
#[derive(Clone)]
pub struct FakeBackend {
    shared: Shared,
    addr: SocketAddr,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let shared: Shared = Arc::new(Mutex::new(FakeState::seeded()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let app = router(shared.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend stopped");
        });
        Self { shared, addr }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Answer every request with `status` until cleared.
    pub fn fail_with(&self, status: Option<u16>) {
        self.shared.lock().unwrap().fail_with = status;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request reached the fake backend")
    }

    pub fn session(&self, id: SessionId) -> Option<ClassSession> {
        self.shared.lock().unwrap().sessions.get(&id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.shared.lock().unwrap().sessions.len()
    }

    pub fn has_user(&self, email: &str) -> bool {
        self.shared.lock().unwrap().users.values().any(|u| u.account.email == email)
    }
}

pub struct TestEnv {
    pub backend: FakeBackend,
    pub store: SessionStore,
    pub client: ApiClient,
    pub api: Gateways,
}

/// Fake backend plus a logged-out store and gateways pointed at it.
pub async fn test_env() -> TestEnv {
    let backend = FakeBackend::spawn().await;
    let store = SessionStore::new();
    let config = ClientConfig::default().with_base_url(&backend.base_url()).expect("fake backend url");
    let client = ApiClient::new(&config, store.clone()).expect("api client");
    let api = Gateways::new(&client);
    TestEnv { backend, store, client, api }
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/session", get(list_sessions).post(create_session))
        .route("/api/session/{id}", get(get_session).put(update_session).delete(delete_session))
        .route("/api/session/{id}/participate/{user_id}", post(participate).delete(un_participate))
        .route("/api/teacher", get(list_teachers))
        .route("/api/teacher/{id}", get(get_teacher))
        .route("/api/user/{id}", get(get_user).delete(delete_user))
        .layer(middleware::from_fn_with_state(shared.clone(), record_and_gate))
        .with_state(shared)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn parse_id(raw: &str) -> Result<i64, Response> {
    raw.parse().map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid id"))
}

fn authorize(state: &FakeState, headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token).copied())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

async fn record_and_gate(State(shared): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let request = Request::from_parts(parts, Body::from(bytes.clone()));
    let forced = {
        let mut state = shared.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_owned(),
            authorization: request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
        state.fail_with
    };
    if let Some(status) = forced {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error(status, "forced failure");
    }
    next.run(request).await
}

async fn login(State(shared): State<Shared>, Json(request): Json<LoginRequest>) -> Reply {
    let mut state = shared.lock().unwrap();
    let account = state
        .users
        .values()
        .find(|u| u.account.email == request.email && u.password == request.password)
        .map(|u| u.account.clone())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Bad credentials"))?;
    state.issued += 1;
    let token = format!("token-{}-{}", account.id, state.issued);
    state.tokens.insert(token.clone(), account.id);
    Ok(Json(SessionInformation {
        token,
        token_type: "Bearer".into(),
        id: account.id,
        username: account.email,
        first_name: account.first_name,
        last_name: account.last_name,
        admin: account.admin,
    })
    .into_response())
}

async fn register(State(shared): State<Shared>, Json(request): Json<RegisterRequest>) -> Reply {
    let mut state = shared.lock().unwrap();
    if state.users.values().any(|u| u.account.email == request.email) {
        return Err(error(StatusCode::BAD_REQUEST, "Error: Email is already taken!"));
    }
    let id = state.next_user_id;
    state.next_user_id += 1;
    let account = UserAccount {
        id,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        admin: false,
        created_at: Some(OffsetDateTime::now_utc()),
        updated_at: None,
    };
    state.users.insert(id, FakeUser { account, password: request.password });
    Ok(Json(json!({ "message": "User registered successfully!" })).into_response())
}

async fn list_sessions(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    Ok(Json(state.sessions.values().cloned().collect::<Vec<_>>()).into_response())
}

async fn create_session(State(shared): State<Shared>, headers: HeaderMap, Json(payload): Json<SessionPayload>) -> Reply {
    let mut state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let id = state.next_session_id;
    state.next_session_id += 1;
    let now = OffsetDateTime::now_utc();
    let session = ClassSession {
        id,
        name: payload.name,
        description: payload.description,
        date: payload.date.midnight().assume_utc(),
        teacher_id: payload.teacher_id,
        participants: BTreeSet::new(),
        created_at: Some(now),
        updated_at: Some(now),
    };
    state.sessions.insert(id, session.clone());
    Ok(Json(session).into_response())
}

async fn get_session(State(shared): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let id = parse_id(&id)?;
    let session = state.sessions.get(&id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    Ok(Json(session.clone()).into_response())
}

async fn update_session(
    State(shared): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<SessionPayload>,
) -> Reply {
    let mut state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let id = parse_id(&id)?;
    let session = state.sessions.get_mut(&id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    session.name = payload.name;
    session.description = payload.description;
    session.date = payload.date.midnight().assume_utc();
    session.teacher_id = payload.teacher_id;
    session.updated_at = Some(OffsetDateTime::now_utc());
    Ok(Json(session.clone()).into_response())
}

async fn delete_session(State(shared): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let mut state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let id = parse_id(&id)?;
    state.sessions.remove(&id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    Ok(StatusCode::OK.into_response())
}

fn participation_target(state: &FakeState, id: &str, user_id: &str) -> Result<(SessionId, UserId), Response> {
    let id = parse_id(id)?;
    let user_id = parse_id(user_id)?;
    if !state.sessions.contains_key(&id) || !state.users.contains_key(&user_id) {
        return Err(error(StatusCode::NOT_FOUND, "Not found"));
    }
    Ok((id, user_id))
}

async fn participate(
    State(shared): State<Shared>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Reply {
    let mut state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let (id, user_id) = participation_target(&state, &id, &user_id)?;
    let session = state.sessions.get_mut(&id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    if !session.participants.insert(user_id) {
        return Err(error(StatusCode::BAD_REQUEST, "Already participating"));
    }
    Ok(StatusCode::OK.into_response())
}

async fn un_participate(
    State(shared): State<Shared>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Reply {
    let mut state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let (id, user_id) = participation_target(&state, &id, &user_id)?;
    let session = state.sessions.get_mut(&id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    if !session.participants.remove(&user_id) {
        return Err(error(StatusCode::BAD_REQUEST, "Not participating"));
    }
    Ok(StatusCode::OK.into_response())
}

async fn list_teachers(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    Ok(Json(state.teachers.clone()).into_response())
}

async fn get_teacher(State(shared): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let id = parse_id(&id)?;
    let teacher = state
        .teachers
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    Ok(Json(teacher.clone()).into_response())
}

async fn get_user(State(shared): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let state = shared.lock().unwrap();
    authorize(&state, &headers)?;
    let id = parse_id(&id)?;
    let user = state.users.get(&id).ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))?;
    Ok(Json(user.account.clone()).into_response())
}

async fn delete_user(State(shared): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    let mut state = shared.lock().unwrap();
    let caller = authorize(&state, &headers)?;
    let id = parse_id(&id)?;
    if !state.users.contains_key(&id) {
        return Err(error(StatusCode::NOT_FOUND, "Not found"));
    }
    if caller != id {
        return Err(error(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    state.users.remove(&id);
    state.tokens.retain(|_, user| *user != id);
    Ok(StatusCode::OK.into_response())
}
