//! Integration tests for the board over real HTTP.
//! Spins up an in-process axum stand-in for the task service on a free port
//! and runs the client against it: wire-level checks first, then full flows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use uuid::Uuid;

use vibeboard::{ApiError, Effect, HttpTaskApi, ProgressTier, Task, TaskApi, TaskStore};

// ─── Task service stand-in ────────────────────────────────────────────────────

#[derive(Clone)]
struct ServerState {
    tasks: Arc<Mutex<Vec<Task>>>,
    fail: Arc<AtomicBool>,
}

impl ServerState {
    fn snapshot(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }
}

#[derive(serde::Deserialize)]
struct CreateTask {
    title: String,
}

async fn list_tasks(State(s): State<ServerState>) -> Result<Json<Vec<Task>>, StatusCode> {
    if s.failing() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(s.snapshot()))
}

async fn create_task(
    State(s): State<ServerState>,
    Json(body): Json<CreateTask>,
) -> Result<Json<Task>, StatusCode> {
    if s.failing() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: body.title,
        completed: false,
    };
    s.tasks.lock().unwrap().push(task.clone());
    Ok(Json(task))
}

async fn toggle_task(
    State(s): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, StatusCode> {
    if s.failing() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut tasks = s.tasks.lock().unwrap();
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(t) => {
            t.completed = !t.completed;
            let out = t.clone();
            Ok(Json(out))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn delete_task(State(s): State<ServerState>, Path(id): Path<String>) -> StatusCode {
    if s.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let mut tasks = s.tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

/// Start the stand-in on a free port and return its base URL plus a handle
/// to the server-side state.
async fn start_task_server(seed: Vec<Task>) -> (String, ServerState) {
    let state = ServerState {
        tasks: Arc::new(Mutex::new(seed)),
        fail: Arc::new(AtomicBool::new(false)),
    };
    let app = Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", delete(delete_task))
        .route("/api/tasks/{id}/complete", put(toggle_task))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{addr}"), state)
}

fn seed_task(id: &str, title: &str, completed: bool) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        completed,
    }
}

fn type_into(store: &mut TaskStore, text: &str) {
    for c in text.chars() {
        store.input_char(c);
    }
}

// ─── Wire-level: HttpTaskApi against the stand-in ─────────────────────────────

#[tokio::test]
async fn test_list_returns_tasks_in_server_order() {
    let (url, _state) = start_task_server(vec![
        seed_task("a", "First", false),
        seed_task("b", "Second", true),
    ])
    .await;
    let api = HttpTaskApi::new(&url).unwrap();

    let tasks = api.list().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "a");
    assert_eq!(tasks[1].id, "b");
    assert!(tasks[1].completed);
}

#[tokio::test]
async fn test_create_posts_title_and_returns_the_server_record() {
    let (url, state) = start_task_server(Vec::new()).await;
    let api = HttpTaskApi::new(&url).unwrap();

    let created = api.create("Ship it").await.unwrap();
    assert_eq!(created.title, "Ship it");
    assert!(!created.completed);
    // The service mints UUIDv4 ids.
    assert!(Uuid::parse_str(&created.id).is_ok());

    let server_side = state.snapshot();
    assert_eq!(server_side.len(), 1);
    assert_eq!(server_side[0].id, created.id);
}

#[tokio::test]
async fn test_toggle_flips_the_server_record_each_call() {
    let (url, state) = start_task_server(vec![seed_task("a", "Flip me", false)]).await;
    let api = HttpTaskApi::new(&url).unwrap();

    api.toggle("a").await.unwrap();
    assert!(state.snapshot()[0].completed);

    api.toggle("a").await.unwrap();
    assert!(!state.snapshot()[0].completed);
}

#[tokio::test]
async fn test_delete_removes_the_server_record() {
    let (url, state) = start_task_server(vec![
        seed_task("a", "Keep", false),
        seed_task("b", "Drop", false),
    ])
    .await;
    let api = HttpTaskApi::new(&url).unwrap();

    api.delete("b").await.unwrap();
    let remaining = state.snapshot();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "a");
}

#[tokio::test]
async fn test_missing_task_surfaces_as_a_status_error() {
    let (url, _state) = start_task_server(Vec::new()).await;
    let api = HttpTaskApi::new(&url).unwrap();

    let err = api.toggle("nope").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(code) if code == StatusCode::NOT_FOUND));

    let err = api.delete("nope").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(code) if code == StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Port 1 is never listening.
    let api = HttpTaskApi::new("http://127.0.0.1:1").unwrap();
    let err = api.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_trailing_slash_base_url_reaches_the_same_routes() {
    let (url, _state) = start_task_server(vec![seed_task("a", "Here", false)]).await;
    let api = HttpTaskApi::new(&format!("{url}/")).unwrap();

    let tasks = api.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
}

// ─── Full flows: TaskStore over HTTP ──────────────────────────────────────────

#[tokio::test]
async fn test_full_board_flow_over_http() {
    let (url, state) = start_task_server(Vec::new()).await;
    let mut store = TaskStore::new(Arc::new(HttpTaskApi::new(&url).unwrap()));

    // Empty board.
    store.load().await;
    assert_eq!(store.state().total(), 0);
    assert_eq!(store.state().progress(), 0);

    // Add a task: appears with the server-assigned id, input cleared.
    type_into(&mut store, "Buy milk");
    store.submit();
    store.settle().await;
    assert_eq!(store.state().total(), 1);
    assert_eq!(store.state().input(), "");
    let id = store.state().tasks()[0].id.clone();

    // Toggle it: optimistic flip + persisted server-side.
    store.toggle(&id);
    assert!(store.state().tasks()[0].completed);
    store.settle().await;
    assert!(state.snapshot()[0].completed);
    assert_eq!(store.state().progress(), 100);

    // A second client sees the same board.
    let mut viewer = TaskStore::new(Arc::new(HttpTaskApi::new(&url).unwrap()));
    viewer.load().await;
    assert_eq!(viewer.state().total(), 1);
    assert!(viewer.state().tasks()[0].completed);

    // Delete it: gone locally, then gone server-side, then gone on reload.
    store.remove(&id);
    assert_eq!(store.state().total(), 0);
    store.settle().await;
    assert!(state.snapshot().is_empty());

    viewer.load().await;
    assert_eq!(viewer.state().total(), 0);
}

#[tokio::test]
async fn test_server_errors_never_roll_back_local_state() {
    let (url, state) = start_task_server(vec![
        seed_task("a", "One", false),
        seed_task("b", "Two", false),
    ])
    .await;
    let mut store = TaskStore::new(Arc::new(HttpTaskApi::new(&url).unwrap()));
    store.load().await;

    state.set_failing(true);

    // Both mutations stick locally even though every request 500s.
    store.toggle("a");
    store.remove("b");
    store.settle().await;
    assert_eq!(store.state().total(), 1);
    assert!(store.state().tasks()[0].completed);

    // The server never saw either change.
    let server_side = state.snapshot();
    assert_eq!(server_side.len(), 2);
    assert!(!server_side[0].completed);

    // Reload reconciles: remote truth replaces the local view wholesale.
    state.set_failing(false);
    store.load().await;
    assert_eq!(store.state().total(), 2);
    assert!(!store.state().tasks()[0].completed);
}

#[tokio::test]
async fn test_failed_create_keeps_the_typed_title() {
    let (url, state) = start_task_server(Vec::new()).await;
    let mut store = TaskStore::new(Arc::new(HttpTaskApi::new(&url).unwrap()));

    state.set_failing(true);
    type_into(&mut store, "Doomed");
    store.submit();
    store.settle().await;

    assert_eq!(store.state().total(), 0);
    assert_eq!(store.state().input(), "Doomed");
    assert!(state.snapshot().is_empty());

    // Retrying once the server recovers works with the buffer as typed.
    state.set_failing(false);
    store.submit();
    store.settle().await;
    assert_eq!(store.state().total(), 1);
    assert_eq!(store.state().tasks()[0].title, "Doomed");
    assert_eq!(store.state().input(), "");
}

#[tokio::test]
async fn test_completing_the_last_task_celebrates_over_http() {
    let (url, _state) = start_task_server(vec![
        seed_task("a", "Done already", true),
        seed_task("b", "Last one", false),
    ])
    .await;
    let mut store = TaskStore::new(Arc::new(HttpTaskApi::new(&url).unwrap()));
    store.load().await;
    assert_eq!(store.state().progress(), 50);

    store.toggle("b");
    store.settle().await;

    assert_eq!(store.state().progress(), 100);
    assert_eq!(store.state().tier(), ProgressTier::Complete);
    assert_eq!(store.take_effects(), vec![Effect::Celebrate]);
    // Drained: the effect fires once, not once per frame.
    assert_eq!(store.take_effects(), Vec::new());
}
