//! In-memory gateways for controller tests.

use std::{
    collections::VecDeque,
    ops::Range,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use todo_gateway::{GatewayError, Redirect, RedirectTarget, SessionGateway, TaskGateway};
use todo_model::{Session, Task, TaskDraft, TaskId, TaskPage, TaskPriority, TaskQuery, TaskStatus};

pub fn task(i: usize, priority: TaskPriority, status: TaskStatus) -> Task {
    Task {
        id: Some(TaskId::from(format!("t{i}"))),
        title: format!("task {i}"),
        description: String::new(),
        status,
        priority,
        deadline: None,
        creation_date: Some("2024-01-01T00:00:00Z".into()),
    }
}

/// Even-numbered tasks are `HIGH`, every fifth is `DONE`.
pub fn numbered(i: usize) -> Task {
    let priority = if i % 2 == 0 {
        TaskPriority::High
    } else {
        TaskPriority::Low
    };
    let status = if i % 5 == 0 {
        TaskStatus::Done
    } else {
        TaskStatus::Todo
    };
    task(i, priority, status)
}

pub fn page_of(ids: Range<usize>, total: usize) -> TaskPage<Task> {
    TaskPage {
        items: ids.map(numbered).collect(),
        total,
    }
}

/// Which gateway operation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

/// Task service double: filters and paginates like the real one, records
/// every list query, and can hold, stall or fail calls on demand.
pub struct FakeTasks {
    store: Mutex<Vec<Task>>,
    queries: Mutex<Vec<TaskQuery>>,
    failures: Mutex<VecDeque<(Op, GatewayError)>>,
    hold: AtomicBool,
    stall: AtomicBool,
    release: Semaphore,
    created: AtomicUsize,
}

impl FakeTasks {
    pub fn with_tasks(count: usize) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new((1..=count).map(numbered).collect()),
            queries: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            hold: AtomicBool::new(false),
            stall: AtomicBool::new(false),
            release: Semaphore::new(0),
            created: AtomicUsize::new(0),
        })
    }

    pub fn queries(&self) -> Vec<TaskQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn stored(&self) -> Vec<Task> {
        self.store.lock().unwrap().clone()
    }

    pub fn fail_next(&self, op: Op, err: GatewayError) {
        self.failures.lock().unwrap().push_back((op, err));
    }

    /// Park list calls until [`FakeTasks::release`] hands out permits.
    pub fn hold_lists(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release(&self, calls: usize) {
        self.release.add_permits(calls);
    }

    /// Make list calls never answer.
    pub fn stall_lists(&self) {
        self.stall.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self, op: Op) -> Option<GatewayError> {
        let mut failures = self.failures.lock().unwrap();
        let pos = failures.iter().position(|(o, _)| *o == op)?;
        failures.remove(pos).map(|(_, err)| err)
    }
}

fn not_found() -> GatewayError {
    GatewayError::server(404, "Task not found")
}

fn from_draft(id: TaskId, draft: &TaskDraft) -> Task {
    Task {
        id: Some(id),
        title: draft.title.clone(),
        description: draft.description.clone(),
        status: draft.status,
        priority: draft.priority,
        deadline: (!draft.deadline.is_empty()).then(|| draft.deadline.clone()),
        creation_date: Some("2024-06-01T00:00:00Z".into()),
    }
}

#[async_trait]
impl TaskGateway for FakeTasks {
    async fn list(&self, query: &TaskQuery) -> Result<TaskPage<Task>, GatewayError> {
        self.queries.lock().unwrap().push(query.clone());

        if self.stall.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.hold.load(Ordering::SeqCst) {
            self.release.acquire().await.unwrap().forget();
        }
        if let Some(err) = self.take_failure(Op::List) {
            return Err(err);
        }

        let store = self.store.lock().unwrap();
        let matching: Vec<&Task> = store
            .iter()
            .filter(|t| query.priority.is_none_or(|p| t.priority == p))
            .filter(|t| query.status.is_none_or(|s| t.status == s))
            .collect();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(query.offset())
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(TaskPage { items, total })
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Option<Task>, GatewayError> {
        if let Some(err) = self.take_failure(Op::Create) {
            return Err(err);
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let task = from_draft(TaskId::from(format!("new-{n}")), draft);
        // Newest first, matching the default sort.
        self.store.lock().unwrap().insert(0, task.clone());
        Ok(Some(task))
    }

    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<Option<Task>, GatewayError> {
        if let Some(err) = self.take_failure(Op::Update) {
            return Err(err);
        }
        let mut store = self.store.lock().unwrap();
        let slot = store.iter_mut().find(|t| t.has_id(id)).ok_or_else(not_found)?;
        *slot = from_draft(id.clone(), draft);
        // Degraded servers answer updates without a body.
        Ok(None)
    }

    async fn delete(&self, id: &TaskId) -> Result<(), GatewayError> {
        if let Some(err) = self.take_failure(Op::Delete) {
            return Err(err);
        }
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|t| !t.has_id(id));
        if store.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn health(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Identity service double.
pub struct FakeSession {
    check: Mutex<Result<Session, GatewayError>>,
    refresh: Mutex<Result<(), GatewayError>>,
    forgotten: AtomicBool,
}

impl FakeSession {
    pub fn logged_in(email: &str) -> Arc<Self> {
        Arc::new(Self {
            check: Mutex::new(Ok(Session::authenticated(Some(email.to_string())))),
            refresh: Mutex::new(Ok(())),
            forgotten: AtomicBool::new(false),
        })
    }

    pub fn failing(err: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            check: Mutex::new(Err(err)),
            refresh: Mutex::new(Ok(())),
            forgotten: AtomicBool::new(false),
        })
    }

    pub fn set_check(&self, result: Result<Session, GatewayError>) {
        *self.check.lock().unwrap() = result;
    }

    pub fn set_refresh(&self, result: Result<(), GatewayError>) {
        *self.refresh.lock().unwrap() = result;
    }

    pub fn forgotten(&self) -> bool {
        self.forgotten.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionGateway for FakeSession {
    async fn check_session(&self) -> Result<Session, GatewayError> {
        self.check.lock().unwrap().clone()
    }

    async fn refresh(&self) -> Result<(), GatewayError> {
        self.refresh.lock().unwrap().clone()
    }

    /// Like a cleared cookie jar: later checks come back anonymous.
    fn forget_credentials(&self) {
        self.forgotten.store(true, Ordering::SeqCst);
        *self.check.lock().unwrap() = Ok(Session::anonymous());
    }

    fn redirect_to_login(&self) -> Redirect {
        Redirect::new(RedirectTarget::Login, "https://auth.example.test/login")
    }

    fn redirect_to_signup(&self) -> Redirect {
        Redirect::new(RedirectTarget::Signup, "https://auth.example.test/signup")
    }

    fn redirect_to_logout(&self) -> Redirect {
        Redirect::new(RedirectTarget::Logout, "https://auth.example.test/logout")
    }
}
