use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
    time::Duration,
};

use tracing::{debug, info, instrument, warn};

use todo_gateway::{GatewayError, Redirect, SessionGateway, TaskGateway};
use todo_model::{
    DEFAULT_LIMIT, Session, SortKey, SortOrder, Task, TaskDraft, TaskId, TaskPriority, TaskQuery,
    TaskStatus,
};

use crate::{
    error::ControllerError,
    state::{ListState, Settled},
};

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Fixed page size for every list request.
    pub limit: u32,
    /// Upper bound for any single gateway call.
    pub call_timeout_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            call_timeout_ms: 10_000,
        }
    }
}

/// A single filter or sort adjustment raised by the navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    Priority(Option<TaskPriority>),
    Status(Option<TaskStatus>),
    Sort(Option<SortKey>),
    Order(SortOrder),
}

impl QueryChange {
    pub fn apply(&self, query: &TaskQuery) -> TaskQuery {
        let query = query.clone();
        match *self {
            QueryChange::Priority(p) => query.with_priority(p),
            QueryChange::Status(s) => query.with_status(s),
            QueryChange::Sort(k) => query.with_sort(k),
            QueryChange::Order(o) => query.with_order(o),
        }
    }
}

/// What a list load did to the loaded set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Replaced { count: usize, total: usize },
    Appended { count: usize, total: usize },
    /// Another load was in flight or there was nothing left to fetch.
    Skipped,
    /// Another load was in flight; it reloads for the new query when it settles.
    Deferred,
    /// The requested selection was already active.
    Unchanged,
}

/// Result of [`ListController::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    pub session: Session,
    /// `None` when no load was attempted because the user is logged out.
    pub initial_load: Option<Result<LoadOutcome, ControllerError>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Representation returned by the service, if it sent one.
    pub saved: Option<Task>,
    pub created: bool,
    pub reload: LoadOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Whether the task was part of the loaded set.
    pub removed: bool,
}

/// Reconciles query parameters, loaded tasks and remote mutations.
///
/// Cheap to clone; clones share state, so intents may run as separate tasks.
/// At most one list load is outstanding at any time.
#[derive(Clone)]
pub struct ListController {
    tasks: Arc<dyn TaskGateway>,
    sessions: Arc<dyn SessionGateway>,
    state: Arc<Mutex<ListState>>,
    session: Arc<RwLock<Session>>,
    call_timeout: Duration,
    limit: u32,
}

/// Releases the loader if a load future is dropped before it settles.
struct InFlight {
    state: Arc<Mutex<ListState>>,
    flight: u64,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock_state(&self.state).abort_load(self.flight);
    }
}

fn lock_state(state: &Mutex<ListState>) -> MutexGuard<'_, ListState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ListController {
    pub fn new(
        tasks: Arc<dyn TaskGateway>,
        sessions: Arc<dyn SessionGateway>,
        config: &ControllerConfig,
    ) -> Self {
        let limit = config.limit.max(1);
        Self {
            tasks,
            sessions,
            state: Arc::new(Mutex::new(ListState::new(
                TaskQuery::new().with_limit(limit),
            ))),
            session: Arc::new(RwLock::new(Session::anonymous())),
            call_timeout: Duration::from_millis(config.call_timeout_ms),
            limit,
        }
    }

    /// Copy of the current list state for rendering.
    pub fn snapshot(&self) -> ListState {
        self.lock().clone()
    }

    pub fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check the session once and, when logged in, load the first page.
    ///
    /// A failed session check counts as logged out and is not reported.
    #[instrument(level = "info", skip(self))]
    pub async fn initialize(&self) -> Startup {
        let session = self.check_session().await;
        self.set_session(session.clone());

        if !session.is_authenticated {
            info!("not authenticated; initial load skipped");
            return Startup {
                session,
                initial_load: None,
            };
        }

        let target = {
            let mut state = self.lock();
            state.reset(self.default_query());
            state.query().clone()
        };
        let initial_load = Some(self.reload(target).await);
        Startup {
            session,
            initial_load,
        }
    }

    /// Apply a filter or sort change and load its first page.
    #[instrument(level = "debug", skip(self))]
    pub async fn change_query(&self, change: QueryChange) -> Result<LoadOutcome, ControllerError> {
        self.require_session()?;
        let target = {
            let mut state = self.lock();
            let next = change.apply(state.query());
            if next.same_selection(state.query()) {
                return Ok(LoadOutcome::Unchanged);
            }
            state.reset(next);
            state.query().clone()
        };
        self.reload(target).await
    }

    /// Fetch the page after the loaded ones.
    ///
    /// No effect while a load is in flight or once every matching task is
    /// loaded, so repeated scroll events are harmless.
    #[instrument(level = "debug", skip(self))]
    pub async fn request_next_page(&self) -> Result<LoadOutcome, ControllerError> {
        self.require_session()?;
        let target = self.lock().next_page();
        match target {
            Some(query) => self.run_load(query).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Reload the first page of the current query.
    #[instrument(level = "debug", skip(self))]
    pub async fn refresh(&self) -> Result<LoadOutcome, ControllerError> {
        self.require_session()?;
        let target = {
            let mut state = self.lock();
            state.invalidate();
            state.query().first_page()
        };
        self.reload(target).await
    }

    /// Create or update a task, then reload the first page so the saved task
    /// shows up where the service orders it.
    #[instrument(level = "debug", skip_all, fields(edit = draft.is_edit()))]
    pub async fn submit(&self, draft: &TaskDraft) -> Result<SubmitOutcome, ControllerError> {
        self.require_session()?;
        let saved = match &draft.id {
            Some(id) => self.bounded(self.tasks.update(id, draft)).await?,
            None => self.bounded(self.tasks.create(draft)).await?,
        };
        info!(created = draft.id.is_none(), "task saved");

        let target = {
            let mut state = self.lock();
            state.invalidate();
            state.query().first_page()
        };
        let reload = self.reload(target).await.map_err(|e| match e {
            ControllerError::Gateway(source) => ControllerError::Refresh(source),
            other => other,
        })?;

        Ok(SubmitOutcome {
            saved,
            created: draft.id.is_none(),
            reload,
        })
    }

    /// Delete a task and drop it from the loaded set.
    #[instrument(level = "debug", skip_all, fields(%id))]
    pub async fn remove(&self, id: &TaskId) -> Result<RemoveOutcome, ControllerError> {
        self.require_session()?;
        self.bounded(self.tasks.delete(id)).await?;
        let removed = self.lock().remove(id);
        info!(removed, "task deleted");
        Ok(RemoveOutcome { removed })
    }

    pub async fn remove_task(&self, task: &Task) -> Result<RemoveOutcome, ControllerError> {
        let id = task.id.as_ref().ok_or(ControllerError::MissingId)?;
        self.remove(id).await
    }

    /// Renew the identity token and re-check the session.
    ///
    /// Losing the session clears the loaded list.
    #[instrument(level = "debug", skip(self))]
    pub async fn renew_session(&self) -> Result<Session, ControllerError> {
        self.bounded(self.sessions.refresh()).await?;
        let session = self.check_session().await;
        self.set_session(session.clone());
        if !session.is_authenticated {
            self.lock().reset(self.default_query());
        }
        Ok(session)
    }

    pub fn login(&self) -> Redirect {
        self.sessions.redirect_to_login()
    }

    pub fn signup(&self) -> Redirect {
        self.sessions.redirect_to_signup()
    }

    /// Forget the session, its credentials and the loaded list, then hand
    /// back the logout navigation target.
    ///
    /// A load still in flight is discarded when it settles.
    pub fn logout(&self) -> Redirect {
        self.set_session(Session::anonymous());
        self.sessions.forget_credentials();
        self.lock().reset(self.default_query());
        self.sessions.redirect_to_logout()
    }

    /// Liveness of the task service.
    pub async fn ping(&self) -> Result<(), ControllerError> {
        Ok(self.bounded(self.tasks.health()).await?)
    }

    /// Load after a reset; a busy loader picks the new query up itself.
    async fn reload(&self, target: TaskQuery) -> Result<LoadOutcome, ControllerError> {
        match self.run_load(target).await? {
            LoadOutcome::Skipped => Ok(LoadOutcome::Deferred),
            outcome => Ok(outcome),
        }
    }

    async fn run_load(&self, target: TaskQuery) -> Result<LoadOutcome, ControllerError> {
        let ticket = self.lock().begin_load(target);
        let Some(mut ticket) = ticket else {
            debug!("load already in flight; request dropped");
            return Ok(LoadOutcome::Skipped);
        };
        let _flight = InFlight {
            state: Arc::clone(&self.state),
            flight: ticket.flight(),
        };

        loop {
            debug!(page = ticket.query().page, "loading tasks");
            let result = self.bounded(self.tasks.list(ticket.query())).await;
            let settled = {
                let mut state = self.lock();
                match result {
                    Ok(page) => state.apply(&ticket, page),
                    Err(err) => state.fail(&ticket, err),
                }
            };

            match settled {
                Settled::Replaced { count, total } => {
                    debug!(count, total, "loaded tasks replaced");
                    return Ok(LoadOutcome::Replaced { count, total });
                }
                Settled::Appended { count, total } => {
                    debug!(count, total, "loaded tasks appended");
                    return Ok(LoadOutcome::Appended { count, total });
                }
                // The session is cleared before the list, so a reset caused
                // by a logout is always observed here as logged out.
                Settled::Superseded(_) if !self.session().is_authenticated => {
                    debug!("session ended while loading; response discarded");
                    return Err(ControllerError::NotAuthenticated);
                }
                Settled::Superseded(next) => {
                    debug!("query changed while loading; stale response discarded");
                    ticket = next;
                }
                Settled::Failed(err) => {
                    warn!(error = %err, "task list load failed");
                    return Err(err.into());
                }
            }
        }
    }

    /// Any failure counts as logged out.
    async fn check_session(&self) -> Session {
        match self.bounded(self.sessions.check_session()).await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "session check failed; continuing logged out");
                Session::anonymous()
            }
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| GatewayError::Timeout(self.call_timeout))?
    }

    fn require_session(&self) -> Result<(), ControllerError> {
        if self.session().is_authenticated {
            Ok(())
        } else {
            Err(ControllerError::NotAuthenticated)
        }
    }

    fn set_session(&self, session: Session) {
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn default_query(&self) -> TaskQuery {
        TaskQuery::new().with_limit(self.limit)
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        lock_state(&self.state)
    }
}
