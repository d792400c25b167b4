use std::collections::HashSet;

use todo_gateway::GatewayError;
use todo_model::{Task, TaskId, TaskPage, TaskQuery};

/// Single-flight state of the list loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    /// A load is outstanding; `flight` identifies it across supersessions.
    Loading { flight: u64 },
}

/// Tag carried by an outstanding load.
///
/// Captures the query the request was issued for and the epoch it belongs to.
/// A response is merged only while the epoch is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    flight: u64,
    epoch: u64,
    query: TaskQuery,
}

impl LoadTicket {
    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub fn flight(&self) -> u64 {
        self.flight
    }
}

/// How a load settled against the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// First page: the loaded set was replaced.
    Replaced { count: usize, total: usize },
    /// Later page: tasks were appended to the loaded set.
    Appended { count: usize, total: usize },
    /// The ticket went stale; the loader stays armed with a ticket for the
    /// first page of the current query.
    Superseded(LoadTicket),
    /// The call failed; the loaded set is untouched.
    Failed(GatewayError),
}

/// Loaded tasks plus the query they were loaded for.
///
/// Every mutation goes through one of the transitions below, so the loaded
/// set only ever reflects a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    query: TaskQuery,
    tasks: Vec<Task>,
    total: usize,
    epoch: u64,
    flights: u64,
    phase: LoadPhase,
}

impl ListState {
    pub fn new(query: TaskQuery) -> Self {
        Self {
            query: query.first_page(),
            tasks: Vec::new(),
            total: 0,
            epoch: 0,
            flights: 0,
            phase: LoadPhase::Idle,
        }
    }

    /// Query of the loaded set; `page` is the last page merged.
    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading { .. })
    }

    /// Returns `true` if the server reported more matching tasks than are loaded.
    pub fn has_more(&self) -> bool {
        self.tasks.len() < self.total
    }

    /// Switch to a new selection: first page, nothing loaded.
    ///
    /// An outstanding load becomes stale.
    pub fn reset(&mut self, query: TaskQuery) {
        self.epoch += 1;
        self.query = query.first_page();
        self.tasks.clear();
        self.total = 0;
    }

    /// Keep the selection but stale any outstanding load, ahead of a reload
    /// from the first page.
    ///
    /// The loaded set and its last page stay until a reload replaces them, so
    /// a failed reload leaves scrolling where it was.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }

    /// Arm the loader for `query`, or `None` if a load is already in flight.
    pub fn begin_load(&mut self, query: TaskQuery) -> Option<LoadTicket> {
        if self.is_loading() {
            return None;
        }
        self.flights += 1;
        self.phase = LoadPhase::Loading {
            flight: self.flights,
        };
        Some(LoadTicket {
            flight: self.flights,
            epoch: self.epoch,
            query,
        })
    }

    /// Query for the page after the loaded ones, if one should be requested.
    pub fn next_page(&self) -> Option<TaskQuery> {
        if self.is_loading() || !self.has_more() {
            return None;
        }
        Some(self.query.next_page())
    }

    /// Merge a successful response.
    pub fn apply(&mut self, ticket: &LoadTicket, page: TaskPage<Task>) -> Settled {
        if let Some(next) = self.supersede(ticket) {
            return Settled::Superseded(next);
        }
        self.phase = LoadPhase::Idle;
        self.total = page.total;
        self.query = ticket.query.clone();

        if ticket.query.page <= 1 {
            let count = page.items.len();
            self.tasks = page.items;
            return Settled::Replaced {
                count,
                total: self.total,
            };
        }

        // Rows can shift between page reads; keep identifiers unique.
        let known: HashSet<TaskId> = self.tasks.iter().filter_map(|t| t.id.clone()).collect();
        let fresh: Vec<Task> = page
            .items
            .into_iter()
            .filter(|t| t.id.as_ref().is_none_or(|id| !known.contains(id)))
            .collect();
        let count = fresh.len();
        self.tasks.extend(fresh);
        Settled::Appended {
            count,
            total: self.total,
        }
    }

    /// Record a failed response.
    pub fn fail(&mut self, ticket: &LoadTicket, err: GatewayError) -> Settled {
        if let Some(next) = self.supersede(ticket) {
            return Settled::Superseded(next);
        }
        self.phase = LoadPhase::Idle;
        Settled::Failed(err)
    }

    /// Release the loader if `flight` still holds it.
    pub fn abort_load(&mut self, flight: u64) {
        if self.phase == (LoadPhase::Loading { flight }) {
            self.phase = LoadPhase::Idle;
        }
    }

    /// Drop a deleted task from the loaded set.
    ///
    /// `total` shrinks with it so `has_more` stays accurate until the next load.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.has_id(id));
        let removed = self.tasks.len() < before;
        if removed {
            self.total = self.total.saturating_sub(1);
        }
        removed
    }

    fn supersede(&mut self, ticket: &LoadTicket) -> Option<LoadTicket> {
        if ticket.epoch == self.epoch {
            return None;
        }
        Some(LoadTicket {
            flight: ticket.flight,
            epoch: self.epoch,
            query: self.query.first_page(),
        })
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(TaskQuery::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page_of, task};
    use todo_model::{TaskPriority, TaskStatus};

    fn loaded(pages: u32, total: usize) -> ListState {
        let mut state = ListState::default();
        for n in 1..=pages {
            let query = state.query().clone().with_page(n);
            let ticket = state.begin_load(query).unwrap();
            let start = (n as usize - 1) * 10 + 1;
            state.apply(&ticket, page_of(start..start + 10, total));
        }
        state
    }

    #[test]
    fn first_page_replaces() {
        let mut state = loaded(2, 25);
        let ticket = state.begin_load(state.query().first_page()).unwrap();
        let settled = state.apply(&ticket, page_of(101..104, 3));

        assert_eq!(settled, Settled::Replaced { count: 3, total: 3 });
        assert_eq!(state.tasks().len(), 3);
        assert_eq!(state.query().page, 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn later_page_appends_in_order() {
        let state = loaded(2, 25);
        let ids: Vec<&str> = state
            .tasks()
            .iter()
            .map(|t| t.id.as_ref().unwrap().as_str())
            .collect();
        let expected: Vec<String> = (1..=20).map(|i| format!("t{i}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(state.total(), 25);
        assert_eq!(state.query().page, 2);
    }

    #[test]
    fn append_skips_already_loaded_ids() {
        let mut state = loaded(1, 25);
        let ticket = state.begin_load(state.query().next_page()).unwrap();
        let settled = state.apply(&ticket, page_of(10..20, 25));

        assert_eq!(settled, Settled::Appended { count: 9, total: 25 });
        assert_eq!(state.tasks().len(), 19);
    }

    #[test]
    fn single_flight() {
        let mut state = ListState::default();
        assert!(state.begin_load(TaskQuery::new()).is_some());
        assert!(state.begin_load(TaskQuery::new()).is_none());
        assert!(state.next_page().is_none());
    }

    #[test]
    fn next_page_requires_more_results() {
        let state = loaded(1, 25);
        assert_eq!(state.next_page().map(|q| q.page), Some(2));

        let state = loaded(1, 10);
        assert!(state.next_page().is_none());
    }

    #[test]
    fn reset_discards_loaded_pages_and_stales_flight() {
        let mut state = loaded(2, 25);
        let ticket = state.begin_load(state.query().next_page()).unwrap();

        let filtered = state
            .query()
            .clone()
            .with_priority(Some(TaskPriority::High))
            .with_page(2);
        state.reset(filtered);
        assert!(state.tasks().is_empty());
        assert_eq!(state.total(), 0);
        assert_eq!(state.query().page, 1);

        let settled = state.apply(&ticket, page_of(21..26, 25));
        let Settled::Superseded(next) = settled else {
            panic!("expected supersession, got {settled:?}");
        };
        assert_eq!(next.flight(), ticket.flight());
        assert_eq!(next.query().page, 1);
        assert_eq!(next.query().priority, Some(TaskPriority::High));
        assert!(state.tasks().is_empty());
        assert!(state.is_loading());

        let settled = state.apply(&next, page_of(1..4, 3));
        assert_eq!(settled, Settled::Replaced { count: 3, total: 3 });
        assert!(!state.is_loading());
    }

    #[test]
    fn failure_keeps_loaded_set() {
        let mut state = loaded(1, 25);
        let ticket = state.begin_load(state.query().next_page()).unwrap();
        let err = GatewayError::server(500, "boom");

        assert_eq!(state.fail(&ticket, err.clone()), Settled::Failed(err));
        assert_eq!(state.tasks().len(), 10);
        assert_eq!(state.query().page, 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn stale_failure_rearms_for_current_query() {
        let mut state = loaded(1, 25);
        let ticket = state.begin_load(state.query().next_page()).unwrap();
        state.invalidate();

        let settled = state.fail(&ticket, GatewayError::Transport("down".into()));
        assert!(matches!(settled, Settled::Superseded(ref t) if t.query().page == 1));
        assert!(state.is_loading());
    }

    #[test]
    fn abort_only_releases_own_flight() {
        let mut state = ListState::default();
        let first = state.begin_load(TaskQuery::new()).unwrap();
        state.abort_load(first.flight());
        assert!(!state.is_loading());

        let second = state.begin_load(TaskQuery::new()).unwrap();
        state.abort_load(first.flight());
        assert_eq!(
            state.phase(),
            LoadPhase::Loading {
                flight: second.flight()
            }
        );
    }

    #[test]
    fn remove_drops_task_and_shrinks_total() {
        let mut state = loaded(1, 25);
        assert!(state.remove(&TaskId::from("t3")));
        assert!(state.tasks().iter().all(|t| !t.has_id(&TaskId::from("t3"))));
        assert_eq!(state.total(), 24);

        assert!(!state.remove(&TaskId::from("missing")));
        assert_eq!(state.total(), 24);
    }

    #[test]
    fn failed_reload_keeps_scroll_position() {
        let mut state = loaded(2, 25);
        state.invalidate();
        let ticket = state.begin_load(state.query().first_page()).unwrap();
        state.fail(&ticket, GatewayError::Transport("down".into()));

        assert_eq!(state.tasks().len(), 20);
        assert_eq!(state.next_page().map(|q| q.page), Some(3));
    }

    #[test]
    fn invalidate_keeps_tasks_until_reload() {
        let mut state = loaded(2, 25);
        state.invalidate();
        assert_eq!(state.tasks().len(), 20);
        assert_eq!(state.query().page, 2);

        let extra = task(99, TaskPriority::Low, TaskStatus::Todo);
        let ticket = state.begin_load(state.query().first_page()).unwrap();
        state.apply(
            &ticket,
            TaskPage {
                items: vec![extra.clone()],
                total: 1,
            },
        );
        assert_eq!(state.tasks(), &[extra]);
    }
}
