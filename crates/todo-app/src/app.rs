use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, info};

use todo_core::{
    ControllerError, ListController, LoadOutcome, Notice, RemoveOutcome, Startup, SubmitOutcome,
    feedback,
};
use todo_gateway::Redirect;
use todo_model::{Session, Task};

use crate::{
    intent::{HELP, Intent, IntentError},
    views::{Form, FormFate, ScrollContainer, render_navbar},
};

/// Completion of a controller call that ran in the background.
#[derive(Debug)]
pub enum Event {
    Started(Startup),
    Loaded {
        action: &'static str,
        result: Result<LoadOutcome, ControllerError>,
    },
    Saved {
        /// Number handed to the form that issued the submit.
        submit: u64,
        created: bool,
        result: Result<SubmitOutcome, ControllerError>,
    },
    Removed(Result<RemoveOutcome, ControllerError>),
    Renewed(Result<Session, ControllerError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end: turns intents into controller calls and renders the
/// resulting state.
///
/// Controller calls run as tracked tasks so input stays responsive while a
/// request is outstanding; their results come back as [`Event`]s.
pub struct App {
    controller: ListController,
    form: Option<Form>,
    submits: u64,
    scroll: ScrollContainer,
    notices: Vec<Notice>,
    out: String,
    events: mpsc::UnboundedSender<Event>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl App {
    pub fn new(
        controller: ListController,
        rows: usize,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let app = Self {
            controller,
            form: None,
            submits: 0,
            scroll: ScrollContainer::new(rows),
            notices: Vec::new(),
            out: String::new(),
            events,
            tracker: TaskTracker::new(),
            shutdown,
        };
        (app, rx)
    }

    /// Kick off the session check and the initial load.
    pub fn start(&mut self) {
        let c = self.controller.clone();
        self.dispatch(async move { Event::Started(c.initialize().await) });
        self.out.push_str("Checking session...\n");
    }

    pub fn handle(&mut self, intent: Intent) -> Flow {
        debug!(?intent, "intent");
        match intent {
            Intent::Quit => return Flow::Quit,
            Intent::Help => {
                self.out.push_str(HELP);
                self.out.push('\n');
                return Flow::Continue;
            }
            Intent::New => {
                if self.controller.session().is_authenticated {
                    self.form = Some(Form::create());
                } else {
                    self.notify(Notice::warning("Log in to create tasks."));
                }
            }
            Intent::Edit(n) => match self.task_at(n) {
                Some(task) => self.form = Some(Form::edit(&task)),
                None => self.notify(no_card(n)),
            },
            Intent::Delete(n) => match self.task_at(n) {
                Some(task) => {
                    let c = self.controller.clone();
                    self.dispatch(async move { Event::Removed(c.remove_task(&task).await) });
                }
                None => self.notify(no_card(n)),
            },
            Intent::Set(field, value) => match self.form.as_mut() {
                Some(form) => {
                    if let Err(err) = form.set(field, &value) {
                        self.notify(Notice::error(err.to_string()));
                    }
                }
                None => self.notify(no_form()),
            },
            Intent::Save => {
                let submit = self.submits + 1;
                match self.form.as_mut().map(|form| form.begin_submit(submit)) {
                    Some(Some(draft)) => {
                        self.submits = submit;
                        let c = self.controller.clone();
                        let created = !draft.is_edit();
                        self.dispatch(async move {
                            Event::Saved {
                                submit,
                                created,
                                result: c.submit(&draft).await,
                            }
                        });
                    }
                    Some(None) => self.notify(Notice::info("Still saving.")),
                    None => self.notify(no_form()),
                }
            }
            Intent::Cancel => self.form = None,
            Intent::Query(change) => {
                self.scroll.reset();
                let c = self.controller.clone();
                self.dispatch(async move {
                    Event::Loaded {
                        action: "load tasks",
                        result: c.change_query(change).await,
                    }
                });
            }
            Intent::Down(n) => {
                let loaded = self.controller.snapshot().tasks().len();
                if self.scroll.scroll_down(n, loaded) {
                    let c = self.controller.clone();
                    self.dispatch(async move {
                        Event::Loaded {
                            action: "load more tasks",
                            result: c.request_next_page().await,
                        }
                    });
                }
            }
            Intent::Up(n) => self.scroll.scroll_up(n),
            Intent::Refresh => {
                let c = self.controller.clone();
                self.dispatch(async move {
                    Event::Loaded {
                        action: "refresh tasks",
                        result: c.refresh().await,
                    }
                });
            }
            Intent::Renew => {
                let c = self.controller.clone();
                self.dispatch(async move { Event::Renewed(c.renew_session().await) });
            }
            Intent::Login => self.redirect(self.controller.login()),
            Intent::Signup => self.redirect(self.controller.signup()),
            Intent::Logout => {
                self.form = None;
                self.scroll.reset();
                self.redirect(self.controller.logout());
            }
        }
        self.render();
        Flow::Continue
    }

    pub fn on_event(&mut self, event: Event) {
        match event {
            Event::Started(startup) => match startup.initial_load {
                Some(Err(err)) => self.fail("load tasks", &err),
                None => self.notify(Notice::info("Not logged in. Use `login` or `signup`.")),
                Some(Ok(_)) => {}
            },
            Event::Loaded { action, result } => {
                if let Err(err) = result {
                    self.fail(action, &err);
                }
            }
            Event::Saved {
                submit,
                created,
                result,
            } => {
                let fate = self
                    .form
                    .as_mut()
                    .and_then(|form| form.settle(submit, &result));
                match &result {
                    Ok(_) if created => self.notify(Notice::info("Task created.")),
                    Ok(_) => self.notify(Notice::info("Task updated.")),
                    Err(err) => self.fail("save task", err),
                }
                if fate == Some(FormFate::Close) {
                    self.form = None;
                }
            }
            Event::Removed(result) => match result {
                Ok(_) => self.notify(Notice::info("Task deleted.")),
                Err(err) => self.fail("delete task", &err),
            },
            Event::Renewed(result) => match result {
                Ok(session) if session.is_authenticated => {
                    self.notify(Notice::info("Session renewed."))
                }
                Ok(_) => {
                    self.form = None;
                    self.notify(Notice::warning("Session ended. Log in again."));
                }
                Err(err) => self.fail("renew session", &err),
            },
        }
        self.render();
    }

    /// Report a line that did not parse; nothing is re-rendered.
    pub fn reject(&mut self, err: &IntentError) {
        self.out.push_str(&format!("{}\n", Notice::warning(err.to_string())));
    }

    /// Text produced since the last call.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// Cancel outstanding calls and wait for their tasks to finish.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        debug!("background calls drained");
    }

    fn dispatch<F>(&self, call: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let events = self.events.clone();
        let shutdown = self.shutdown.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                event = call => {
                    let _ = events.send(event);
                }
                _ = shutdown.cancelled() => debug!("pending call cancelled"),
            }
        });
    }

    fn render(&mut self) {
        let state = self.controller.snapshot();
        let session = self.controller.session();
        self.scroll.clamp(state.tasks().len());

        self.out.push_str(&render_navbar(&session, state.query()));
        self.out.push('\n');
        if let Some(form) = &self.form {
            self.out.push_str(&form.render());
        }
        if session.is_authenticated {
            self.out.push_str(&self.scroll.render(&state));
        }
        for notice in self.notices.drain(..) {
            self.out.push_str(&format!("{notice}\n"));
        }
    }

    fn redirect(&mut self, redirect: Redirect) {
        info!(target_page = ?redirect.target, url = %redirect.url, "redirect");
        if redirect.url.is_empty() {
            self.notify(Notice::warning(format!(
                "No {:?} URL configured.",
                redirect.target
            )));
        } else {
            self.notify(Notice::info(format!(
                "Continue in your browser: {}",
                redirect.url
            )));
        }
    }

    fn task_at(&self, number: usize) -> Option<Task> {
        let index = number.checked_sub(1)?;
        self.controller.snapshot().tasks().get(index).cloned()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn fail(&mut self, action: &str, err: &ControllerError) {
        let notice = feedback::report(action, err);
        self.notify(notice);
    }
}

fn no_card(n: usize) -> Notice {
    Notice::warning(format!("No task #{n} in the list."))
}

fn no_form() -> Notice {
    Notice::warning("No form is open; use `new` or `edit N`.")
}
