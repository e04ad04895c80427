//! Application controller: session state machine and form handlers.
//!
//! # Responsibility
//! - Drive the two-state session machine from the gateway feed.
//! - Own the single live task subscription scoped to the session.
//! - Translate handler outcomes into structured logs and notices.
//!
//! # Invariants
//! - Establishing a new task subscription first releases any prior one;
//!   sign-out releases it explicitly.
//! - Handlers perform exactly one external call each; none of them
//!   refresh the list manually.
//! - Every failure path queues a notice and returns control to the idle
//!   UI; nothing here is fatal.

use crate::app::notice::Notice;
use crate::app::presenter::{TaskListPresenter, TaskRow};
use crate::auth::AuthGateway;
use crate::model::session::Session;
use crate::model::task::TaskId;
use crate::repo::RepoResult;
use crate::store::{SubscriptionId, TaskSnapshot, TaskStore};
use log::{error, info};
use rusqlite::Connection;
use std::sync::mpsc::Receiver;

/// Which UI region is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-up and login forms.
    Auth,
    /// Task list plus add-task form.
    Tasks,
}

/// Top-level application state wiring gateway, store and presenter.
pub struct App<'conn> {
    gateway: AuthGateway<'conn>,
    store: TaskStore<'conn>,
    presenter: TaskListPresenter,
    screen: Screen,
    session: Option<Session>,
    auth_feed: Receiver<Option<Session>>,
    task_feed: Option<(SubscriptionId, Receiver<TaskSnapshot>)>,
    notices: Vec<Notice>,
}

impl<'conn> App<'conn> {
    /// Builds the application over a migrated connection.
    ///
    /// The first session-feed value decides the initial screen; with no
    /// stored session state that is always the auth screen.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let mut gateway = AuthGateway::try_new(conn)?;
        let auth_feed = gateway.subscribe();
        let mut app = Self {
            gateway,
            store: TaskStore::try_new(conn)?,
            presenter: TaskListPresenter::new(),
            screen: Screen::Auth,
            session: None,
            auth_feed,
            task_feed: None,
            notices: Vec::new(),
        };
        app.process_events();
        Ok(app)
    }

    // ---- form handlers -------------------------------------------------

    /// Sign-up form: one account-creation call against the gateway.
    pub fn sign_up(&mut self, email: &str, password: &str) {
        match self.gateway.create_account(email, password) {
            Ok(_) => self.notices.push(Notice::Info("Sign-up successful!".to_string())),
            Err(err) => {
                error!("event=sign_up module=app status=error error={err}");
                self.notices.push(Notice::Error(format!("Sign-up error: {err}")));
            }
        }
        self.process_events();
    }

    /// Login form: one credential sign-in call against the gateway.
    pub fn log_in(&mut self, email: &str, password: &str) {
        match self.gateway.sign_in(email, password) {
            Ok(_) => self.notices.push(Notice::Info("Login successful!".to_string())),
            Err(err) => {
                error!("event=log_in module=app status=error error={err}");
                self.notices.push(Notice::Error(format!("Login error: {err}")));
            }
        }
        self.process_events();
    }

    /// Logout button: one sign-out call against the gateway.
    pub fn log_out(&mut self) {
        match self.gateway.sign_out() {
            Ok(()) => self.notices.push(Notice::Info("Logout successful!".to_string())),
            Err(err) => error!("event=log_out module=app status=error error={err}"),
        }
        self.process_events();
    }

    /// Add-task form: one create call against the store.
    ///
    /// # Contract
    /// - Blank trimmed text queues a validation notice; no create call.
    /// - Without a session queues a validation notice; no create call.
    /// - The list updates via the live subscription only.
    pub fn add_task(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.notices.push(Notice::Error("Task cannot be empty".to_string()));
            return;
        }

        let owner_id = match &self.session {
            Some(session) => session.user_id,
            None => {
                self.notices.push(Notice::Error(
                    "User must be logged in to add a task.".to_string(),
                ));
                return;
            }
        };

        if let Err(err) = self.store.add_task(owner_id, text) {
            error!("event=add_task module=app status=error error={err}");
            self.notices.push(Notice::Error(format!("Error adding task: {err}")));
        }
        self.process_events();
    }

    // ---- row controls --------------------------------------------------

    /// Delete control: one delete-by-id call against the store.
    pub fn delete_task(&mut self, id: TaskId) {
        match self.store.delete_task(id) {
            Ok(()) => info!("event=delete_task module=app status=ok task_id={id}"),
            Err(err) => {
                error!("event=delete_task module=app status=error task_id={id} error={err}");
                self.notices.push(Notice::Error(format!("Error deleting task: {err}")));
            }
        }
        self.process_events();
    }

    /// Modify control: switches one row to inline editing.
    pub fn begin_edit(&mut self, id: TaskId) {
        if !self.presenter.begin_edit(id) {
            self.notices.push(Notice::Error(format!("Task not found: {id}")));
        }
    }

    /// Cancels inline editing for one row without issuing any request.
    pub fn cancel_edit(&mut self, id: TaskId) {
        self.presenter.cancel_edit(id);
    }

    /// Submits replacement text for one row.
    ///
    /// # Contract
    /// - Blank trimmed replacement queues a validation notice and issues
    ///   zero update requests; the row stays in editing state.
    /// - Non-blank input issues exactly one update; the row returns to
    ///   viewing state and the list re-renders via the subscription.
    pub fn submit_edit(&mut self, id: TaskId, text: &str) {
        if text.trim().is_empty() {
            self.notices.push(Notice::Error("Task cannot be empty.".to_string()));
            return;
        }

        match self.store.update_task_text(id, text) {
            Ok(()) => {
                self.presenter.cancel_edit(id);
                info!("event=submit_edit module=app status=ok task_id={id}");
            }
            Err(err) => {
                error!("event=submit_edit module=app status=error task_id={id} error={err}");
                self.notices.push(Notice::Error(format!("Error updating task: {err}")));
            }
        }
        self.process_events();
    }

    // ---- event pump ----------------------------------------------------

    /// Drains pending session transitions and task snapshots.
    ///
    /// Safe to call at any time; handlers call it after every external
    /// call so view state is current when they return.
    pub fn process_events(&mut self) {
        loop {
            match self.auth_feed.try_recv() {
                Ok(Some(session)) => self.enter_authenticated(session),
                Ok(None) => self.enter_unauthenticated(),
                Err(_) => break,
            }
        }

        if let Some((_, feed)) = &self.task_feed {
            loop {
                match feed.try_recv() {
                    Ok(snapshot) => self.presenter.apply_snapshot(&snapshot),
                    Err(_) => break,
                }
            }
        }
    }

    // ---- view accessors ------------------------------------------------

    /// Returns the visible UI region.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns the rendered task rows.
    pub fn rows(&self) -> &[TaskRow] {
        self.presenter.rows()
    }

    /// Returns the session currently driving the task screen.
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns queued notices, emptying the queue.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Returns the number of live task subscriptions held by the store.
    pub fn active_subscriptions(&self) -> usize {
        self.store.active_subscriptions()
    }

    // ---- session transitions -------------------------------------------

    fn enter_authenticated(&mut self, session: Session) {
        // Release any prior subscription before establishing a new one so
        // repeated login cycles never stack live queries.
        self.release_task_feed();

        match self.store.subscribe(session.user_id) {
            Ok(feed) => self.task_feed = Some(feed),
            Err(err) => {
                error!(
                    "event=session_transition module=app status=error user_id={} error={err}",
                    session.user_id
                );
                self.notices.push(Notice::Error(format!("Error loading tasks: {err}")));
            }
        }

        info!(
            "event=session_transition module=app status=ok state=authenticated user_id={}",
            session.user_id
        );
        self.session = Some(session);
        self.screen = Screen::Tasks;
    }

    fn enter_unauthenticated(&mut self) {
        self.release_task_feed();
        self.presenter.clear();
        self.session = None;
        self.screen = Screen::Auth;
        info!("event=session_transition module=app status=ok state=unauthenticated");
    }

    fn release_task_feed(&mut self) {
        if let Some((id, _)) = self.task_feed.take() {
            self.store.unsubscribe(id);
        }
    }
}
