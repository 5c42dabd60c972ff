//! Application state and the background-event plumbing.
//!
//! The TUI thread never blocks on the network: loads run on spawned
//! tasks and post `AppEvent`s back over an unbounded channel, drained
//! once per frame by `process_events`. Session events from the API
//! client (token expiry) route the UI back to the login page.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, SessionEvent};
use crate::config::Config;
use crate::data::{DataManager, LoadResult};
use crate::demo;
use crate::models::{AnalyticsBundle, Task, UserProfile};
use crate::storage::{LocalStore, KEY_USERNAME};
use crate::ui::confirm::{ConfirmDialog, ConfirmKind, ConfirmOutcome};
use crate::ui::nav::{resolve_route, Page, RouteAction};
use crate::ui::notify::{error_message, NotificationCenter, Severity};

/// Default page size for task list loads
const TASK_PAGE_SIZE: u32 = 50;

/// An action parked behind a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Quit,
    Logout,
    ResetDemo,
}

pub enum AppEvent {
    TasksLoaded(LoadResult<Vec<Task>>),
    UserLoaded(LoadResult<UserProfile>),
    AnalyticsLoaded(LoadResult<AnalyticsBundle>),
    Health(bool),
    Confirmed(PendingAction, ConfirmOutcome),
}

pub struct App {
    pub store: Arc<LocalStore>,
    pub api: ApiClient,
    pub data: DataManager,
    pub page: Page,
    pub notices: NotificationCenter,
    pub confirm: Option<ConfirmDialog>,
    pub login_input: String,
    pub tasks: Option<Arc<Vec<Task>>>,
    pub user: Option<Arc<UserProfile>>,
    pub analytics: Option<Arc<AnalyticsBundle>>,
    pub selected_task: usize,
    pub api_online: Option<bool>,
    /// Set when the rendered tasks are the seeded sample data rather
    /// than an API response
    pub demo_fallback: bool,
    pub loading: bool,
    pub should_quit: bool,
    session_rx: UnboundedReceiver<SessionEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    events_tx: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, data_dir: &Path) -> Result<Self> {
        let store = Arc::new(LocalStore::open(data_dir).context("Failed to open local store")?);
        demo::ensure_seeded(&store)?;

        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let api = ApiClient::new(config.api_base(), store.clone(), session_tx)?;
        let data = DataManager::new(api.clone());

        let page = if store.token().is_some() {
            Page::Dashboard
        } else {
            Page::Login
        };

        Ok(Self {
            store,
            api,
            data,
            page,
            notices: NotificationCenter::new(),
            confirm: None,
            login_input: String::new(),
            tasks: None,
            user: None,
            analytics: None,
            selected_task: 0,
            api_online: None,
            demo_fallback: false,
            loading: false,
            should_quit: false,
            session_rx,
            events_rx,
            events_tx,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.token().is_some()
    }

    /// The name shown in the title bar greeting.
    pub fn greeting_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.display().to_string())
            .or_else(|| self.store.username())
            .unwrap_or_else(|| "User".to_string())
    }

    // ===== Navigation =====

    pub fn navigate(&mut self, target: Page) {
        debug!(page = target.id(), "navigate");
        match resolve_route(target, self.is_logged_in()) {
            RouteAction::Stay => self.enter(target),
            RouteAction::RedirectToDashboard => self.enter(Page::Dashboard),
            RouteAction::RedirectToLogin => {
                self.notices
                    .show("Sign in to view that page.", Severity::Warning);
                self.enter(Page::Login);
            }
        }
    }

    /// Switch pages, showing whatever the manager already holds while a
    /// background refresh runs.
    fn enter(&mut self, page: Page) {
        self.page = page;
        match page {
            Page::Dashboard | Page::Tasks | Page::Calendar => {
                if self.tasks.is_none() {
                    self.tasks = self.data.cached_tasks();
                }
                self.spawn_tasks(false);
            }
            Page::Analytics => {
                if self.analytics.is_none() {
                    self.analytics = self.data.cached_analytics();
                }
                self.spawn_analytics();
            }
            Page::Profile => {
                if self.user.is_none() {
                    self.user = self.data.cached_user();
                }
                self.spawn_user(false);
            }
            _ => {}
        }
    }

    // ===== Login / logout =====

    pub fn submit_login(&mut self) {
        let token = self.login_input.trim().to_string();
        if token.is_empty() {
            self.notices
                .show("Paste an API token to sign in.", Severity::Warning);
            return;
        }
        if let Err(e) = self.store.set_token(&token) {
            warn!(error = %e, "Failed to persist token");
            self.notices
                .show("Could not save the token.", Severity::Error);
            return;
        }
        self.login_input.clear();
        self.notices.show("Signed in.", Severity::Success);
        self.spawn_user(true);
        self.navigate(Page::Dashboard);
    }

    fn logout(&mut self) {
        self.store.clear_token();
        if let Err(e) = self.store.remove(KEY_USERNAME) {
            warn!(error = %e, "Failed to remove stored username");
        }
        self.data.clear_cache();
        self.tasks = None;
        self.user = None;
        self.analytics = None;
        self.demo_fallback = false;
        self.page = Page::Login;
        self.notices.show("Signed out.", Severity::Logout);
    }

    // ===== Confirmations =====

    pub fn request(&mut self, action: PendingAction) {
        let (dialog, handle) = match action {
            PendingAction::Quit => {
                ConfirmDialog::new(ConfirmKind::Warning, "Quit", "Leave taskdeck?")
            }
            PendingAction::Logout => ConfirmDialog::new(
                ConfirmKind::Logout,
                "Sign out",
                "You will need to sign in again to see your tasks.",
            ),
            PendingAction::ResetDemo => ConfirmDialog::new(
                ConfirmKind::Danger,
                "Reset sample data",
                "This discards any changes to the seeded sample data.",
            ),
        };
        let dialog = match action {
            PendingAction::Logout => dialog.with_labels("Sign out", "Stay"),
            PendingAction::ResetDemo => dialog.with_labels("Reset", "Keep"),
            PendingAction::Quit => dialog,
        };

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = handle.outcome().await;
            let _ = tx.send(AppEvent::Confirmed(action, outcome));
        });
        self.confirm = Some(dialog);
    }

    /// Resolve the open dialog, if any. The decision comes back as an
    /// `AppEvent` from the waiter task.
    pub fn resolve_confirm(&mut self, outcome: ConfirmOutcome) {
        if let Some(dialog) = self.confirm.take() {
            dialog.resolve(outcome);
        }
    }

    // ===== Background loads =====

    pub fn refresh(&mut self, force: bool) {
        self.loading = true;
        self.notices.show("Refreshing...", Severity::Info);
        self.spawn_tasks(force);
        self.spawn_user(force);
        if self.page == Page::Analytics {
            self.spawn_analytics();
        }
    }

    fn spawn_tasks(&self, force: bool) {
        let data = self.data.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = data.load_tasks(force, 1, TASK_PAGE_SIZE).await;
            let _ = tx.send(AppEvent::TasksLoaded(result));
        });
    }

    fn spawn_user(&self, force: bool) {
        let data = self.data.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = data.load_user_info(force).await;
            let _ = tx.send(AppEvent::UserLoaded(result));
        });
    }

    fn spawn_analytics(&self) {
        let data = self.data.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = data.load_analytics().await;
            let _ = tx.send(AppEvent::AnalyticsLoaded(result));
        });
    }

    pub fn spawn_health_check(&self) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let ok = api.check_health().await;
            let _ = tx.send(AppEvent::Health(ok));
        });
    }

    // ===== Event pump =====

    /// Drain pending events; called once per frame.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.session_rx.try_recv() {
            match event {
                SessionEvent::TokenExpired => {
                    self.notices
                        .show("Session expired. Please sign in again.", Severity::Warning);
                    self.page = Page::Login;
                }
            }
        }

        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }

        self.notices.purge_expired();
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TasksLoaded(Ok(tasks)) => {
                self.tasks = Some(tasks);
                self.demo_fallback = false;
                self.loading = false;
                self.clamp_selection();
            }
            AppEvent::TasksLoaded(Err(e)) => {
                self.show_api_error(&e);
                // Fall back to the seeded sample data so the page is
                // still browsable offline
                self.tasks = Some(Arc::new(demo::tasks(&self.store)));
                self.demo_fallback = true;
                self.loading = false;
                self.clamp_selection();
            }
            AppEvent::UserLoaded(Ok(user)) => {
                if let Err(e) = self.store.set(KEY_USERNAME, user.username.clone()) {
                    warn!(error = %e, "Failed to persist username");
                }
                self.user = Some(user);
            }
            AppEvent::UserLoaded(Err(e)) => {
                self.show_api_error(&e);
                if self.user.is_none() {
                    self.user = Some(Arc::new(demo::user(&self.store)));
                }
            }
            AppEvent::AnalyticsLoaded(Ok(bundle)) => {
                self.analytics = Some(bundle);
            }
            AppEvent::AnalyticsLoaded(Err(e)) => {
                self.show_api_error(&e);
            }
            AppEvent::Health(ok) => {
                self.api_online = Some(ok);
                if ok {
                    self.notices.show("API is reachable.", Severity::Success);
                } else {
                    self.notices
                        .show("API is unreachable.", Severity::Warning);
                }
            }
            AppEvent::Confirmed(action, outcome) => {
                if outcome == ConfirmOutcome::Confirmed {
                    self.apply(action);
                }
            }
        }
    }

    fn apply(&mut self, action: PendingAction) {
        match action {
            PendingAction::Quit => self.should_quit = true,
            PendingAction::Logout => self.logout(),
            PendingAction::ResetDemo => match demo::reset(&self.store) {
                Ok(()) => {
                    if self.demo_fallback {
                        self.tasks = Some(Arc::new(demo::tasks(&self.store)));
                    }
                    self.notices.show("Sample data reset.", Severity::Success);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to reset sample data");
                    self.notices
                        .show("Could not reset sample data.", Severity::Danger);
                }
            },
        }
    }

    fn show_api_error(&mut self, err: &ApiError) {
        self.notices.show(error_message(err), Severity::Error);
    }

    // ===== Task list selection =====

    pub fn select_next_task(&mut self) {
        let len = self.task_count();
        if len > 0 {
            self.selected_task = (self.selected_task + 1).min(len - 1);
        }
    }

    pub fn select_prev_task(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    fn task_count(&self) -> usize {
        self.tasks.as_ref().map(|t| t.len()).unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let len = self.task_count();
        if len == 0 {
            self.selected_task = 0;
        } else {
            self.selected_task = self.selected_task.min(len - 1);
        }
    }
}
