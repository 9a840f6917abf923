use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::ApiClient;
use crate::connectivity::ConnectivityProbe;
use crate::domain::{Todo, TodoDraft, TodoId};
use crate::reporter::ErrorReporter;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { todos: usize, users: usize },
    Failed { alert: Option<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Todo),
    EmptyTitle,
    UnknownUser,
    Failed { alert: Option<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled {
        id: TodoId,
        completed: bool,
    },
    /// The optimistic flip stands locally, the PATCH did not land.
    SyncFailed {
        id: TodoId,
        completed: bool,
        alert: Option<&'static str>,
    },
    Offline,
    NotFound(TodoId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(TodoId),
    Offline,
    Failed { alert: Option<&'static str> },
}

/// Drives every mutation of [`AppState`]. Cheap to clone, so interactive
/// surfaces can run flows on spawned tasks while the input stays live;
/// overlapping flows interleave freely, each one locking the state only for
/// its own brief mutation.
#[derive(Debug, Clone)]
pub struct SyncController {
    state: Arc<Mutex<AppState>>,
    api: ApiClient,
    probe: ConnectivityProbe,
    reporter: ErrorReporter,
}

impl SyncController {
    pub fn new(api: ApiClient, probe: ConnectivityProbe, reporter: ErrorReporter) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::empty())),
            api,
            probe,
            reporter,
        }
    }

    /// Copy of the current state for rendering. Render layers work off
    /// snapshots only; the live state never leaves this module.
    pub fn snapshot(&self) -> AppState {
        self.lock_state().clone()
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        // A panicked flow leaves the state consistent; take the lock anyway.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch tasks and users together. Either both land or the state stays
    /// empty; a single failure short-circuits the other fetch.
    pub async fn load_initial(&self) -> LoadOutcome {
        match tokio::try_join!(self.api.list_todos(), self.api.list_users()) {
            Ok((todos, users)) => {
                let outcome = LoadOutcome::Loaded {
                    todos: todos.len(),
                    users: users.len(),
                };
                self.lock_state().replace(todos, users);
                outcome
            }
            Err(err) => LoadOutcome::Failed {
                alert: self.reporter.report("load", &err),
            },
        }
    }

    /// Validate, POST, then prepend the server's echo. The placeholder id is
    /// consumed up front and never handed back, even when the POST fails.
    pub async fn create_todo(&self, user_name: &str, title: &str) -> CreateOutcome {
        let title = title.trim();
        if title.is_empty() {
            return CreateOutcome::EmptyTitle;
        }

        let draft = {
            let mut state = self.lock_state();
            let user_id = match state.find_user_by_name(user_name) {
                Some(user) => user.id,
                None => return CreateOutcome::UnknownUser,
            };
            TodoDraft {
                user_id,
                id: state.take_next_local_id(),
                title: title.to_string(),
                completed: false,
            }
        };

        match self.api.create_todo(&draft).await {
            Ok(created) => {
                self.lock_state().prepend_todo(created.clone());
                CreateOutcome::Created(created)
            }
            Err(err) => CreateOutcome::Failed {
                alert: self.reporter.report("create", &err),
            },
        }
    }

    /// Optimistic toggle: the local flip happens before the PATCH and is not
    /// rolled back when the PATCH fails. Unknown ids answer without touching
    /// the network; the offline gate runs only for known ids.
    pub async fn toggle_todo(&self, id: TodoId) -> ToggleOutcome {
        if self.lock_state().todo_index(id).is_none() {
            return ToggleOutcome::NotFound(id);
        }

        if !self.probe.is_online().await {
            self.reporter.warn_offline("toggle");
            return ToggleOutcome::Offline;
        }

        let completed = match self.lock_state().toggle_completed(id) {
            Some(completed) => completed,
            // A racing delete removed the task between the presence check
            // and the flip.
            None => return ToggleOutcome::NotFound(id),
        };

        match self.api.set_todo_completed(id, completed).await {
            Ok(()) => ToggleOutcome::Toggled { id, completed },
            Err(err) => ToggleOutcome::SyncFailed {
                id,
                completed,
                alert: self.reporter.report("toggle", &err),
            },
        }
    }

    /// Delete confirm-first: the DELETE goes out without a local presence
    /// check, and the task leaves the state only once the server confirms.
    pub async fn delete_todo(&self, id: TodoId) -> DeleteOutcome {
        if !self.probe.is_online().await {
            self.reporter.warn_offline("delete");
            return DeleteOutcome::Offline;
        }

        match self.api.delete_todo(id).await {
            Ok(()) => {
                self.lock_state().remove_todo(id);
                DeleteOutcome::Deleted(id)
            }
            Err(err) => DeleteOutcome::Failed {
                alert: self.reporter.report("delete", &err),
            },
        }
    }
}
