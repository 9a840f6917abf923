use crate::domain::{Todo, TodoId, UNKNOWN_USER, User};

/// Id handed to the first locally created task. Matches the size of the
/// canonical `/todos` fixture, so locally minted ids start past the loaded
/// range.
pub const FIRST_LOCAL_ID: i64 = 201;

/// In-memory mirror of the remote task list. Insertion order is the display
/// order; new tasks go to the front.
#[derive(Debug, Clone)]
pub struct AppState {
    todos: Vec<Todo>,
    users: Vec<User>,
    next_local_id: i64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::empty()
    }
}

impl AppState {
    pub fn empty() -> Self {
        Self {
            todos: Vec::new(),
            users: Vec::new(),
            next_local_id: FIRST_LOCAL_ID,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Resolve a user name, falling back to [`UNKNOWN_USER`]. Total: callers
    /// never branch on a missing user.
    pub fn user_name(&self, user_id: i64) -> &str {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.as_str())
            .unwrap_or(UNKNOWN_USER)
    }

    pub fn find_user_by_name(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name == name)
    }

    pub fn todo_index(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    /// Hand out the next placeholder id. Consumed ids are never reused, even
    /// when the create they were minted for fails.
    pub fn take_next_local_id(&mut self) -> TodoId {
        let id = TodoId(self.next_local_id);
        self.next_local_id += 1;
        id
    }

    /// Wholesale replacement after the initial load.
    pub fn replace(&mut self, todos: Vec<Todo>, users: Vec<User>) {
        self.todos = todos;
        self.users = users;
    }

    pub fn prepend_todo(&mut self, todo: Todo) {
        self.todos.insert(0, todo);
    }

    /// Flip `completed` in place. Returns the new value, `None` if the id is
    /// unknown.
    pub fn toggle_completed(&mut self, id: TodoId) -> Option<bool> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    /// Drop the task if present. The remote delete has already been
    /// confirmed by the time this runs.
    pub fn remove_todo(&mut self, id: TodoId) -> bool {
        match self.todo_index(id) {
            Some(i) => {
                self.todos.remove(i);
                true
            }
            None => false,
        }
    }
}
