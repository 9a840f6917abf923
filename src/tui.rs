use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{event, execute};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc;

use crate::cli::ExitError;
use crate::domain::{Todo, TodoId};
use crate::state::AppState;
use crate::sync::{CreateOutcome, DeleteOutcome, LoadOutcome, SyncController, ToggleOutcome};

pub async fn cmd_tui(controller: SyncController) -> Result<(), ExitError> {
    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| ExitError::new(2, format!("{e}")))?;
    execute!(stdout, EnterAlternateScreen).map_err(|e| ExitError::new(2, format!("{e}")))?;

    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| ExitError::new(2, format!("{e}")))?;

    let mut app = App::new(controller);
    app.spawn_load();
    // The loop itself is synchronous; spawned flows need the other runtime
    // workers to keep running underneath it.
    tokio::task::block_in_place(|| run_loop(&mut terminal, &mut app));

    // Restore terminal.
    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();

    Ok(())
}

fn run_loop(terminal: &mut Terminal<ratatui::backend::CrosstermBackend<Stdout>>, app: &mut App) {
    loop {
        app.drain_events();
        let snapshot = app.snapshot();
        app.clamp_selection(snapshot.todos().len());

        terminal.draw(|f| ui(f, app, &snapshot)).ok();

        if !event::poll(Duration::from_millis(200)).unwrap_or(false) {
            continue;
        }

        let Ok(Event::Key(key)) = event::read() else {
            continue;
        };
        if app.handle_key(key, &snapshot) {
            return;
        }
    }
}

fn ui(f: &mut Frame, app: &mut App, snapshot: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(format!("td {} · to-do list", crate::version::VERSION))
        .block(Block::default().borders(Borders::ALL).title("Overview"));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = snapshot
        .todos()
        .iter()
        .map(|todo| {
            let (line, completed) = task_row(todo, snapshot);
            let style = if completed {
                Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(line, style)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Tasks ({})", snapshot.todos().len())),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol(">");
    f.render_stateful_widget(list, chunks[1], &mut app.list_state);

    let form_focused = matches!(app.focus, Focus::Form);
    let cursor = if form_focused { "_" } else { "" };
    let form = Paragraph::new(format!(
        "user: {}  ·  task: {}{cursor}",
        app.selected_user_label(),
        app.title_input
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("New task")
            .border_style(if form_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(form, chunks[2]);

    let status = Paragraph::new(app.status.clone())
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[3]);

    let help = Paragraph::new(
        "j/k: select · Space/Enter: toggle · d: delete · Tab: to form / cycle user · Enter (form): add · Esc/q: quit",
    )
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, chunks[4]);
}

/// One task as it appears in the list. Styling is the caller's business, so
/// the completed flag rides along with the text.
fn task_row(todo: &Todo, state: &AppState) -> (String, bool) {
    let marker = if todo.completed { "[x]" } else { "[ ]" };
    (
        format!(
            "{marker} {} by {}",
            todo.title,
            state.user_name(todo.user_id)
        ),
        todo.completed,
    )
}

enum UiEvent {
    Loaded(LoadOutcome),
    Created(CreateOutcome),
    Toggled(ToggleOutcome),
    Deleted(DeleteOutcome),
}

enum Focus {
    Tasks,
    Form,
}

struct App {
    controller: SyncController,
    events_tx: mpsc::UnboundedSender<UiEvent>,
    events_rx: mpsc::UnboundedReceiver<UiEvent>,
    list_state: ListState,
    selected: usize,
    focus: Focus,
    user_names: Vec<String>,
    user_idx: usize,
    title_input: String,
    status: String,
}

impl App {
    fn new(controller: SyncController) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            controller,
            events_tx,
            events_rx,
            list_state: ListState::default(),
            selected: 0,
            focus: Focus::Tasks,
            user_names: Vec::new(),
            user_idx: 0,
            title_input: String::new(),
            status: "loading tasks...".to_string(),
        };
        app.list_state.select(Some(0));
        app
    }

    fn snapshot(&self) -> AppState {
        self.controller.snapshot()
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Loaded(outcome) => match outcome {
                LoadOutcome::Loaded { todos, users } => {
                    // Filled once per session; later server-side user changes
                    // are not picked up.
                    self.user_names = self
                        .snapshot()
                        .users()
                        .iter()
                        .map(|u| u.name.clone())
                        .collect();
                    self.status = format!("{todos} tasks, {users} users");
                }
                LoadOutcome::Failed { alert } => {
                    self.status = alert.unwrap_or("could not load tasks").to_string();
                }
            },
            UiEvent::Created(outcome) => match outcome {
                CreateOutcome::Created(todo) => {
                    self.title_input.clear();
                    self.status = format!("added task {}", todo.id);
                }
                CreateOutcome::EmptyTitle => {
                    self.status = "Please enter the task text.".to_string();
                }
                CreateOutcome::UnknownUser => {
                    self.status =
                        "Selected user not found. Please pick a valid user.".to_string();
                }
                CreateOutcome::Failed { alert } => {
                    self.status = alert.unwrap_or("could not create the task").to_string();
                }
            },
            UiEvent::Toggled(outcome) => match outcome {
                ToggleOutcome::Toggled { id, completed } => {
                    self.status = format!(
                        "task {id} is now {}",
                        if completed { "done" } else { "open" }
                    );
                }
                ToggleOutcome::SyncFailed { alert, .. } => {
                    self.status = alert.unwrap_or("status change not synced").to_string();
                }
                ToggleOutcome::Offline => {
                    self.status =
                        "No internet connection. Cannot change the task status.".to_string();
                }
                ToggleOutcome::NotFound(id) => {
                    self.status = format!("task {id} not found");
                }
            },
            UiEvent::Deleted(outcome) => match outcome {
                DeleteOutcome::Deleted(id) => {
                    self.status = format!("deleted task {id}");
                }
                DeleteOutcome::Offline => {
                    self.status = "No internet connection. Cannot delete the task.".to_string();
                }
                DeleteOutcome::Failed { alert } => {
                    self.status = alert.unwrap_or("could not delete the task").to_string();
                }
            },
        }
    }

    fn handle_key(&mut self, key: KeyEvent, snapshot: &AppState) -> bool {
        match self.focus {
            Focus::Tasks => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Down | KeyCode::Char('j') => self.select_next(snapshot.todos().len()),
                KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(todo) = snapshot.todos().get(self.selected) {
                        self.spawn_toggle(todo.id);
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(todo) = snapshot.todos().get(self.selected) {
                        self.spawn_delete(todo.id);
                    }
                }
                KeyCode::Tab => self.focus = Focus::Form,
                _ => {}
            },
            Focus::Form => match key.code {
                KeyCode::Esc => self.focus = Focus::Tasks,
                KeyCode::Tab => self.cycle_user(),
                KeyCode::Enter => self.spawn_create(),
                KeyCode::Backspace => {
                    self.title_input.pop();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return true;
                }
                KeyCode::Char(c) => {
                    if !key.modifiers.contains(KeyModifiers::CONTROL) {
                        self.title_input.push(c);
                    }
                }
                _ => {}
            },
        }
        self.list_state.select(Some(self.selected));
        false
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        if self.selected == 0 {
            return;
        }
        self.selected -= 1;
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.list_state.select(Some(self.selected));
    }

    fn cycle_user(&mut self) {
        if self.user_names.is_empty() {
            return;
        }
        self.user_idx = (self.user_idx + 1) % self.user_names.len();
    }

    fn selected_user_label(&self) -> &str {
        self.user_names
            .get(self.user_idx)
            .map(String::as_str)
            .unwrap_or("-")
    }

    fn selected_user_name(&self) -> String {
        self.user_names
            .get(self.user_idx)
            .cloned()
            .unwrap_or_default()
    }

    fn spawn_load(&self) {
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiEvent::Loaded(controller.load_initial().await));
        });
    }

    fn spawn_create(&self) {
        let user = self.selected_user_name();
        let title = self.title_input.clone();
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiEvent::Created(controller.create_todo(&user, &title).await));
        });
    }

    fn spawn_toggle(&self, id: TodoId) {
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiEvent::Toggled(controller.toggle_todo(id).await));
        });
    }

    fn spawn_delete(&self, id: TodoId) {
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiEvent::Deleted(controller.delete_todo(id).await));
        });
    }
}
