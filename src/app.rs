// App state and main event loop.
// Dispatches key presses to the cached store one interaction at a time and
// re-renders after each; every store call completes before the next frame.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::widgets::ListState;

use crate::cache::CachedStore;
use crate::error::{Result, TidoError};
use crate::stats::Stats;
use crate::store::TodoStore;
use crate::todo::{Priority, TodoItem, TodoPatch};
use crate::ui;

/// Input state for the add/edit form.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub task: String,
    pub priority: Priority,
    pub completed: bool,
}

impl TaskForm {
    fn blank() -> Self {
        Self {
            task: String::new(),
            priority: Priority::default(),
            completed: false,
        }
    }

    fn from_item(item: &TodoItem) -> Self {
        Self {
            task: item.task.clone(),
            priority: item.priority,
            completed: item.completed(),
        }
    }
}

/// What the keyboard currently drives.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Adding(TaskForm),
    Editing { id: String, form: TaskForm },
    ConfirmDelete { id: String, task: String },
}

/// One-line feedback shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub message: String,
    pub is_error: bool,
}

/// Main application state.
pub struct App<S: TodoStore> {
    store: CachedStore<S>,
    /// Current list, sorted by priority score descending (stable).
    pub todos: Vec<TodoItem>,
    /// Records the backend skipped during the last list.
    pub skipped: usize,
    pub stats: Stats,
    pub list_state: ListState,
    pub mode: Mode,
    pub status: Option<StatusLine>,
    pub should_quit: bool,
}

impl<S: TodoStore> App<S> {
    pub fn new(store: CachedStore<S>) -> Self {
        Self {
            store,
            todos: Vec::new(),
            skipped: 0,
            stats: Stats::default(),
            list_state: ListState::default(),
            mode: Mode::Normal,
            status: None,
            should_quit: false,
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        self.reload().await;
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events().await?;
        }
        Ok(())
    }

    async fn handle_events(&mut self) -> Result<()> {
        if !event::poll(Duration::from_millis(100))? {
            return Ok(());
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match self.mode.clone() {
                    Mode::Normal => self.handle_normal_key(key.code).await,
                    Mode::Adding(form) => self.handle_form_key(key.code, None, form).await,
                    Mode::Editing { id, form } => {
                        self.handle_form_key(key.code, Some(id), form).await
                    }
                    Mode::ConfirmDelete { id, .. } => self.handle_confirm_key(key.code, id).await,
                }
            }
        }
        Ok(())
    }

    async fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('a') => {
                self.status = None;
                self.mode = Mode::Adding(TaskForm::blank());
            }
            KeyCode::Char('e') => {
                if let Some(item) = self.selected_item() {
                    let id = item.id.clone();
                    let form = TaskForm::from_item(item);
                    self.status = None;
                    self.mode = Mode::Editing { id, form };
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected().await,
            KeyCode::Char('d') => {
                if let Some(item) = self.selected_item() {
                    let id = item.id.clone();
                    let task = item.task.clone();
                    self.mode = Mode::ConfirmDelete { id, task };
                }
            }
            KeyCode::Char('r') => {
                self.store.invalidate();
                self.reload().await;
                if self.status.is_none() {
                    self.info("Refreshed");
                }
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, code: KeyCode, editing_id: Option<String>, mut form: TaskForm) {
        match code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                match editing_id {
                    None => self.submit_add(form).await,
                    Some(id) => self.submit_edit(id, form).await,
                }
            }
            KeyCode::Left => {
                form.priority = form.priority.prev();
                self.keep_form(editing_id, form);
            }
            KeyCode::Right => {
                form.priority = form.priority.next();
                self.keep_form(editing_id, form);
            }
            KeyCode::Tab => {
                form.completed = !form.completed;
                self.keep_form(editing_id, form);
            }
            KeyCode::Backspace => {
                form.task.pop();
                self.keep_form(editing_id, form);
            }
            KeyCode::Char(c) => {
                form.task.push(c);
                self.keep_form(editing_id, form);
            }
            _ => self.keep_form(editing_id, form),
        }
    }

    fn keep_form(&mut self, editing_id: Option<String>, form: TaskForm) {
        self.mode = match editing_id {
            None => Mode::Adding(form),
            Some(id) => Mode::Editing { id, form },
        };
    }

    async fn handle_confirm_key(&mut self, code: KeyCode, id: String) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.mode = Mode::Normal;
                match self.store.delete(&id).await {
                    Ok(()) => {
                        self.info("Task deleted");
                        self.reload().await;
                    }
                    Err(err) => self.error(err),
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
    }

    async fn submit_add(&mut self, form: TaskForm) {
        match self.store.create(&form.task, Some(form.priority)).await {
            Ok(_) => {
                self.info("Task added");
                self.reload().await;
            }
            Err(err) => self.error(err),
        }
    }

    async fn submit_edit(&mut self, id: String, form: TaskForm) {
        let patch = TodoPatch::default()
            .task(form.task)
            .priority(form.priority)
            .completed(form.completed);
        match self.store.update(&id, &patch).await {
            Ok(_) => {
                self.info("Task updated");
                self.reload().await;
            }
            Err(err) => self.error(err),
        }
    }

    async fn toggle_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let id = item.id.clone();
        let patch = TodoPatch::default().completed(!item.completed());
        match self.store.update(&id, &patch).await {
            Ok(_) => self.reload().await,
            Err(err) => self.error(err),
        }
    }

    /// Re-list through the cache and rebuild the derived view state.
    async fn reload(&mut self) {
        match self.store.list().await {
            Ok(outcome) => {
                self.todos = outcome.items;
                self.skipped = outcome.skipped;
                // Highest priority first; stable, so store order breaks ties.
                self.todos
                    .sort_by_key(|item| std::cmp::Reverse(item.priority.score()));
                self.stats = Stats::collect(&self.todos);
                self.clamp_selection();
            }
            Err(err) => self.error(err),
        }
    }

    pub fn selected_item(&self) -> Option<&TodoItem> {
        self.todos.get(self.list_state.selected()?)
    }

    fn clamp_selection(&mut self) {
        if self.todos.is_empty() {
            self.list_state.select(None);
        } else {
            let index = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(index.min(self.todos.len() - 1)));
        }
    }

    fn select_next(&mut self) {
        if self.todos.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.todos.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.todos.is_empty() {
            return;
        }
        let previous = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(previous));
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            is_error: false,
        });
    }

    fn error(&mut self, err: TidoError) {
        tracing::error!(%err, "operation failed");
        let message = match &err {
            TidoError::StoreUnavailable(_) => format!("{} (press r to retry)", err),
            _ => err.to_string(),
        };
        self.status = Some(StatusLine {
            message,
            is_error: true,
        });
    }
}
