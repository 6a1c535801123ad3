use anyhow::Result;
use std::collections::HashSet;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::widgets::ListState;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::api::{ArticleSource, NewsApiService};
use crate::config::AppConfig;
use crate::internal::events::{DEFAULT_TITLE, SessionEvent, Subscription};
use crate::internal::favorites::{FavoritesStore, MAX_RATING, MIN_RATING};
use crate::internal::models::Article;
use crate::internal::session::SearchSession;
use crate::internal::storage::{FileStorage, MemoryStorage, SlotStorage};

/// Input modes for the UI.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Search,
}

/// Which list the cursor keys move in.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Display, EnumIter)]
pub enum Pane {
    Results,
    Favorites,
}

/// Terminal front end. Owns the session and translates keys into session calls.
pub struct App<S: ArticleSource = NewsApiService> {
    pub running: bool,
    pub app_version: String,
    pub session: SearchSession<S>,
    pub input_mode: InputMode,
    pub pane: Pane,
    pub results_state: ListState,
    pub favorites_state: ListState,
    /// Stars chosen in the detail view but not yet confirmed.
    pub pending_rating: u8,
    pub status_message: Option<String>,
    pub window_title: String,
    /// Panes folded down to their title bar.
    pub collapsed: HashSet<Pane>,
    events: Subscription,
}

impl App<NewsApiService> {
    #[tracing::instrument(skip(config))]
    pub fn new(config: &AppConfig) -> Self {
        let start = std::time::Instant::now();
        let source = NewsApiService::new(&config.api);

        let storage: Box<dyn SlotStorage> = match config.storage.resolve_directory() {
            Some(dir) => Box::new(FileStorage::new(dir)),
            None => {
                tracing::error!("Could not find config directory; favorites will not persist");
                Box::new(MemoryStorage::new())
            }
        };
        let favorites = FavoritesStore::load(storage, &config.storage.favorites_slot);

        let app = Self::with_session(SearchSession::new(source, config, favorites));
        tracing::info!(elapsed = ?start.elapsed(), "App initialized");
        app
    }
}

impl<S: ArticleSource> App<S> {
    pub fn with_session(mut session: SearchSession<S>) -> Self {
        let events = session.subscribe();
        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            session,
            input_mode: InputMode::Normal,
            pane: Pane::Results,
            results_state: ListState::default(),
            favorites_state: ListState::default(),
            pending_rating: 0,
            status_message: None,
            window_title: DEFAULT_TITLE.to_string(),
            collapsed: HashSet::new(),
            events,
        }
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));
        let mut applied_title = String::new();

        loop {
            self.drain_session_events();
            if applied_title != self.window_title {
                if let Err(e) = crate::tui::set_title(&self.window_title) {
                    tracing::debug!("Failed to set terminal title: {}", e);
                }
                applied_title = self.window_title.clone();
            }

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(completed) = self.session.next_completion() => {
                    self.session.handle_completed(completed);
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }

    /// React to events the session published since the last call.
    pub fn drain_session_events(&mut self) {
        while let Ok(event) = self.events.receiver.try_recv() {
            match event {
                SessionEvent::DocumentTitle(title) => self.window_title = title,
                SessionEvent::FocusSearch => self.input_mode = InputMode::Search,
                SessionEvent::SearchStatusChanged => {
                    self.results_state
                        .select(match self.session.results().articles().is_empty() {
                            true => None,
                            false => Some(0),
                        });
                }
                SessionEvent::FavoritesChanged { count } => {
                    clamp_selection(&mut self.favorites_state, count);
                }
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Search => self.handle_search_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
        self.drain_session_events();
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }
        match key.code {
            KeyCode::Char(c) => {
                let mut query = self.session.query().to_string();
                query.push(c);
                self.session.set_query(query);
            }
            KeyCode::Backspace => {
                let mut query = self.session.query().to_string();
                if query.pop().is_some() {
                    self.session.set_query(query);
                }
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) {
        self.status_message = None;
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Enter | KeyCode::Char('/') => self.session.activate_search(),
            KeyCode::Esc => {
                self.session.cancel();
                self.pending_rating = 0;
            }
            KeyCode::Tab => {
                self.pane = Pane::iter()
                    .cycle()
                    .skip_while(|p| *p != self.pane)
                    .nth(1)
                    .unwrap_or(Pane::Results);
            }
            KeyCode::Char('c') => self.toggle_collapsed(),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char(' ') => {
                if let Some(article) = self.highlighted_article() {
                    self.session.select(&article);
                    self.pending_rating = 0;
                }
            }
            KeyCode::Char(c @ '0'..='9') => self.choose_rating(c),
            KeyCode::Char('a') => self.add_selected_to_favorites(),
            KeyCode::Char('d') => self.delete_highlighted_favorite(),
            KeyCode::Char('o') => self.open_in_browser(),
            _ => {}
        }
    }

    pub fn is_collapsed(&self, pane: Pane) -> bool {
        self.collapsed.contains(&pane)
    }

    fn toggle_collapsed(&mut self) {
        if !self.collapsed.remove(&self.pane) {
            self.collapsed.insert(self.pane);
        }
    }

    fn list_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Results => self.session.results().articles().len(),
            Pane::Favorites => self.session.favorites().len(),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.list_len(self.pane);
        let state = match self.pane {
            Pane::Results => &mut self.results_state,
            Pane::Favorites => &mut self.favorites_state,
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        state.select(Some(next as usize));
    }

    /// Article under the cursor in the active pane.
    pub fn highlighted_article(&self) -> Option<Article> {
        match self.pane {
            Pane::Results => self
                .results_state
                .selected()
                .and_then(|i| self.session.results().articles().get(i))
                .cloned(),
            Pane::Favorites => self
                .favorites_state
                .selected()
                .and_then(|i| self.session.favorites().items().get(i))
                .map(|f| f.article.clone()),
        }
    }

    fn choose_rating(&mut self, c: char) {
        let Some(article) = self.session.selection().article() else {
            return;
        };
        if self.session.is_favorite(&article.title) {
            return;
        }
        if let Some(rating) = c.to_digit(10).and_then(|d| u8::try_from(d).ok())
            && (MIN_RATING..=MAX_RATING).contains(&rating)
        {
            self.pending_rating = rating;
        }
    }

    fn add_selected_to_favorites(&mut self) {
        let Some(article) = self.session.selection().article().cloned() else {
            return;
        };
        if self.pending_rating == 0 {
            self.status_message = Some("Choose a rating (1-5) first".to_string());
            return;
        }
        match self.session.add_favorite(&article, self.pending_rating) {
            Ok(()) => {
                self.status_message = Some(format!("Added \"{}\" to favorites", article.title));
                self.pending_rating = 0;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn delete_highlighted_favorite(&mut self) {
        if self.pane != Pane::Favorites {
            return;
        }
        if let Some(article) = self.highlighted_article() {
            self.session.remove_favorite(&article.title);
            self.status_message = Some(format!("Removed \"{}\"", article.title));
        }
    }

    fn open_in_browser(&mut self) {
        let article = self
            .session
            .selection()
            .article()
            .cloned()
            .or_else(|| self.highlighted_article());
        if let Some(url) = article.and_then(|a| a.url)
            && let Err(e) = open::that(&url)
        {
            tracing::error!("Failed to open {}: {}", url, e);
            self.status_message = Some("Could not open browser".to_string());
        }
    }
}

fn clamp_selection(state: &mut ListState, len: usize) {
    match (len, state.selected()) {
        (0, _) => state.select(None),
        (_, None) => state.select(Some(0)),
        (len, Some(i)) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}
