//! Application shell: owns the store and the connected views and maps keys
//! onto actions and own-prop changes

use crate::actions::Action;
use crate::middleware::LastActionMiddleware;
use crate::reducer;
use crate::state::AppState;
use crate::views::count_detail::{self, CountDetail};
use crate::views::count_list::{self, CountList};
use count_list_config::AppConfig;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Text;
use redux_connect::{ConnectedInstance, LoggingMiddleware, PropMap, Store, StoreApi};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub struct App {
    store: Store<AppState, Action>,
    count_list: ConnectedInstance<AppState, Action, CountList>,
    count_detail: ConnectedInstance<AppState, Action, CountDetail>,
    names: Vec<String>,
    name_index: usize,
    last_action: Rc<RefCell<String>>,
    error: Option<String>,
    running: bool,
}

fn name_props(name: &str) -> PropMap {
    let mut own = PropMap::new();
    own.insert("name".to_string(), Value::from(name));
    own
}

impl App {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store = Store::new(AppState::from_config(config), reducer::reduce);
        let last_action = Rc::new(RefCell::new(String::new()));

        // Add middleware in order (they execute in this order)
        store.add_middleware(Box::new(LoggingMiddleware::new()));
        store.add_middleware(Box::new(LastActionMiddleware::new(Rc::clone(&last_action))));

        let names = config.names.clone();
        let first_name = names.first().cloned().unwrap_or_default();
        let count_list = count_list::connected().create(store.clone(), name_props(&first_name))?;
        let count_detail = count_detail::connected().create(store.clone(), PropMap::new())?;

        Ok(Self {
            store,
            count_list,
            count_detail,
            names,
            name_index: 0,
            last_action,
            error: None,
            running: true,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let result = match key.code {
            KeyCode::Char('k') => self.count_list.invoke("up", &[]),
            KeyCode::Char('j') => self.count_detail.invoke("down", &[]),
            KeyCode::Char('r') => self.count_list.invoke("random", &[]),
            KeyCode::Char('n') => self.next_name(),
            KeyCode::Char('a') => self.alter_low(),
            KeyCode::Char('.') => self.store.dispatch(Action::Noop),
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                Ok(())
            }
            _ => return,
        };

        self.error = match result {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Key {:?} failed: {}", key.code, e);
                Some(e.to_string())
            }
        };
    }

    /// Cycle the greeting through the configured names
    fn next_name(&mut self) -> redux_connect::Result<()> {
        if self.names.is_empty() {
            return Ok(());
        }
        self.name_index = (self.name_index + 1) % self.names.len();
        let own = name_props(&self.names[self.name_index]);
        self.count_list.update_own_props(own)
    }

    /// Writing a connected property directly is always refused
    fn alter_low(&self) -> redux_connect::Result<()> {
        let low = self.state().low;
        self.count_list.try_set("low", Value::from(low + 10))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> Rc<AppState> {
        self.store.get_state()
    }

    pub fn count_list_text(&self) -> Text<'static> {
        self.count_list.render()
    }

    pub fn count_detail_text(&self) -> Text<'static> {
        self.count_detail.render()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn status_line(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        let last = self.last_action.borrow();
        if last.is_empty() {
            "Ready".to_string()
        } else {
            format!("Last action: {}", last)
        }
    }

    /// Changes whenever anything on screen would change
    pub fn frame_key(&self) -> (u64, u64, String) {
        (
            self.count_list.revision(),
            self.count_detail.revision(),
            self.status_line(),
        )
    }
}
