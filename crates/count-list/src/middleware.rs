use crate::actions::Action;
use crate::state::AppState;
use redux_connect::{Dispatcher, Middleware};
use std::cell::RefCell;
use std::rc::Rc;

/// Remembers the name of the last action for the status bar
pub struct LastActionMiddleware {
    last: Rc<RefCell<String>>,
}

impl LastActionMiddleware {
    pub fn new(last: Rc<RefCell<String>>) -> Self {
        Self { last }
    }
}

impl Middleware<AppState, Action> for LastActionMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, _dispatcher: &Dispatcher<Action>) -> bool {
        *self.last.borrow_mut() = action.as_ref().to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_variant_name() {
        let last = Rc::new(RefCell::new(String::new()));
        let mut middleware = LastActionMiddleware::new(Rc::clone(&last));

        assert!(middleware.handle(&Action::Random(7), &AppState::default(), &Dispatcher::new()));
        assert_eq!(*last.borrow(), "Random");
    }
}
