//! Middleware for the reference store
//!
//! Middleware sits between action dispatch and reducer execution:
//!
//! ```text
//! Action → Middleware Chain → Reducer → Listeners
//! ```
//!
//! Each middleware can inspect the action and the current state, queue
//! follow-up actions through the [`Dispatcher`], or consume the action so
//! it never reaches the reducer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::rc::Rc;

/// Middleware trait - intercepts actions before they reach the reducer
pub trait Middleware<S, A> {
    /// Handle an action
    ///
    /// - `action`: The action to process
    /// - `state`: Current state (read-only snapshot)
    /// - `dispatcher`: Use to queue actions that should re-enter the chain
    ///
    /// Returns `true` to continue chain, `false` to consume action
    fn handle(&mut self, action: &A, state: &S, dispatcher: &Dispatcher<A>) -> bool;
}

/// Queue for actions dispatched by middleware
///
/// Queued actions re-enter the middleware chain from the beginning once the
/// current dispatch has reduced and notified its listeners.
pub struct Dispatcher<A> {
    queue: Rc<RefCell<VecDeque<A>>>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<A> Dispatcher<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action to be processed through the middleware chain
    pub fn dispatch(&self, action: A) {
        self.queue.borrow_mut().push_back(action);
    }

    /// Take the next pending action, if any
    pub(crate) fn next_pending(&self) -> Option<A> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// LoggingMiddleware - logs all actions passing through
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S, A: Debug> Middleware<S, A> for LoggingMiddleware {
    fn handle(&mut self, action: &A, _state: &S, _dispatcher: &Dispatcher<A>) -> bool {
        log::debug!("Action: {:?}", action);
        true
    }
}
