//! The application store: state, reducers, and the middleware chain.

use crate::actions::Action;
use crate::calendar_sync::{self, CalendarSyncState};
use crate::deep_link::{self, DeepLinkState};
use crate::effects::Effect;
use crate::media::{self, MediaState};

/// Session-lifetime application state.
///
/// Single writer: all mutation flows through [`Store::dispatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub deep_link: DeepLinkState,
    pub calendar_sync: CalendarSyncState,
    pub media: MediaState,
}

/// Whether an intercepted action continues down the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Hand the action to the next middleware and finally the reducers.
    Forward,
    /// Drop the action. Effects already emitted still run.
    Swallow,
}

/// An action interceptor.
///
/// Middleware run synchronously, in registration order, before the
/// action reaches the reducers. They read state, emit effects, and
/// decide whether the action is forwarded.
pub trait Middleware: Send {
    fn handle(&mut self, state: &AppState, action: &Action, effects: &mut Vec<Effect>) -> Flow;
}

/// The application store.
#[derive(Default)]
pub struct Store {
    state: AppState,
    middleware: Vec<Box<dyn Middleware>>,
}

impl Store {
    pub fn new() -> Self {
        Store {
            state: AppState::default(),
            middleware: Vec::new(),
        }
    }

    /// Register an interceptor. Registration order is dispatch order.
    pub fn register(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run `action` through the middleware chain and, unless a
    /// middleware swallowed it, the reducers. Returns the side effects
    /// for the shell runtime to execute.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let mut effects = Vec::new();

        for middleware in &mut self.middleware {
            if middleware.handle(&self.state, &action, &mut effects) == Flow::Swallow {
                return effects;
            }
        }

        reduce(&mut self.state, &action);
        effects
    }
}

/// Apply a forwarded action to the state.
///
/// Every feature reducer sees every action and picks out its own.
fn reduce(state: &mut AppState, action: &Action) {
    deep_link::reduce(&mut state.deep_link, action);
    calendar_sync::reduce(&mut state.calendar_sync, action);
    media::reduce(&mut state.media, action);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Middleware that records the actions it saw, optionally
    /// swallowing everything.
    struct Probe {
        label: &'static str,
        swallow: bool,
        seen: std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl Middleware for Probe {
        fn handle(
            &mut self,
            _state: &AppState,
            _action: &Action,
            effects: &mut Vec<Effect>,
        ) -> Flow {
            self.seen.lock().unwrap().push(self.label);
            effects.push(Effect::CloseDialog);
            if self.swallow { Flow::Swallow } else { Flow::Forward }
        }
    }

    #[test]
    fn test_middleware_run_in_registration_order() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut store = Store::new();
        store.register(Box::new(Probe {
            label: "first",
            swallow: false,
            seen: seen.clone(),
        }));
        store.register(Box::new(Probe {
            label: "second",
            swallow: false,
            seen: seen.clone(),
        }));

        store.dispatch(Action::AppWillMount);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_swallowed_action_skips_rest_of_chain_and_reducers() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut store = Store::new();
        store.register(Box::new(Probe {
            label: "swallower",
            swallow: true,
            seen: seen.clone(),
        }));
        store.register(Box::new(Probe {
            label: "unreached",
            swallow: false,
            seen: seen.clone(),
        }));

        let effects = store.dispatch(Action::SetVideoMuted { muted: true });

        assert_eq!(*seen.lock().unwrap(), vec!["swallower"]);
        assert!(!store.state().media.video_muted, "Swallowed actions are not reduced");
        assert_eq!(effects.len(), 1, "Effects emitted before the swallow still run");
    }

    #[test]
    fn test_forwarded_action_reaches_reducers() {
        let mut store = Store::new();

        store.dispatch(Action::SetVideoMuted { muted: true });

        assert!(store.state().media.video_muted);
    }
}
