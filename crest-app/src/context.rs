use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crest_core::config::{self, State};
use crest_core::dispatch::Dispatcher;
use crest_core::shell::ShellStack;

/// Shared application state, constructed once in `main` and cloned into
/// every component that needs it.
///
/// The dispatcher and shell stack are thread-shared (`Arc`); the persisted
/// state is only ever touched on the UI thread, so `Rc<RefCell>` suffices.
#[derive(Clone)]
pub struct AppContext {
    pub dispatcher: Arc<Dispatcher>,
    pub state: Rc<RefCell<State>>,
    pub state_file: Rc<PathBuf>,
    pub shells: Arc<ShellStack>,
}

impl AppContext {
    pub fn new(dispatcher: Arc<Dispatcher>, state: State) -> Self {
        Self::with_state_file(dispatcher, state, config::default_state_path())
    }

    pub fn with_state_file(dispatcher: Arc<Dispatcher>, state: State, state_file: PathBuf) -> Self {
        Self {
            dispatcher,
            state: Rc::new(RefCell::new(state)),
            state_file: Rc::new(state_file),
            shells: Arc::new(ShellStack::new()),
        }
    }
}
