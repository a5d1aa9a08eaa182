use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crest_core::dispatch::{Dispatcher, MainThreadWaker};
use crest_core::shell::{ShellEventSender, ShellMessage};

/// Everything the UI thread reacts to. The receiving side of the channel is
/// the event loop; holding an [`EventProxy`] lets any thread post here.
pub enum AppEvent {
    /// Deferred callbacks are pending; drain the dispatcher.
    Wake,
    Window(WindowEvent),
    Shell { id: String, msg: ShellMessage },
    /// Unconditional loop exit.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowState {
    Normal,
    Active,
    Minimized,
    Maximized,
    FullScreen,
}

impl WindowState {
    /// True for the states whose geometry is worth persisting: a window
    /// leaving one of these carries the user's chosen position and size.
    pub fn has_user_geometry(self) -> bool {
        matches!(self, WindowState::Normal | WindowState::Active)
    }
}

#[derive(Debug)]
pub enum WindowEvent {
    Moved { x: i32, y: i32 },
    Resized { width: i32, height: i32 },
    StateChanged { old: WindowState, new: WindowState },
    /// Apply persisted theme, tools and layout; posted through the
    /// dispatcher right after bootstrap.
    RestoreRequested,
    CloseRequested,
    RestartRequested,
}

/// Cloneable sending half of the event loop. Doubles as the dispatcher's
/// waker, so submitted callbacks pull the loop out of its blocking
/// receive.
#[derive(Clone)]
pub struct EventProxy {
    tx: Sender<AppEvent>,
}

impl EventProxy {
    /// Best-effort post; a disconnected loop means shutdown is underway
    /// and the event no longer matters.
    pub fn post(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

impl MainThreadWaker for EventProxy {
    fn wake(&self) {
        let _ = self.tx.send(AppEvent::Wake);
    }
}

pub fn channel() -> (EventProxy, Receiver<AppEvent>) {
    let (tx, rx) = unbounded();
    (EventProxy { tx }, rx)
}

/// Sender handed to shell sessions. PTY reader threads never post to the
/// loop directly: each message becomes a deferred callback, so it reaches
/// the window through the dispatcher like any other cross-thread work
/// (submit wakes the loop, the drain posts the [`AppEvent::Shell`]).
#[derive(Clone)]
pub struct ShellProxy {
    dispatcher: Arc<Dispatcher>,
    proxy: EventProxy,
}

impl ShellProxy {
    pub fn new(dispatcher: Arc<Dispatcher>, proxy: EventProxy) -> Self {
        Self { dispatcher, proxy }
    }
}

impl ShellEventSender for ShellProxy {
    fn send(&self, id: &str, msg: ShellMessage) {
        let proxy = self.proxy.clone();
        let id = id.to_string();
        self.dispatcher.submit("shell-message", move || {
            proxy.post(AppEvent::Shell { id, msg });
        });
    }
}
