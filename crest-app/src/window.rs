use crossbeam_channel::Receiver;

use crest_core::config::{self, DEFAULT_THEME};
use crest_core::shell::ShellMessage;

use crate::context::AppContext;
use crate::editor::EditorStack;
use crate::events::{AppEvent, EventProxy, ShellProxy, WindowEvent, WindowState};
use crate::status_bar::StatusBar;
use crate::theme;
use crate::tools::ToolManager;

const DEFAULT_POS: (i32, i32) = (40, 40);
const DEFAULT_SIZE: (i32, i32) = (1200, 800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// How the event loop ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Shutdown {
    Exit,
    /// Close completed and the user asked for a restart; the caller
    /// replaces the process image.
    Restart,
}

/// The main window: central editor stack, shell dock, status bar, and the
/// persistence of its own geometry and layout.
pub struct MainWindow {
    ctx: AppContext,
    geometry: WindowGeometry,
    state: WindowState,
    /// Opaque dock/toolbar arrangement, restored and persisted verbatim.
    layout: Vec<u8>,
    pub editors: EditorStack,
    tools: ToolManager,
    status_bar: Option<StatusBar>,
    did_close: bool,
}

impl MainWindow {
    /// Build the window from persisted state: position, size and maximized
    /// flag are applied here; theme, tools and layout wait for
    /// [`WindowEvent::RestoreRequested`], which bootstrap posts through the
    /// dispatcher once the loop is running.
    pub fn new(ctx: AppContext) -> Self {
        let (pos, size, maximized, show_status_bar) = {
            let s = ctx.state.borrow();
            (
                s.window_pos.unwrap_or(DEFAULT_POS),
                s.window_size.unwrap_or(DEFAULT_SIZE),
                s.window_maximized,
                s.show_status_bar,
            )
        };

        MainWindow {
            ctx,
            geometry: WindowGeometry {
                x: pos.0,
                y: pos.1,
                width: size.0,
                height: size.1,
            },
            state: if maximized {
                WindowState::Maximized
            } else {
                WindowState::Normal
            },
            layout: Vec::new(),
            editors: EditorStack::new(),
            tools: ToolManager::new(),
            status_bar: show_status_bar.then(StatusBar::new),
            did_close: false,
        }
    }

    /// Open the default shell panel. Its output arrives as deferred
    /// callbacks: the session's reader thread submits to the dispatcher,
    /// and the drained callback posts the shell event back to the loop.
    pub fn open_default_shell(&self, proxy: EventProxy) {
        let sender = ShellProxy::new(self.ctx.dispatcher.clone(), proxy);
        if let Err(e) = self.ctx.shells.open_shell(sender, 80, 24) {
            log::error!("could not open default shell: {}", e);
        }
    }

    /// Process events until close or restart. This thread is the UI
    /// thread: it is the only caller of `Dispatcher::drain`.
    pub fn run(&mut self, events: &Receiver<AppEvent>) -> Shutdown {
        for event in events.iter() {
            match event {
                AppEvent::Wake => {
                    self.ctx.dispatcher.drain();
                }
                AppEvent::Window(ev) => {
                    if let Some(shutdown) = self.handle_window_event(ev) {
                        return shutdown;
                    }
                }
                AppEvent::Shell { id, msg } => self.handle_shell_message(&id, msg),
                AppEvent::Quit => return Shutdown::Exit,
            }
        }
        Shutdown::Exit
    }

    pub fn handle_window_event(&mut self, event: WindowEvent) -> Option<Shutdown> {
        match event {
            WindowEvent::Moved { x, y } => {
                self.geometry.x = x;
                self.geometry.y = y;
            }
            WindowEvent::Resized { width, height } => {
                self.geometry.width = width;
                self.geometry.height = height;
            }
            WindowEvent::StateChanged { old, new } => {
                // Leaving a plain (non-maximized) state: that state held
                // the geometry the user actually chose, so persist it now.
                if old.has_user_geometry() {
                    let mut s = self.ctx.state.borrow_mut();
                    s.window_pos = Some((self.geometry.x, self.geometry.y));
                    s.window_size = Some((self.geometry.width, self.geometry.height));
                }
                self.state = new;
            }
            WindowEvent::RestoreRequested => self.restore_window_state(),
            WindowEvent::CloseRequested => {
                if self.close() {
                    return Some(Shutdown::Exit);
                }
            }
            WindowEvent::RestartRequested => {
                if self.close() {
                    return Some(Shutdown::Restart);
                }
                // Close was refused; no process replacement.
            }
        }
        None
    }

    fn handle_shell_message(&mut self, id: &str, msg: ShellMessage) {
        match msg {
            ShellMessage::Ready => {
                if let Some(bar) = &mut self.status_bar {
                    bar.set_message("shell ready");
                }
            }
            ShellMessage::Output { data } => {
                log::trace!("shell {}: {} bytes", id, data.len());
            }
            ShellMessage::Exited => {
                log::info!("shell {} exited", id);
                if let Some(bar) = &mut self.status_bar {
                    bar.set_message("shell exited");
                }
            }
        }
    }

    /// Restore theme, tool panels and dock layout from persisted state.
    pub fn restore_window_state(&mut self) {
        let preferred = self.ctx.state.borrow().theme.clone();
        if !theme::apply(&preferred) {
            // Unknown style: revert the preference rather than fail startup.
            log::warn!(
                "theme '{}' unavailable, reverting to '{}'",
                preferred,
                DEFAULT_THEME
            );
            self.ctx.state.borrow_mut().theme = DEFAULT_THEME.to_string();
            theme::apply(DEFAULT_THEME);
        }

        let tool_ids = self.ctx.state.borrow().loaded_tools.clone();
        for id in tool_ids {
            self.tools.load_tool(&id);
        }

        let encoded = self.ctx.state.borrow().window_layout.clone();
        if let Some(raw) = config::decode_layout(&encoded) {
            self.layout = raw;
        }

        if let Some(bar) = &mut self.status_bar {
            bar.set_message("ready");
        }
    }

    /// Merge window geometry, loaded tools and layout into persisted state.
    /// When maximized only the flag is written; the stored pos/size keep
    /// the last non-maximized values.
    pub fn save_window_state(&self) {
        let mut s = self.ctx.state.borrow_mut();
        if self.state == WindowState::Maximized {
            s.window_maximized = true;
        } else {
            s.window_maximized = false;
            s.window_pos = Some((self.geometry.x, self.geometry.y));
            s.window_size = Some((self.geometry.width, self.geometry.height));
        }
        s.loaded_tools = self.tools.loaded_ids();
        s.window_layout = config::encode_layout(&self.layout);
    }

    /// Gated close: persist state, then ask the editor stack to close
    /// everything. A refused close leaves the window open; an accepted one
    /// hard-terminates every shell session.
    fn close(&mut self) -> bool {
        self.save_window_state();
        config::save_to(&self.ctx.state.borrow(), &self.ctx.state_file);

        if !self.editors.close_all() {
            self.did_close = false;
            return false;
        }
        self.did_close = true;

        self.ctx.shells.terminate_all();
        true
    }

    pub fn did_close(&self) -> bool {
        self.did_close
    }

    #[cfg(test)]
    pub(crate) fn set_layout(&mut self, raw: Vec<u8>) {
        self.layout = raw;
    }

    #[cfg(test)]
    pub(crate) fn geometry(&self) -> WindowGeometry {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;
    use crest_core::config::State;
    use crest_core::dispatch::Dispatcher;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn window_with_state(state: State) -> (MainWindow, AppContext, tempfile::TempDir) {
        let (proxy, _rx) = events::channel();
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::with_state_file(
            Arc::new(Dispatcher::new(proxy)),
            state,
            dir.path().join("state.json"),
        );
        (MainWindow::new(ctx.clone()), ctx, dir)
    }

    #[test]
    fn bootstrap_applies_persisted_geometry() {
        let mut state = State::default();
        state.window_pos = Some((10, 20));
        state.window_size = Some((640, 480));
        let (window, _ctx, _dir) = window_with_state(state);
        assert_eq!(
            window.geometry(),
            WindowGeometry {
                x: 10,
                y: 20,
                width: 640,
                height: 480
            }
        );
        assert_eq!(window.state, WindowState::Normal);
    }

    #[test]
    fn bootstrap_honors_maximized_flag() {
        let mut state = State::default();
        state.window_maximized = true;
        let (window, _ctx, _dir) = window_with_state(state);
        assert_eq!(window.state, WindowState::Maximized);
    }

    #[test]
    fn leaving_normal_state_persists_geometry() {
        let (mut window, ctx, _dir) = window_with_state(State::default());
        window.handle_window_event(WindowEvent::Moved { x: 7, y: 9 });
        window.handle_window_event(WindowEvent::Resized {
            width: 900,
            height: 700,
        });
        window.handle_window_event(WindowEvent::StateChanged {
            old: WindowState::Normal,
            new: WindowState::Maximized,
        });
        let s = ctx.state.borrow();
        assert_eq!(s.window_pos, Some((7, 9)));
        assert_eq!(s.window_size, Some((900, 700)));
    }

    #[test]
    fn leaving_minimized_state_does_not_persist_geometry() {
        let (mut window, ctx, _dir) = window_with_state(State::default());
        window.handle_window_event(WindowEvent::Moved { x: 7, y: 9 });
        window.handle_window_event(WindowEvent::StateChanged {
            old: WindowState::Minimized,
            new: WindowState::Normal,
        });
        assert_eq!(ctx.state.borrow().window_pos, None);
    }

    #[test]
    fn save_while_maximized_keeps_stored_geometry() {
        let mut state = State::default();
        state.window_pos = Some((1, 2));
        state.window_size = Some((300, 200));
        let (mut window, ctx, _dir) = window_with_state(state);
        window.handle_window_event(WindowEvent::StateChanged {
            old: WindowState::Normal,
            new: WindowState::Maximized,
        });
        // Geometry now reflects the maximized frame; it must not clobber
        // the stored pos/size.
        window.handle_window_event(WindowEvent::Resized {
            width: 2560,
            height: 1440,
        });
        window.save_window_state();
        let s = ctx.state.borrow();
        assert!(s.window_maximized);
        assert_eq!(s.window_size, Some((300, 200)));
    }

    #[test]
    fn close_rejected_while_documents_are_modified() {
        let (mut window, _ctx, _dir) = window_with_state(State::default());
        window.editors.open_untitled();
        let shutdown = window.handle_window_event(WindowEvent::CloseRequested);
        assert_eq!(shutdown, None);
        assert!(!window.did_close());
        assert_eq!(window.editors.open_count(), 1);
    }

    #[test]
    fn clean_close_exits() {
        let (mut window, _ctx, _dir) = window_with_state(State::default());
        window.editors.open("/tmp/a.rs".into());
        let shutdown = window.handle_window_event(WindowEvent::CloseRequested);
        assert_eq!(shutdown, Some(Shutdown::Exit));
        assert!(window.did_close());
    }

    #[test]
    fn close_persists_state_to_disk() {
        let (mut window, ctx, _dir) = window_with_state(State::default());
        window.handle_window_event(WindowEvent::Moved { x: 11, y: 22 });
        window.handle_window_event(WindowEvent::CloseRequested);
        let saved = config::load_from(&ctx.state_file);
        assert_eq!(saved.window_pos, Some((11, 22)));
    }

    #[test]
    fn restart_refused_when_close_is_blocked() {
        let (mut window, _ctx, _dir) = window_with_state(State::default());
        window.editors.open_untitled();
        let shutdown = window.handle_window_event(WindowEvent::RestartRequested);
        assert_eq!(shutdown, None);
        assert!(!window.did_close());
    }

    #[test]
    fn restart_after_clean_close() {
        let (mut window, _ctx, _dir) = window_with_state(State::default());
        let shutdown = window.handle_window_event(WindowEvent::RestartRequested);
        assert_eq!(shutdown, Some(Shutdown::Restart));
        assert!(window.did_close());
    }

    #[test]
    fn restore_falls_back_to_default_theme() {
        let mut state = State::default();
        state.theme = "holographic".to_string();
        let (mut window, ctx, _dir) = window_with_state(state);
        window.restore_window_state();
        assert_eq!(ctx.state.borrow().theme, DEFAULT_THEME);
    }

    #[test]
    fn restore_loads_persisted_tools_and_layout() {
        let mut state = State::default();
        state.loaded_tools = vec!["workspace".into(), "logger".into(), "bogus".into()];
        state.window_layout = config::encode_layout(b"dock-blob");
        let (mut window, _ctx, _dir) = window_with_state(state);
        window.restore_window_state();
        assert_eq!(window.tools.loaded_ids(), vec!["workspace", "logger"]);
        assert_eq!(window.layout, b"dock-blob");
    }

    #[test]
    fn layout_round_trips_through_save() {
        let (mut window, ctx, _dir) = window_with_state(State::default());
        window.set_layout(b"arrangement-v2".to_vec());
        window.save_window_state();
        let encoded = ctx.state.borrow().window_layout.clone();
        assert_eq!(config::decode_layout(&encoded).unwrap(), b"arrangement-v2");
    }

    #[test]
    fn wake_event_drains_dispatcher_on_loop_thread() {
        let (proxy, rx) = events::channel();
        let ctx = AppContext::new(Arc::new(Dispatcher::new(proxy.clone())), State::default());
        let mut window = MainWindow::new(ctx.clone());

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        // Submitting queues a Wake; Quit then ends the loop after the drain.
        ctx.dispatcher.submit("flag", move || flag.store(true, Ordering::SeqCst));
        proxy.post(AppEvent::Quit);

        assert_eq!(window.run(&rx), Shutdown::Exit);
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(ctx.dispatcher.pending(), 0);
    }
}
