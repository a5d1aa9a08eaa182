mod context;
mod editor;
mod events;
mod restart;
mod status_bar;
mod theme;
mod tools;
mod window;

use std::sync::Arc;

use crest_core::config;
use crest_core::dispatch::Dispatcher;

use context::AppContext;
use events::{AppEvent, WindowEvent};
use window::{MainWindow, Shutdown};

fn main() {
    env_logger::init();

    let (proxy, events) = events::channel();
    let dispatcher = Arc::new(Dispatcher::new(proxy.clone()));
    let ctx = AppContext::new(dispatcher, config::load());

    let mut window = MainWindow::new(ctx.clone());
    window.open_default_shell(proxy.clone());

    // Theme, tools and layout are restored once the loop is running, via
    // the dispatcher: submit wakes the loop, the drained callback posts
    // the restore event back onto it.
    let restore = proxy.clone();
    ctx.dispatcher.submit("restore-window-state", move || {
        restore.post(AppEvent::Window(WindowEvent::RestoreRequested));
    });

    match window.run(&events) {
        Shutdown::Exit => {}
        Shutdown::Restart => {
            let err = restart::replace_process();
            log::error!("restart failed: {}", err);
            std::process::exit(1);
        }
    }
}
