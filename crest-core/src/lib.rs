//! Toolkit-independent core of the Crest IDE shell: deferred-callback
//! dispatch onto the UI thread, persisted window state, and PTY shell
//! sessions.

pub mod config;
pub mod dispatch;
pub mod shell;
