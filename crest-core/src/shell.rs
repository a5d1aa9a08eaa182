use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use parking_lot::Mutex;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use uuid::Uuid;

/// Trait for delivering shell output to the frontend.
/// Implement this for your UI framework's event channel; the frontend is
/// expected to hop onto the UI thread itself (Crest routes these through
/// the deferred-callback dispatcher).
pub trait ShellEventSender: Send + 'static {
    fn send(&self, id: &str, msg: ShellMessage);
}

/// Messages sent from a shell session to the frontend.
#[derive(Clone, Debug)]
pub enum ShellMessage {
    Ready,
    Output { data: Vec<u8> },
    Exited,
}

/// Get the user's login shell from /etc/passwd.
fn login_shell() -> Option<String> {
    let username = std::env::var("USER").ok()?;
    let passwd = std::fs::read_to_string("/etc/passwd").ok()?;
    for line in passwd.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() >= 7 && fields[0] == username {
            let shell = fields[6].to_string();
            if Path::new(&shell).exists() {
                return Some(shell);
            }
        }
    }
    None
}

/// Default shell path, preferring /etc/passwd over $SHELL.
pub fn default_shell_path() -> String {
    login_shell()
        .or_else(|| std::env::var("SHELL").ok())
        .unwrap_or_else(|| "/bin/bash".to_string())
}

/// Short name of the default shell (e.g. "zsh"), for the status bar.
pub fn default_shell_name() -> String {
    let path = default_shell_path();
    Path::new(&path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("shell")
        .to_string()
}

/// A single live shell session.
struct ShellSession {
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    master: Box<dyn MasterPty + Send>,
}

impl ShellSession {
    /// Kill the shell process and reap it. Does not wait for a graceful
    /// exit; this is the shutdown path.
    fn terminate_now(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// The set of shell panels hosted by the main window's shell dock.
pub struct ShellStack {
    sessions: Mutex<HashMap<String, ShellSession>>,
}

impl Default for ShellStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellStack {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Spawn the user's login shell in a new PTY and start forwarding its
    /// output through `sender`. Returns the new session id.
    pub fn open_shell(
        &self,
        sender: impl ShellEventSender,
        cols: u16,
        rows: u16,
    ) -> Result<String, String> {
        let id = Uuid::new_v4().to_string();

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| format!("Failed to open PTY: {}", e))?;

        let shell_path = default_shell_path();
        let mut cmd = CommandBuilder::new(&shell_path);
        cmd.env("TERM", "xterm-256color");
        cmd.env("TERM_PROGRAM", "Crest");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| format!("Failed to spawn {}: {}", shell_path, e))?;

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| format!("Failed to get PTY writer: {}", e))?;

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| format!("Failed to get PTY reader: {}", e))?;

        self.sessions.lock().insert(
            id.clone(),
            ShellSession {
                writer,
                child,
                master: pair.master,
            },
        );

        // The session is registered before Ready goes out, so a frontend
        // reacting to Ready can immediately write or resize by id.
        sender.send(&id, ShellMessage::Ready);

        let session_id = id.clone();
        std::thread::spawn(move || {
            let mut buf = [0u8; 8192];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => sender.send(
                        &session_id,
                        ShellMessage::Output {
                            data: buf[..n].to_vec(),
                        },
                    ),
                    Err(e) => {
                        log::warn!("shell {} reader error: {}", session_id, e);
                        break;
                    }
                }
            }
            sender.send(&session_id, ShellMessage::Exited);
        });

        Ok(id)
    }

    /// Write keyboard input to a session's stdin.
    pub fn write_to(&self, id: &str, data: &[u8]) -> Result<(), String> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| format!("Session not found: {}", id))?;
        session
            .writer
            .write_all(data)
            .and_then(|_| session.writer.flush())
            .map_err(|e| format!("Failed to write to shell: {}", e))
    }

    /// Resize a session's PTY.
    pub fn resize(&self, id: &str, cols: u16, rows: u16) -> Result<(), String> {
        let sessions = self.sessions.lock();
        let session = sessions
            .get(id)
            .ok_or_else(|| format!("Session not found: {}", id))?;
        session
            .master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| format!("Failed to resize shell: {}", e))
    }

    /// Hard-terminate one session and remove it.
    pub fn terminate_now(&self, id: &str) -> Result<(), String> {
        match self.sessions.lock().remove(id) {
            Some(mut session) => {
                session.terminate_now();
                Ok(())
            }
            None => Err(format!("Session not found: {}", id)),
        }
    }

    /// Hard-terminate every session. Called once the window close has been
    /// accepted; open documents are already gone by then.
    pub fn terminate_all(&self) {
        let mut sessions = self.sessions.lock();
        for (id, mut session) in sessions.drain() {
            log::debug!("terminating shell {}", id);
            session.terminate_now();
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

impl Drop for ShellStack {
    fn drop(&mut self) {
        self.terminate_all();
    }
}
