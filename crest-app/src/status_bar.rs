use crest_core::shell::default_shell_name;

/// Status line at the bottom of the window: the default shell's name plus
/// a transient message.
pub struct StatusBar {
    shell_name: String,
    message: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            shell_name: default_shell_name(),
            message: String::new(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn text(&self) -> String {
        if self.message.is_empty() {
            self.shell_name.clone()
        } else {
            format!("{} | {}", self.shell_name, self.message)
        }
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
