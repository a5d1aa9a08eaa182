use std::path::PathBuf;

/// One open document. `path` is `None` for an unsaved "untitled" buffer.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: Option<PathBuf>,
    pub modified: bool,
}

impl Document {
    pub fn title(&self) -> String {
        match &self.path {
            Some(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.to_string_lossy().to_string()),
            None => "<untitled>".to_string(),
        }
    }
}

/// The central editor area: a stack of open documents.
///
/// This is the collaborator that gates window close: `close_all` refuses
/// as soon as it reaches a document with unsaved changes.
#[derive(Default)]
pub struct EditorStack {
    docs: Vec<Document>,
}

impl EditorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, path: PathBuf) {
        self.docs.push(Document {
            path: Some(path),
            modified: false,
        });
    }

    pub fn open_untitled(&mut self) {
        self.docs.push(Document {
            path: None,
            modified: true,
        });
    }

    pub fn mark_modified(&mut self, index: usize) {
        if let Some(doc) = self.docs.get_mut(index) {
            doc.modified = true;
        }
    }

    pub fn mark_saved(&mut self, index: usize) {
        if let Some(doc) = self.docs.get_mut(index) {
            doc.modified = false;
        }
    }

    pub fn open_count(&self) -> usize {
        self.docs.len()
    }

    pub fn open_paths(&self) -> Vec<PathBuf> {
        self.docs.iter().filter_map(|d| d.path.clone()).collect()
    }

    /// Close every document, front to back. Stops and returns `false` at
    /// the first document with unsaved changes; that document and the ones
    /// after it stay open, and the caller must not proceed with shutdown.
    pub fn close_all(&mut self) -> bool {
        while let Some(doc) = self.docs.first() {
            if doc.modified {
                log::info!("refusing to close '{}': unsaved changes", doc.title());
                return false;
            }
            self.docs.remove(0);
        }
        true
    }
}
