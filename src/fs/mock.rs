// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { contents: Vec<u8>, mode: u32 },
    Dir { children: Vec<String>, mode: u32 },
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    // Paths (and everything below them) whose mutations fail with the kind.
    failures: HashMap<PathBuf, ErrorKind>,
}

/// In-memory filesystem with failure injection, for exercising the marker
/// store's error paths without touching the host.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create/remove at or below `path` fail with `kind`.
    pub fn fail_at(&self, path: impl AsRef<Path>, kind: ErrorKind) {
        let mut state = self.state.lock().unwrap();
        state.failures.insert(path.as_ref().to_path_buf(), kind);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            ensure_dirs(&mut state.entries, parent, 0o755);
        }
        insert_child(&mut state.entries, path);
        state.entries.insert(
            path.to_path_buf(),
            MockEntry::File {
                contents: content.into(),
                mode: 0o644,
            },
        );
    }

    /// Permission bits recorded when the entry was created.
    pub fn mode_of(&self, path: impl AsRef<Path>) -> Option<u32> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path.as_ref()) {
            Some(MockEntry::File { mode, .. }) | Some(MockEntry::Dir { mode, .. }) => Some(*mode),
            None => None,
        }
    }

    pub fn contents_of(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path.as_ref()) {
            Some(MockEntry::File { contents, .. }) => Some(contents.clone()),
            _ => None,
        }
    }
}

fn injected_failure(state: &MockState, path: &Path) -> Option<io::Error> {
    path.ancestors().find_map(|p| {
        state
            .failures
            .get(p)
            .map(|kind| io::Error::new(*kind, format!("injected failure at {:?}", p)))
    })
}

fn insert_child(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
    else {
        return;
    };
    if let Some(MockEntry::Dir { children, .. }) = entries.get_mut(parent) {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

fn ensure_dirs(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path, mode: u32) {
    let mut missing: Vec<&Path> = path
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .take_while(|p| !entries.contains_key(*p))
        .collect();
    missing.reverse();
    for dir in missing {
        entries.insert(
            dir.to_path_buf(),
            MockEntry::Dir {
                children: Vec::new(),
                mode,
            },
        );
        insert_child(entries, dir);
    }
}

impl FileSystem for MockFileSystem {
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = injected_failure(&state, path) {
            return Err(err);
        }
        for ancestor in path.ancestors() {
            if let Some(MockEntry::File { .. }) = state.entries.get(ancestor) {
                return Err(io::Error::new(
                    ErrorKind::NotADirectory,
                    format!("not a directory: {:?}", ancestor),
                ));
            }
        }
        ensure_dirs(&mut state.entries, path, mode);
        Ok(())
    }

    fn create_new(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = injected_failure(&state, path) {
            return Err(err);
        }
        if state.entries.contains_key(path) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("already exists: {:?}", path),
            ));
        }
        match path.parent().and_then(|p| state.entries.get(p)) {
            Some(MockEntry::Dir { .. }) => {}
            _ => {
                return Err(io::Error::new(
                    ErrorKind::NotFound,
                    format!("parent directory missing: {:?}", path),
                ));
            }
        }
        state.entries.insert(
            path.to_path_buf(),
            MockEntry::File {
                contents: contents.to_vec(),
                mode,
            },
        );
        insert_child(&mut state.entries, path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = injected_failure(&state, path) {
            return Err(err);
        }
        match state.entries.get(path) {
            Some(MockEntry::File { .. }) => {}
            Some(MockEntry::Dir { .. }) => {
                return Err(io::Error::new(
                    ErrorKind::IsADirectory,
                    format!("is a directory: {:?}", path),
                ));
            }
            None => {
                return Err(io::Error::new(
                    ErrorKind::NotFound,
                    format!("file not found: {:?}", path),
                ));
            }
        }
        state.entries.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir { children, .. }) = state.entries.get_mut(parent) {
                children.retain(|c| c.as_str() != name);
            }
        }
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.entries.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.entries.get(path), Some(MockEntry::Dir { .. }))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::Dir { children, .. }) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(io::Error::new(
                ErrorKind::NotFound,
                format!("Not a directory or not found: {:?}", path),
            )),
        }
    }
}
