//! Archive Session
//!
//! Wraps a staged container for one build attempt. Files are named inside the
//! archive by their path relative to the project root. The session is
//! consumed by `commit`, so nothing can be added to a committed archive.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::Bundle;
use crate::domain::ports::{BuildEvent, BuildEventSink, StagedContainer};
use crate::error::{PharpackError, PharpackResult};

pub struct ArchiveSession<C: StagedContainer> {
    container: C,
    root: PathBuf,
    sink: Arc<dyn BuildEventSink>,
    detailed: bool,
}

impl<C: StagedContainer> ArchiveSession<C> {
    pub fn new(container: C, root: impl Into<PathBuf>, sink: Arc<dyn BuildEventSink>) -> Self {
        let detailed = sink.wants_detailed_events();
        Self {
            container,
            root: root.into(),
            sink,
            detailed,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `/`-separated path of `path` relative to the project root
    pub fn local_path(&self, path: &Path) -> PharpackResult<String> {
        let outside = || PharpackError::PathOutsideProject {
            path: path.to_path_buf(),
            root: self.root.clone(),
        };

        let relative = path.strip_prefix(&self.root).map_err(|_| outside())?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => match part.to_str() {
                    Some(part) => parts.push(part),
                    None => {
                        return Err(PharpackError::invalid_input(
                            path,
                            "file name is not valid UTF-8 and cannot be stored in the archive",
                        ))
                    }
                },
                Component::CurDir => {}
                _ => return Err(outside()),
            }
        }
        if parts.is_empty() {
            return Err(outside());
        }
        Ok(parts.join("/"))
    }

    /// Add a file from disk under its project-relative path
    pub fn add_file(&mut self, path: &Path) -> PharpackResult<()> {
        let local = self.local_path(path)?;
        self.container.add_file(&local, path)?;
        self.file_added(local);
        Ok(())
    }

    /// Add every file yielded by `files`; returns how many were added
    pub fn build_from_iter<I>(&mut self, files: I) -> PharpackResult<usize>
    where
        I: IntoIterator<Item = PharpackResult<PathBuf>>,
    {
        let mut count = 0;
        for file in files {
            self.add_file(&file?)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn add_bundle(&mut self, bundle: &Bundle) -> PharpackResult<usize> {
        self.build_from_iter(bundle.files())
    }

    /// Add synthetic content under `local`, replacing any earlier entry
    pub fn add_from_string(&mut self, local: &str, contents: impl Into<Vec<u8>>) -> PharpackResult<()> {
        self.container.add_from_string(local, contents.into())?;
        self.file_added(local.to_string());
        Ok(())
    }

    pub fn default_stub(&self, entry_point: &str) -> String {
        self.container.default_stub(entry_point)
    }

    pub fn set_stub(&mut self, stub: String) {
        self.container.set_stub(stub);
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Flush the archive to its staging file; returns the size in bytes
    pub fn commit(self) -> PharpackResult<u64> {
        self.container.commit()
    }

    fn file_added(&self, local: String) {
        if self.detailed {
            self.sink.on_event(BuildEvent::FileAdded { local });
        }
    }
}
