//! Bundle entity - the files of one package selected for the archive
//!
//! A bundle is a list of members: single files, or file trees enumerated
//! lazily from disk. Trees hold their selection rules rather than a file list,
//! so every call to [`FileTree::files`] starts a fresh walk and large vendor
//! trees are never materialized in memory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::{DirEntry, Walk, WalkBuilder};

use crate::error::{PharpackError, PharpackResult};

/// Version control metadata directories that never end up in an archive
const VCS_DIRS: &[&str] = &[
    ".git",
    ".svn",
    "_svn",
    ".hg",
    "CVS",
    "_darcs",
    ".arch-params",
    ".monotone",
    ".bzr",
];

/// One selection rule, matched against paths relative to the tree root
#[derive(Debug, Clone, PartialEq, Eq)]
enum Exclusion {
    /// Prune a directory
    Dir(PathBuf),
    /// Skip a single file
    File(PathBuf),
    /// Skip `<dir>/<prefix>*.phar` staging leftovers of an earlier build
    Staging { dir: PathBuf, prefix: String },
}

impl Exclusion {
    fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        match self {
            Self::Dir(dir) => is_dir && relative == dir,
            Self::File(file) => !is_dir && relative == file,
            Self::Staging { dir, prefix } => {
                if is_dir || relative.parent() != Some(dir.as_path()) {
                    return false;
                }
                relative
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.len() > prefix.len() && n.starts_with(prefix.as_str()) && n.ends_with(".phar"))
                    .unwrap_or(false)
            }
        }
    }
}

/// A restartable, lazily walked set of files below one directory
#[derive(Debug, Clone)]
pub struct FileTree {
    root: PathBuf,
    exclusions: Vec<Exclusion>,
    include_hidden: bool,
}

impl FileTree {
    /// All regular files below `root`, minus hidden entries and VCS metadata
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclusions: Vec::new(),
            include_hidden: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Prune a directory, given relative to the root
    pub fn exclude_dir(mut self, relative: impl AsRef<Path>) -> Self {
        let relative = normalize_relative(relative.as_ref());
        if !relative.as_os_str().is_empty() {
            self.exclusions.push(Exclusion::Dir(relative));
        }
        self
    }

    /// Skip a single file, given relative to the root
    pub fn exclude_file(mut self, relative: impl AsRef<Path>) -> Self {
        let relative = normalize_relative(relative.as_ref());
        if !relative.as_os_str().is_empty() {
            self.exclusions.push(Exclusion::File(relative));
        }
        self
    }

    /// Skip staging files `<file_name>.<anything>.phar` in `relative_dir`
    pub fn exclude_staging(mut self, relative_dir: impl AsRef<Path>, file_name: &str) -> Self {
        self.exclusions.push(Exclusion::Staging {
            dir: normalize_relative(relative_dir.as_ref()),
            prefix: format!("{}.", file_name),
        });
        self
    }

    /// Also walk hidden (dot) files and directories; VCS metadata stays excluded
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Start a new walk over the tree, in file-name order
    pub fn files(&self) -> FileTreeIter {
        let root = self.root.clone();
        let exclusions = Arc::new(self.exclusions.clone());

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(!self.include_hidden)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| keep_entry(entry, &root, &exclusions));

        FileTreeIter {
            walk: builder.build(),
        }
    }

    /// Whether `path` is one of the files this tree yields
    pub fn contains(&self, path: &Path) -> bool {
        self.files()
            .filter_map(Result::ok)
            .any(|file| file == path)
    }
}

fn keep_entry(entry: &DirEntry, root: &Path, exclusions: &[Exclusion]) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
    if is_dir {
        let name = entry.file_name().to_string_lossy();
        if VCS_DIRS.contains(&name.as_ref()) {
            return false;
        }
    }

    match entry.path().strip_prefix(root) {
        Ok(relative) => !exclusions.iter().any(|e| e.matches(relative, is_dir)),
        Err(_) => true,
    }
}

fn normalize_relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

/// Iterator over the files of a [`FileTree`]
pub struct FileTreeIter {
    walk: Walk,
}

impl Iterator for FileTreeIter {
    type Item = PharpackResult<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let io = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Some(Err(PharpackError::Io(io)));
                }
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            // Symlinks count as files when they point at one.
            if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

/// A member of a bundle
#[derive(Debug, Clone)]
pub enum BundleMember {
    File(PathBuf),
    Tree(FileTree),
}

/// The files of one package that go into the archive
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    members: Vec<BundleMember>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.members.push(BundleMember::File(path.into()));
        self
    }

    pub fn add_tree(&mut self, tree: FileTree) -> &mut Self {
        self.members.push(BundleMember::Tree(tree));
        self
    }

    pub fn members(&self) -> &[BundleMember] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether any member resolves to `path`
    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|member| match member {
            BundleMember::File(file) => file == path,
            BundleMember::Tree(tree) => tree.contains(path),
        })
    }

    /// Every file of the bundle, trees walked lazily in member order
    pub fn files(&self) -> impl Iterator<Item = PharpackResult<PathBuf>> + '_ {
        self.members.iter().flat_map(|member| -> Box<dyn Iterator<Item = _>> {
            match member {
                BundleMember::File(file) => Box::new(std::iter::once(Ok(file.clone()))),
                BundleMember::Tree(tree) => Box::new(tree.files()),
            }
        })
    }
}
