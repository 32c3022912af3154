//! Build Use Case
//!
//! Orchestrates the archive build:
//! 1. Check preconditions (writable archives, installed vendor tree)
//! 2. Resolve the target archive and the entry point
//! 3. Stage main project files, rewritten config, runtime container files,
//!    Composer autoload glue and every installed dependency
//! 4. Patch the config factory, wrap the entry point and set the stub
//! 5. Commit to a staging file beside the target and rename it into place
//!
//! The target path is only ever touched by the final rename. Any earlier
//! failure drops the staging file and leaves the target as it was.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::entities::{FileTree, PackageDescriptor};
use crate::domain::ports::{
    BuildEvent, BuildEventSink, ContainerFactory, NoopEventSink, PackageRepository,
    StagedContainer,
};
use crate::domain::services::{
    rewrite_source, wrap_entry_point, ConfigFactoryPathname, EnableScanCacheable, SourceRewrite,
};
use crate::error::{PharpackError, PharpackResult};

use super::dependencies::discover_dependencies;
use super::options::BuildOptions;
use super::result::BuildResult;
use super::session::ArchiveSession;

/// Project config whose `scan_cacheable` flag is forced on
const CONFIG_FILE: &str = "config/config.php";
/// Config factory patched to load config files by pathname, relative to vendor
const CONFIG_FACTORY_FILE: &str = "hyperf/config/src/ConfigFactory.php";
/// Directory excluded from the main tree; only its `container/` is archived
const RUNTIME_DIR: &str = "runtime";
const RUNTIME_CONTAINER_DIR: &str = "runtime/container";

/// Build use case - orchestrates the archive build
pub struct BuildUseCase<R, F>
where
    R: PackageRepository,
    F: ContainerFactory,
{
    repo: R,
    factory: F,
}

impl<R, F> BuildUseCase<R, F>
where
    R: PackageRepository,
    F: ContainerFactory,
{
    pub fn new(repo: R, factory: F) -> Self {
        Self { repo, factory }
    }

    /// Build the archive without progress reporting
    pub fn execute(&self, options: &BuildOptions) -> PharpackResult<BuildResult> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Build the archive, reporting each step to `sink`
    pub fn execute_with_events(
        &self,
        options: &BuildOptions,
        sink: Arc<dyn BuildEventSink>,
    ) -> PharpackResult<BuildResult> {
        let started = Instant::now();

        if !self.factory.is_writable() {
            return Err(PharpackError::Unwritable);
        }

        let manifest = self.repo.load_manifest(&options.manifest_path)?;
        let root = fs::canonicalize(options.project_root())
            .map_err(|e| PharpackError::invalid_input(options.project_root(), e))?;
        let package = PackageDescriptor::new(manifest, &root);

        let vendor = package.vendor_absolute_path();
        if !vendor.is_dir() {
            return Err(PharpackError::NotInstalled { path: vendor });
        }

        let target = resolve_target(options, &package)?;
        let main = resolve_main(options, &package)?;
        let main_path = root.join(&main);
        if !main_path.is_file() {
            return Err(PharpackError::MissingEntryPoint {
                path: PathBuf::from(&main),
            });
        }

        let target_dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.clone());
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PharpackError::invalid_input(&target, "target has no file name"))?;

        sink.on_event(BuildEvent::Started {
            target: target.clone(),
        });

        // Staging file beside the target so the final rename stays on one device.
        let staging = tempfile::Builder::new()
            .prefix(&format!("{}.", file_name))
            .suffix(".phar")
            .tempfile_in(&target_dir)?;
        let container = self.factory.open(staging.as_file().try_clone()?);
        let mut session = ArchiveSession::new(container, &root, sink.clone());

        sink.on_event(BuildEvent::MainPackage {
            name: package.display_name(),
        });
        let tree = main_tree(&package, &main, &target_dir, &file_name, &target);
        session.add_bundle(&package.bundle_with(tree))?;

        if let Some((path, changed)) =
            add_rewritten(&mut session, &root.join(CONFIG_FILE), &EnableScanCacheable)?
        {
            sink.on_event(BuildEvent::ConfigRewritten { path, changed });
        }

        if root.join(RUNTIME_DIR).is_dir() {
            let container_dir = root.join(RUNTIME_CONTAINER_DIR);
            if container_dir.is_dir() {
                sink.on_event(BuildEvent::RuntimeContainer);
                session.add_bundle(&package.bundle_with(FileTree::new(container_dir)))?;
            }
        }

        sink.on_event(BuildEvent::ComposerBase);
        let autoload = vendor.join("autoload.php");
        if !autoload.is_file() {
            return Err(PharpackError::NotInstalled { path: vendor });
        }
        session.add_file(&autoload)?;
        session.build_from_iter(composer_base_files(&vendor.join("composer"))?.into_iter().map(Ok))?;

        let dependencies = discover_dependencies(&self.repo, &package)?;
        for dependency in &dependencies {
            let path = format!("{}/", session.local_path(dependency.directory())?);
            sink.on_event(BuildEvent::Dependency {
                name: dependency.display_name(),
                path,
            });
            session.add_bundle(&dependency.bundle())?;
        }

        if let Some((path, changed)) =
            add_rewritten(&mut session, &vendor.join(CONFIG_FACTORY_FILE), &ConfigFactoryPathname)?
        {
            sink.on_event(BuildEvent::ConfigFactoryRewritten { path, changed });
        }

        // The entry point goes last so nothing can overwrite it.
        let entry_point = session.local_path(&main_path)?;
        let source = read_php(&main_path)?;
        let wrapped = wrap_entry_point(&source, &options.mount_links).map_err(|e| {
            PharpackError::UnparsableSource {
                path: main_path.clone(),
                message: e.to_string(),
            }
        })?;
        session.add_from_string(&entry_point, wrapped)?;
        sink.on_event(BuildEvent::EntryPoint {
            path: entry_point.clone(),
        });

        let stub = session.default_stub(&entry_point);
        session.set_stub(stub);
        sink.on_event(BuildEvent::StubSet {
            entry_point: entry_point.clone(),
        });

        let entries = session.len();
        let size = session.commit()?;
        make_executable(staging.path())?;

        if let Ok(existing) = fs::metadata(&target) {
            sink.on_event(BuildEvent::Overwriting {
                target: target.clone(),
                size: existing.len(),
            });
        }

        if let Err(err) = staging.persist(&target) {
            let staging_path = err.file.path().to_path_buf();
            let rename_error = err.error;
            // Keep the staging file for inspection.
            return Err(match err.file.keep() {
                Ok(_) => PharpackError::PublishFailed {
                    staging: Some(staging_path),
                    target,
                    source: rename_error,
                },
                Err(keep) => PharpackError::PublishFailed {
                    staging: None,
                    target,
                    source: io::Error::new(
                        rename_error.kind(),
                        format!(
                            "{}; staging file {} could not be kept: {}",
                            rename_error,
                            staging_path.display(),
                            keep.error
                        ),
                    ),
                },
            });
        }

        let mut prepared_mounts = Vec::new();
        if options.prepare_mounts {
            for link in &options.mount_links {
                let path = link.materialize(&target_dir)?;
                sink.on_event(BuildEvent::MountPrepared { path: path.clone() });
                prepared_mounts.push(path);
            }
        }

        let duration = started.elapsed();
        sink.on_event(BuildEvent::Published {
            target: target.clone(),
            size,
            entries,
            duration,
        });

        Ok(BuildResult {
            target,
            size,
            entries,
            dependencies: dependencies.len(),
            entry_point,
            prepared_mounts,
            duration,
        })
    }
}

/// Final archive path.
///
/// Derived name is `<short name>[:<version>].phar`. A relative override
/// resolves against the project root; an override naming an existing
/// directory receives the derived name inside it. The directory part is
/// canonicalized so the target can be recognized inside the project tree.
fn resolve_target(options: &BuildOptions, package: &PackageDescriptor) -> PharpackResult<PathBuf> {
    let derived = match &options.version {
        Some(version) => format!("{}:{}.phar", package.short_name(), version),
        None => format!("{}.phar", package.short_name()),
    };

    let Some(target) = &options.target else {
        return Ok(package.directory().join(derived));
    };
    let requested = if target.is_absolute() {
        target.clone()
    } else {
        package.directory().join(target)
    };

    if requested.is_dir() {
        let dir = fs::canonicalize(&requested)
            .map_err(|e| PharpackError::invalid_input(&requested, e))?;
        return Ok(dir.join(derived));
    }

    let file_name = requested
        .file_name()
        .ok_or_else(|| PharpackError::invalid_input(&requested, "target has no file name"))?;
    let parent = requested
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| PharpackError::invalid_input(&requested, "target has no parent directory"))?;
    let dir = fs::canonicalize(parent).map_err(|e| {
        PharpackError::invalid_input(
            &requested,
            format!("target directory {} is not usable: {}", parent.display(), e),
        )
    })?;
    Ok(dir.join(file_name))
}

/// Entry point relative to the project root.
///
/// An explicit override wins; otherwise the first declared bin, which must
/// exist; otherwise the configured default.
fn resolve_main(options: &BuildOptions, package: &PackageDescriptor) -> PharpackResult<String> {
    if let Some(main) = &options.main {
        return Ok(main.clone());
    }
    if let Some(bin) = package.bins().first() {
        if !package.directory().join(bin).exists() {
            return Err(PharpackError::MissingEntryPoint {
                path: PathBuf::from(bin),
            });
        }
        return Ok(bin.clone());
    }
    Ok(options.default_bin.clone())
}

/// Files of the main project: everything except the vendor and runtime
/// trees, a root `composer.phar`, the entry point, the target archive and
/// staging leftovers of earlier builds
fn main_tree(
    package: &PackageDescriptor,
    main: &str,
    target_dir: &Path,
    file_name: &str,
    target: &Path,
) -> FileTree {
    let root = package.directory();
    let mut tree = FileTree::new(root)
        .exclude_dir(package.vendor_path().trim_end_matches('/'))
        .exclude_dir(RUNTIME_DIR)
        .exclude_file("composer.phar")
        .exclude_file(main);

    if let Ok(relative) = target.strip_prefix(root) {
        tree = tree.exclude_file(relative);
    }
    if let Ok(relative) = target_dir.strip_prefix(root) {
        tree = tree.exclude_staging(relative, file_name);
    }
    tree
}

/// Non-hidden files with an extension directly in `vendor/composer`, sorted
fn composer_base_files(dir: &Path) -> PharpackResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || !name.contains('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Apply `rewrite` to `path` and stage the result in its place.
///
/// Returns `None` when the file does not exist; a file that exists but
/// cannot be parsed is an error.
fn add_rewritten<C, W>(
    session: &mut ArchiveSession<C>,
    path: &Path,
    rewrite: &W,
) -> PharpackResult<Option<(String, bool)>>
where
    C: StagedContainer,
    W: SourceRewrite,
{
    if !path.is_file() {
        return Ok(None);
    }
    let local = session.local_path(path)?;
    let source = read_php(path)?;
    let outcome = rewrite_source(&source, rewrite).map_err(|e| PharpackError::UnparsableSource {
        path: path.to_path_buf(),
        message: format!("{} ({})", e, rewrite.name()),
    })?;
    session.add_from_string(&local, outcome.source)?;
    Ok(Some((local, outcome.changed)))
}

fn read_php(path: &Path) -> PharpackResult<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| PharpackError::UnparsableSource {
        path: path.to_path_buf(),
        message: "source is not valid UTF-8".to_string(),
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> PharpackResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> PharpackResult<()> {
    Ok(())
}
