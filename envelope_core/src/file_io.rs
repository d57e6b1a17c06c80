//! # Project Files
//!
//! Projects live in `.evp` files holding pretty-printed JSON.
//!
//! - Saves are atomic: the JSON goes to a `.evp.tmp` sibling, is synced, then
//!   renamed over the target.
//! - A `.evp.lock` sibling carries who holds the file, backed by an OS-level
//!   exclusive lock (fs2) on the same handle.
//! - Loads check the schema version before handing the project out.
//!
//! ## Example
//!
//! ```rust,no_run
//! use envelope_core::file_io::{load_project, save_project, FileLock};
//! use envelope_core::project::Project;
//! use std::path::Path;
//!
//! let path = Path::new("house.evp");
//! let lock = FileLock::acquire(path, "jane@studio.example")?;
//! save_project(&Project::new("Jane", "25-042", "ACME"), path)?;
//! let project = load_project(path)?;
//! drop(lock);
//! # Ok::<(), envelope_core::errors::EnvelopeError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{EnvelopeError, EnvelopeResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Project file extension
pub const PROJECT_EXTENSION: &str = "evp";

/// Locks older than this are taken over
const STALE_LOCK_AGE_HOURS: i64 = 24;

/// Contents of a `.evp.lock` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (email or username)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// A lock whose process is gone, or that is simply too old.
    pub fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_AGE_HOURS) {
            return true;
        }
        let same_machine = hostname().is_some_and(|ours| ours == self.machine);
        same_machine && !process_alive(self.pid)
    }

    fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> Option<String> {
    let var = if cfg!(windows) { "COMPUTERNAME" } else { "HOSTNAME" };
    std::env::var(var).ok().or_else(|| std::env::var("HOST").ok())
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists() || !Path::new("/proc").exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Sibling path with an extra suffix on the extension (`a.evp` → `a.evp.lock`).
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => format!("{}.{}", ext.to_string_lossy(), suffix),
        None => suffix.to_string(),
    };
    path.with_extension(extension)
}

/// Lock file path for a project file
pub fn lock_path_for(project_path: &Path) -> PathBuf {
    sibling_path(project_path, "lock")
}

fn io_error(operation: &str, path: &Path) -> impl FnOnce(std::io::Error) -> EnvelopeError {
    let operation = operation.to_string();
    let path = path.display().to_string();
    move |e| EnvelopeError::file_error(operation, path, e.to_string())
}

fn read_lock_info(lock_path: &Path) -> EnvelopeResult<LockInfo> {
    let contents = fs::read_to_string(lock_path).map_err(io_error("read lock", lock_path))?;
    serde_json::from_str(&contents).map_err(EnvelopeError::serialization)
}

/// Exclusive hold on a project file, released on drop.
#[derive(Debug)]
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Take the lock on a project file.
    ///
    /// Fails with [`EnvelopeError::FileLocked`] while another live holder
    /// has it. Stale lock files are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EnvelopeResult<Self> {
        let lock_path = lock_path_for(path);
        if let Some(existing) = FileLock::check(path) {
            return Err(EnvelopeError::file_locked(
                path.display().to_string(),
                existing.holder(),
                existing.locked_at.to_rfc3339(),
            ));
        }

        // Truncate only once the OS lock is ours
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error("create lock", &lock_path))?;
        handle.try_lock_exclusive().map_err(|_| {
            EnvelopeError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(EnvelopeError::serialization)?;
        handle
            .set_len(0)
            .and_then(|_| handle.write_all(json.as_bytes()))
            .and_then(|_| handle.sync_all())
            .map_err(io_error("write lock", &lock_path))?;

        debug!(path = %path.display(), user = %info.user_id, "project lock acquired");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live holder of a project file, if any.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        match read_lock_info(&lock_path) {
            Ok(info) if !info.is_stale() => Some(info),
            Ok(info) => {
                debug!(holder = %info.holder(), "ignoring stale lock");
                None
            }
            Err(_) => None,
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.lock_path) {
            warn!(path = %self.lock_path.display(), error = %e, "could not remove lock file");
        }
    }
}

/// Write a project atomically.
pub fn save_project(project: &Project, path: &Path) -> EnvelopeResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(EnvelopeError::serialization)?;
    let tmp_path = sibling_path(path, "tmp");

    let mut tmp = File::create(&tmp_path).map_err(io_error("create temp file", &tmp_path))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(io_error("write temp file", &tmp_path))?;
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error("rename to final", path)(e));
    }
    info!(path = %path.display(), elements = project.element_count(), "project saved");
    Ok(())
}

/// Read a project and check its schema version.
pub fn load_project(path: &Path) -> EnvelopeResult<Project> {
    let contents = fs::read_to_string(path).map_err(io_error("read", path))?;
    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| EnvelopeError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;
    validate_version(&project.meta.version)?;
    debug!(path = %path.display(), version = %project.meta.version, "project loaded");
    Ok(project)
}

/// Read a project along with whoever currently holds its lock.
pub fn load_project_with_lock_check(path: &Path) -> EnvelopeResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

fn version_parts(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().ok());
    let major = parts.next()??;
    let minor = parts.next().flatten().unwrap_or(0);
    Some((major, minor))
}

/// Accept files of the same major version; during 0.x, reject newer minors.
pub fn validate_version(file_version: &str) -> EnvelopeResult<()> {
    let mismatch = || EnvelopeError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let (file_major, file_minor) = version_parts(file_version).ok_or_else(mismatch)?;
    let (major, minor) = version_parts(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementConfiguration, ElementType};
    use tempfile::TempDir;

    fn project_path(dir: &TempDir) -> PathBuf {
        dir.path().join("house.evp")
    }

    #[test]
    fn test_lock_path_generation() {
        assert_eq!(
            lock_path_for(Path::new("/work/house.evp")),
            Path::new("/work/house.evp.lock")
        );
        assert_eq!(lock_path_for(Path::new("/work/house")), Path::new("/work/house.lock"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = project_path(&dir);

        let mut project = Project::new("Test Engineer", "TEST-001", "Test Client");
        let type_id = project.add_building_type("Residential");
        let space_id = project.add_space(&type_id, "Living").unwrap();
        let location = project
            .add_element(&type_id, &space_id, Element::new("Roof", ElementConfiguration::new(ElementType::Ceiling)))
            .unwrap();
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.job_id, "TEST-001");
        assert_eq!(loaded.element(&location).unwrap().name, "Roof");
        assert!(!sibling_path(&path, "tmp").exists());
    }

    #[test]
    fn test_lock_blocks_second_holder() {
        let dir = TempDir::new().unwrap();
        let path = project_path(&dir);
        save_project(&Project::default(), &path).unwrap();

        let lock = FileLock::acquire(&path, "first@example.com").unwrap();
        assert!(lock_path_for(&path).exists());
        assert_eq!(FileLock::check(&path).map(|info| info.user_id), Some("first@example.com".into()));

        let err = FileLock::acquire(&path, "second@example.com").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(lock);
        assert!(!lock_path_for(&path).exists());
        assert!(FileLock::acquire(&path, "second@example.com").is_ok());
    }

    #[test]
    fn test_stale_lock_taken_over() {
        let dir = TempDir::new().unwrap();
        let path = project_path(&dir);
        let mut old = LockInfo::new("gone@example.com");
        old.locked_at = Utc::now() - Duration::hours(48);
        fs::write(lock_path_for(&path), serde_json::to_string(&old).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_none());
        let lock = FileLock::acquire(&path, "me@example.com").unwrap();
        assert_eq!(lock.info.user_id, "me@example.com");
    }

    #[test]
    fn test_failed_takeover_keeps_holder_info() {
        let dir = TempDir::new().unwrap();
        let path = project_path(&dir);
        let lock_path = lock_path_for(&path);
        let mut holder = LockInfo::new("slow@example.com");
        holder.locked_at = Utc::now() - Duration::hours(48);
        let written = serde_json::to_string(&holder).unwrap();
        fs::write(&lock_path, &written).unwrap();

        let held = File::open(&lock_path).unwrap();
        held.lock_exclusive().unwrap();

        let err = FileLock::acquire(&path, "me@example.com").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert_eq!(fs::read_to_string(&lock_path).unwrap(), written);
        assert_eq!(read_lock_info(&lock_path).unwrap(), holder);

        held.unlock().unwrap();
        drop(held);
        let lock = FileLock::acquire(&path, "me@example.com").unwrap();
        assert_eq!(read_lock_info(&lock_path).unwrap(), lock.info);
    }

    #[test]
    fn test_load_with_lock_check() {
        let dir = TempDir::new().unwrap();
        let path = project_path(&dir);
        save_project(&Project::new("Test", "TEST", "Client"), &path).unwrap();

        let (loaded, holder) = load_project_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.job_id, "TEST");
        assert!(holder.is_none());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = project_path(&dir);
        fs::write(&path, "not json").unwrap();
        assert_eq!(load_project(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
        assert_eq!(
            load_project(&dir.path().join("missing.evp")).unwrap_err().error_code(),
            "FILE_ERROR"
        );
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("banana").is_err());
    }
}
