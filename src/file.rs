//! Discovery of config files.
//!
//! Each [`SearchPath`] resolves to one directory, which is checked for
//! `{dir}/{file_name}`. Paths are listed lowest priority first:
//!
//! - [`SearchMode::Merge`] returns every file found, in list order. Reading
//!   them in that order lets later files override earlier ones.
//! - [`SearchMode::FirstMatch`] searches from the highest-priority end and
//!   returns only the first file found.
//!
//! Missing files are skipped in both modes. Other I/O errors (permissions and
//! the like) are propagated.

use std::path::PathBuf;

use crate::error::GcfgError;

/// Where to search for config files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit path.
    Path(PathBuf),
}

/// How discovered files are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Read every file found, lowest priority first.
    #[default]
    Merge,
    /// Read only the highest-priority file found.
    FirstMatch,
}

/// A discovered file and its raw contents.
pub type Found = (PathBuf, Vec<u8>);

/// Resolve a [`SearchPath`] to a directory. `None` when it can't be
/// determined, e.g. without a home directory.
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Find and read `file_name` in the given search paths.
pub fn load_config_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
    mode: SearchMode,
) -> Result<Vec<Found>, GcfgError> {
    let dirs: Vec<PathBuf> = search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
        .collect();

    let mut found = Vec::new();
    match mode {
        SearchMode::Merge => {
            for dir in &dirs {
                if let Some(file) = try_read(dir.join(file_name))? {
                    found.push(file);
                }
            }
        }
        SearchMode::FirstMatch => {
            for dir in dirs.iter().rev() {
                if let Some(file) = try_read(dir.join(file_name))? {
                    found.push(file);
                    break;
                }
            }
        }
    }
    Ok(found)
}

/// Read a file that may not exist.
fn try_read(path: PathBuf) -> Result<Option<Found>, GcfgError> {
    match std::fs::read(&path) {
        Ok(content) => {
            log::debug!("found config file {}", path.display());
            Ok(Some((path, content)))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(GcfgError::IoError { path, source }),
    }
}

/// Read a file that must exist.
pub fn read_required(path: PathBuf) -> Result<Found, GcfgError> {
    match std::fs::read(&path) {
        Ok(content) => Ok((path, content)),
        Err(source) => Err(GcfgError::IoError { path, source }),
    }
}
