//! Native plugin loader
//!
//! A plugin is a shared library exporting [`PLUGIN_ENTRY`]. The loader opens
//! it, resolves the entry point and hands it the calling scope, through which
//! the plugin registers builtins with [`Registrar`](crate::interp::Registrar).
//!
//! Plugins must be built against the same `lzp` version and toolchain as the
//! host: the entry point receives a Rust type across the library boundary.

use crate::interp::ScopeRef;
use libloading::Library;
use std::cell::RefCell;
use std::env::consts::{DLL_EXTENSION, DLL_PREFIX};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Symbol every plugin exports
pub const PLUGIN_ENTRY: &[u8] = b"lzp_plugin_init\0";

/// Directory searched for bare plugin names when none is configured
pub const DEFAULT_PLUGIN_DIR: &str = "plugins";

/// Signature of the plugin entry point
pub type PluginInit = unsafe extern "C" fn(&mut ScopeRef);

/// Plugin loading failure
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to load plugin '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("plugin '{}' has no entry point 'lzp_plugin_init': {source}", .path.display())]
    Symbol {
        path: PathBuf,
        source: libloading::Error,
    },
}

thread_local! {
    static PLUGIN_DIR: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
    /// Libraries stay open so the function pointers they registered stay valid
    static LOADED: RefCell<Vec<Library>> = const { RefCell::new(Vec::new()) };
}

/// Set the directory prepended to bare plugin names
pub fn set_plugin_dir(dir: impl Into<PathBuf>) {
    PLUGIN_DIR.with(|cell| {
        *cell.borrow_mut() = Some(dir.into());
    });
}

/// Configured plugin directory, or [`DEFAULT_PLUGIN_DIR`]
pub fn plugin_dir() -> PathBuf {
    PLUGIN_DIR.with(|cell| {
        cell.borrow()
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGIN_DIR))
    })
}

/// Number of plugin libraries held open on this thread
pub fn loaded_count() -> usize {
    LOADED.with(|cell| cell.borrow().len())
}

/// Paths tried for `name`, in order
pub fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let bases = if name.contains('/') || name.contains(MAIN_SEPARATOR) {
        vec![PathBuf::from(name)]
    } else if DLL_PREFIX.is_empty() || name.starts_with(DLL_PREFIX) {
        vec![dir.join(name)]
    } else {
        vec![dir.join(name), dir.join(format!("{DLL_PREFIX}{name}"))]
    };

    bases
        .into_iter()
        .map(|path| {
            if path.extension().is_some() {
                path
            } else {
                let mut file = path.into_os_string();
                file.push(".");
                file.push(DLL_EXTENSION);
                PathBuf::from(file)
            }
        })
        .collect()
}

/// First existing candidate for `name`
pub fn resolve_path(dir: &Path, name: &str) -> Result<PathBuf, PluginError> {
    let candidates = candidates(dir, name);
    for path in &candidates {
        tracing::trace!(path = %path.display(), "trying plugin path");
        if path.is_file() {
            return Ok(path.clone());
        }
    }
    let path = candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| PathBuf::from(name));
    Err(PluginError::NotFound { path })
}

/// Load the plugin `name` and run its entry point against `scope`.
///
/// Builtins registered before a failure stay registered.
pub fn load_plugin(scope: &ScopeRef, name: &str) -> Result<(), PluginError> {
    let path = resolve_path(&plugin_dir(), name)?;
    tracing::debug!(path = %path.display(), "loading plugin");

    // SAFETY: loading runs the library's initialisers; plugins are trusted
    // code built for this host.
    let library = unsafe { Library::new(&path) }.map_err(|source| PluginError::Open {
        path: path.clone(),
        source,
    })?;

    // SAFETY: the entry point is declared with the `PluginInit` signature.
    let init: PluginInit = unsafe { library.get::<PluginInit>(PLUGIN_ENTRY) }
        .map(|symbol| *symbol)
        .map_err(|source| PluginError::Symbol {
            path: path.clone(),
            source,
        })?;

    LOADED.with(|cell| cell.borrow_mut().push(library));

    let mut handle = Rc::clone(scope);
    // SAFETY: the library backing `init` is kept open in `LOADED`.
    unsafe { init(&mut handle) };

    tracing::debug!(path = %path.display(), loaded = loaded_count(), "plugin initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Scope;

    fn native(name: &str) -> String {
        format!("{name}.{DLL_EXTENSION}")
    }

    #[test]
    fn test_candidates_bare_name() {
        let dir = Path::new("plugins");
        let paths = candidates(dir, "time");
        assert_eq!(paths[0], dir.join(native("time")));
        if !DLL_PREFIX.is_empty() {
            assert_eq!(paths[1], dir.join(native(&format!("{DLL_PREFIX}time"))));
        }
    }

    #[test]
    fn test_candidates_keep_extension() {
        let paths = candidates(Path::new("plugins"), "time.custom");
        assert_eq!(paths[0], Path::new("plugins").join("time.custom"));
    }

    #[test]
    fn test_candidates_path_skips_dir() {
        let paths = candidates(Path::new("plugins"), "./build/time");
        assert_eq!(paths, vec![PathBuf::from(native("./build/time"))]);
    }

    #[test]
    fn test_resolve_prefers_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefixed = dir.path().join(native(&format!("{DLL_PREFIX}demo")));
        std::fs::write(&prefixed, b"").unwrap();
        assert_eq!(resolve_path(dir.path(), "demo").unwrap(), prefixed);
    }

    #[test]
    fn test_resolve_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_path(dir.path(), "absent").unwrap_err();
        assert!(matches!(err, PluginError::NotFound { .. }));
        assert!(err.to_string().starts_with("plugin not found: "));
    }

    #[test]
    fn test_garbage_library_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(native("garbage")), b"not a shared library").unwrap();
        set_plugin_dir(dir.path());

        let scope = Scope::new().into_ref();
        let err = load_plugin(&scope, "garbage").unwrap_err();
        assert!(matches!(err, PluginError::Open { .. }));
        assert!(err.to_string().starts_with("failed to load plugin"));
        assert_eq!(loaded_count(), 0);
    }

    /// A real shared library that exports no plugin entry point
    #[cfg(target_os = "linux")]
    fn system_library() -> Option<PathBuf> {
        [
            "/lib/x86_64-linux-gnu/libm.so.6",
            "/lib/aarch64-linux-gnu/libm.so.6",
            "/usr/lib/x86_64-linux-gnu/libm.so.6",
            "/usr/lib64/libm.so.6",
            "/lib64/libm.so.6",
            "/usr/lib/libm.so.6",
        ]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_library_without_entry_point() {
        let Some(path) = system_library() else {
            return;
        };
        let scope = Scope::new().into_ref();
        let before = loaded_count();

        let err = load_plugin(&scope, &path.display().to_string()).unwrap_err();
        assert!(matches!(err, PluginError::Symbol { .. }));
        assert!(err.to_string().contains("has no entry point 'lzp_plugin_init'"));
        assert_eq!(loaded_count(), before);
        assert!(scope.borrow().bindings().is_empty());
    }

    #[test]
    fn test_plugin_dir_default_and_override() {
        assert_eq!(plugin_dir(), PathBuf::from(DEFAULT_PLUGIN_DIR));
        set_plugin_dir("/opt/lzp/plugins");
        assert_eq!(plugin_dir(), PathBuf::from("/opt/lzp/plugins"));
    }
}
