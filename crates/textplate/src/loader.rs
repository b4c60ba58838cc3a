//! Content loading for `$include`.
//!
//! The engine never touches the filesystem itself; `$include(path)` asks the
//! configured [`IncludeLoader`] for the template source. [`DirLoader`] is the
//! stock loader for a directory of template files; closures work too for
//! tests and embedded content.
//!
//! There is no cycle detection: a template that includes itself recurses
//! until the stack is exhausted. Wrap a loader if you need a depth limit.

use std::path::PathBuf;

use crate::error::RenderError;

/// Resolves an include path to template source text.
pub trait IncludeLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<String, RenderError>;
}

impl<F> IncludeLoader for F
where
    F: Fn(&str) -> Result<String, RenderError> + Send + Sync,
{
    fn load(&self, path: &str) -> Result<String, RenderError> {
        (self)(path)
    }
}

/// Loads includes from files under a root directory.
///
/// Paths in `$include(...)` are joined onto the root and read as UTF-8.
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl IncludeLoader for DirLoader {
    fn load(&self, path: &str) -> Result<String, RenderError> {
        std::fs::read_to_string(self.root.join(path)).map_err(|source| {
            RenderError::IncludeFailure {
                path: path.to_string(),
                source,
            }
        })
    }
}
