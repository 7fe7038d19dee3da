//! Recursive copies with subtree pruning.
//!
//! [`copy_pruned`] copies a tree but skips every directory that holds no
//! qualifying file at any depth, so the destination never contains empty
//! branches.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Selects the stylesheets that belong to upstream's plugin subtree.
#[derive(Debug, Clone)]
pub struct PluginCssFilter {
    repo_root: Utf8PathBuf,
    subtree: Utf8PathBuf,
}

impl PluginCssFilter {
    /// Upstream directory holding plugin-scoped stylesheets.
    pub const PLUGIN_SUBTREE: &'static str = "src/core/plugins";

    /// Create a filter for a clone rooted at `repo_root`.
    #[must_use]
    pub fn new(repo_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            subtree: Utf8PathBuf::from(Self::PLUGIN_SUBTREE),
        }
    }

    /// Whether a file at `path` should be copied.
    ///
    /// The path must lie under the plugin subtree relative to the clone root
    /// and its name must end in `css`, which admits `.css` and `.scss`.
    /// Subtree membership is decided per path component, so a sibling such
    /// as `src/core/plugins-extra` is outside it.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use swagger_ui_scss_publisher::prune::PluginCssFilter;
    ///
    /// let filter = PluginCssFilter::new("/clone");
    /// assert!(filter.matches_file(Utf8Path::new("/clone/src/core/plugins/auth/_auth.scss")));
    /// assert!(!filter.matches_file(Utf8Path::new("/clone/src/core/components/app.css")));
    /// assert!(!filter.matches_file(Utf8Path::new("/clone/src/core/plugins/auth/index.js")));
    /// ```
    #[must_use]
    pub fn matches_file(&self, path: &Utf8Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.repo_root) else {
            return false;
        };
        relative.starts_with(&self.subtree)
            && relative.file_name().is_some_and(|name| name.ends_with("css"))
    }
}

/// Whether `dir` or any of its descendants holds a file accepted by `filter`.
///
/// # Errors
///
/// Returns any I/O error raised while walking the tree.
pub fn contains_match(dir: &Utf8Path, filter: &PluginCssFilter) -> io::Result<bool> {
    for entry in dir.read_dir_utf8()? {
        let path = entry?.into_path();
        let found = if fs::metadata(&path)?.is_dir() {
            contains_match(&path, filter)?
        } else {
            filter.matches_file(&path)
        };
        if found {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Copy `src` to `dst`, keeping only files accepted by `filter` and the
/// directories that lead to them.
///
/// The root itself is subject to the filter: a `src` with no qualifying
/// descendant copies nothing. Returns the number of files copied.
///
/// # Errors
///
/// Returns any I/O error raised while reading `src` or writing `dst`.
pub fn copy_pruned(src: &Utf8Path, dst: &Utf8Path, filter: &PluginCssFilter) -> io::Result<usize> {
    if !fs::metadata(src)?.is_dir() {
        if !filter.matches_file(src) {
            return Ok(0);
        }
        fs::copy(src, dst)?;
        return Ok(1);
    }

    if !contains_match(src, filter)? {
        return Ok(0);
    }

    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in src.read_dir_utf8()? {
        let entry = entry?;
        copied += copy_pruned(entry.path(), &dst.join(entry.file_name()), filter)?;
    }
    Ok(copied)
}

/// Copy `src` to `dst` recursively without filtering.
///
/// Returns the number of files copied.
///
/// # Errors
///
/// Returns any I/O error raised while reading `src` or writing `dst`.
pub fn copy_tree(src: &Utf8Path, dst: &Utf8Path) -> io::Result<usize> {
    if !fs::metadata(src)?.is_dir() {
        fs::copy(src, dst)?;
        return Ok(1);
    }

    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in src.read_dir_utf8()? {
        let entry = entry?;
        copied += copy_tree(entry.path(), &dst.join(entry.file_name()))?;
    }
    Ok(copied)
}
