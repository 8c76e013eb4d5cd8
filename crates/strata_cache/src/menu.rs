//! Host integration helpers.
//!
//! Small entry points used by host nodes: validating the file parameter,
//! building the root-path pick list, and reloading an archive after it
//! changed on disk. Failures are reported as "no result" (`false`, or a
//! menu with only `/`) rather than as errors.

use std::path::Path;

use strata_core::ROOT_PATH;

use crate::settings::CacheSettings;
use crate::store::SceneCache;

/// Returns `true` if `path` has the archive extension (exact,
/// case-sensitive match) and exists.
#[must_use]
pub fn is_valid_archive_path(path: impl AsRef<Path>, settings: &CacheSettings) -> bool {
    let path = path.as_ref();
    path.extension().and_then(|ext| ext.to_str()) == Some(settings.archive_extension.as_str())
        && path.exists()
}

/// Rows of the root-path menu for `file`.
///
/// The first row is always `/`. For a valid archive it is followed by every
/// descendant path, truncated so the menu has at most `menu_limit` rows.
#[must_use]
pub fn root_menu(cache: &SceneCache, file: impl AsRef<Path>) -> Vec<String> {
    let file = file.as_ref();
    let mut menu = vec![ROOT_PATH.to_string()];

    if !is_valid_archive_path(file, cache.settings()) {
        return menu;
    }

    let descendants = match cache.entry(file, ROOT_PATH) {
        Ok(entry) => entry.descendant_names(),
        Err(err) => {
            log::warn!("Cannot list '{}': {err}", file.display());
            return menu;
        }
    };

    let limit = cache.settings().menu_limit.saturating_sub(menu.len());
    if descendants.len() > limit {
        log::debug!(
            "Root menu for '{}' truncated to {} of {} paths",
            file.display(),
            limit,
            descendants.len()
        );
    }
    menu.extend(descendants.into_iter().take(limit));
    menu
}

/// Removes `file` from the cache so the next access reopens it.
///
/// Returns `false` without touching the cache if `file` is not a valid archive path.
pub fn reload(cache: &SceneCache, file: impl AsRef<Path>) -> bool {
    let file = file.as_ref();
    if !is_valid_archive_path(file, cache.settings()) {
        return false;
    }
    cache.erase(file);
    true
}
