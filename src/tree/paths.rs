/*!
 * Tree Path Helpers
 * Lexical path handling shared by the sandbox guard and the orchestrators
 */

use std::path::{Path, PathBuf};

/// Make a path absolute (anchored at `/`) and clean `.`, `..` and repeated separators
///
/// Purely lexical: nothing is looked up in any store.
pub fn normalize(path: &str) -> PathBuf {
    let path = Path::new(path);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new("/").join(path)
    };

    PathBuf::from(path_clean::clean(&path))
}

/// Split a path into (parent directory, leaf name)
///
/// Trailing separators are ignored. The parent of a top-level entry is `/`,
/// and the root itself splits into (`/`, "").
pub fn split_path(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');

    match trimmed.rsplit_once('/') {
        Some((parent, name)) => {
            let parent = parent.trim_end_matches('/');
            let parent = if parent.is_empty() { "/" } else { parent };
            (parent.to_string(), name.to_string())
        }
        None => ("/".to_string(), trimmed.to_string()),
    }
}

/// Fill in an empty destination leaf with the source's own name
///
/// Only the root has an empty leaf, so `copy`/`move` of `/a/b` to `/`
/// target `/b`. Any other destination is returned unchanged.
pub fn destination_for(source: &str, destination: &str) -> String {
    let (_, name) = split_path(destination);
    if !name.is_empty() {
        return destination.to_string();
    }
    let (_, source_name) = split_path(source);
    format!("/{source_name}")
}

/// True when `path` is `ancestor` or lies below it, compared component-wise
pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    normalize(path).starts_with(normalize(ancestor))
}

/// True when both paths name the same parent directory
pub fn same_parent(a: &str, b: &str) -> bool {
    let (parent_a, _) = split_path(a);
    let (parent_b, _) = split_path(b);
    normalize(&parent_a) == normalize(&parent_b)
}
