//! URL path joining.

use std::path::Path;

/// Join URL segments with `/` and collapse repeated slashes.
///
/// A `scheme://` prefix is kept intact. Empty segments are skipped; an empty
/// result becomes `/`. A trailing slash on the last segment is preserved.
pub(crate) fn normalize_url(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    let (scheme, rest) = match joined.find("://") {
        Some(i) => joined.split_at(i + 3),
        None => ("", joined.as_str()),
    };

    let mut out = String::with_capacity(joined.len());
    out.push_str(scheme);
    let mut prev_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }

    if out.is_empty() {
        "/".to_owned()
    } else {
        out
    }
}

/// Render a relative path with `/` separators.
pub(crate) fn posix_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
