//! Path canonicalization and component splitting (spec §4.4).

use crate::codec::{validate_component, PATH_MAX};
use crate::error::{Error, Result};

/// Collapses `//`, resolves `.` and `..`, rejects attempts to escape above
/// the root, and leaves a leading `/`. Trailing `/` is normalized away.
pub fn canonicalize(full_path: &str) -> Result<String> {
    if full_path.len() >= PATH_MAX {
        return Err(Error::NameTooLong);
    }
    if !full_path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }

    let mut stack: Vec<&str> = Vec::new();
    for component in full_path.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                if stack.pop().is_none() {
                    return Err(Error::InvalidArgument);
                }
            }
            name => {
                validate_component(name)?;
                stack.push(name);
            }
        }
    }

    if stack.is_empty() {
        Ok("/".to_owned())
    } else {
        Ok(format!("/{}", stack.join("/")))
    }
}

/// Splits a canonicalized path into its components. `"/"` yields zero
/// components.
pub fn split_components(canonical: &str) -> Vec<&str> {
    if canonical == "/" {
        Vec::new()
    } else {
        canonical.trim_start_matches('/').split('/').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_double_slashes_and_dot_components() {
        assert_eq!(canonicalize("/a//b/./c").unwrap(), "/a/b/c");
    }

    #[test]
    fn resolves_dotdot_within_bounds() {
        assert_eq!(canonicalize("/a/b/../c").unwrap(), "/a/c");
    }

    #[test]
    fn rejects_escape_above_root() {
        assert_eq!(canonicalize("/.."), Err(Error::InvalidArgument));
    }

    #[test]
    fn root_has_zero_components() {
        let canonical = canonicalize("/").unwrap();
        assert_eq!(canonical, "/");
        assert!(split_components(&canonical).is_empty());
    }

    #[test]
    fn rejects_relative_paths() {
        assert_eq!(canonicalize("a/b"), Err(Error::InvalidArgument));
    }

    #[test]
    fn splits_multi_component_path() {
        let canonical = canonicalize("/a/b/c").unwrap();
        assert_eq!(split_components(&canonical), vec!["a", "b", "c"]);
    }
}
