//! Path separator normalization.

use std::borrow::Cow;

/// Rewrites every `\` in `path` to `/`.
///
/// Already-normalized paths are returned borrowed, so applying this twice is
/// the same as applying it once.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_separators_rewritten() {
        assert_eq!(normalize_path(r"tests\dbt\models\aaa.sql"), "tests/dbt/models/aaa.sql");
    }

    #[test]
    fn mixed_separators_rewritten() {
        assert_eq!(normalize_path(r"x/y\z.sql"), "x/y/z.sql");
    }

    #[test]
    fn posix_path_borrowed() {
        assert!(matches!(normalize_path("a/b/c"), Cow::Borrowed("a/b/c")));
    }

    #[test]
    fn empty_path() {
        assert_eq!(normalize_path(""), "");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn idempotent(s in r"[a-z/\\.]{0,24}") {
                let once = normalize_path(&s).into_owned();
                let twice = normalize_path(&once).into_owned();
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn never_contains_backslash(s in ".*") {
                prop_assert!(!normalize_path(&s).contains('\\'));
            }
        }
    }
}
