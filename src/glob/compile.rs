//! Glob to regular expression compilation.

use regex::Regex;

/// Wildcard tokens in substitution order.
///
/// Multi-character tokens come first: rewriting `*` before `**` would leave
/// nothing for the `**` forms to match. Each needle is the token as it
/// appears after [`regex::escape`].
const TOKEN_REWRITES: [(&str, &str); 5] = [
    (r"\*\*/", "(?:[^/]+/)*"),
    (r"/\*\*", "(?:/[^/]+)*"),
    (r"\*\*", ".*"),
    (r"\*", "[^/]*"),
    (r"\?", "[^/]"),
];

/// Translates one brace-free pattern into an anchored regex source string.
///
/// All literal characters are escaped first, then the wildcard tokens are
/// rewritten in [`TOKEN_REWRITES`] order. None of the replacement texts
/// contain an escaped `*` or `?`, so later rewrites never touch the output of
/// earlier ones.
pub fn pattern_to_regex(pattern: &str) -> String {
    let mut source = regex::escape(pattern);
    for (needle, replacement) in TOKEN_REWRITES {
        source = source.replace(needle, replacement);
    }
    format!("^{source}$")
}

/// Compiles one brace-free pattern into a whole-path matcher.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&pattern_to_regex(pattern))
}
