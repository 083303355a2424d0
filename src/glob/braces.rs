//! Brace alternation expansion.

/// Byte range of a `{...}` group: the opening brace, and the closing brace.
struct BraceGroup {
    open: usize,
    close: usize,
}

/// Finds the leftmost `{...}` group whose body is non-empty and free of braces.
///
/// Outer groups of a nested construct are skipped until their inner groups
/// have been expanded away.
fn find_group(pattern: &str) -> Option<BraceGroup> {
    let bytes = pattern.as_bytes();
    let mut start = 0;

    while let Some(offset) = pattern[start..].find('{') {
        let open = start + offset;
        let body_start = open + 1;
        match bytes[body_start..]
            .iter()
            .position(|&b| b == b'{' || b == b'}')
        {
            Some(len) if bytes[body_start + len] == b'}' && len > 0 => {
                return Some(BraceGroup {
                    open,
                    close: body_start + len,
                });
            }
            Some(_) => start = body_start,
            None => return None,
        }
    }

    None
}

/// Expands every brace group in `pattern` into the full Cartesian product.
///
/// Options are trimmed of surrounding whitespace and substituted literally.
/// Order follows the options left to right, so `a{1,2}{x,y}` yields
/// `a1x`, `a1y`, `a2x`, `a2y`. A pattern without groups expands to itself.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let mut expanded = Vec::new();
    expand_into(pattern, &mut expanded);
    expanded
}

fn expand_into(pattern: &str, out: &mut Vec<String>) {
    let Some(group) = find_group(pattern) else {
        out.push(pattern.to_string());
        return;
    };

    let prefix = &pattern[..group.open];
    let suffix = &pattern[group.close + 1..];
    for option in pattern[group.open + 1..group.close].split(',') {
        let candidate = format!("{prefix}{}{suffix}", option.trim());
        expand_into(&candidate, out);
    }
}
