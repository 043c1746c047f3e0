//! Session-unique buffer naming.

/// First of `base`, `base2`, `base3`, ... not rejected by `is_taken`.
pub fn unique_buffer_name(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    (2u64..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Turn a file stem into an identifier usable as a buffer name.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, and a leading digit gets a
/// `_` prefix. An empty stem becomes `image`.
pub fn buffer_name_from_stem(stem: &str) -> String {
    let mut name: String =
        stem.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    if name.is_empty() {
        return "image".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
