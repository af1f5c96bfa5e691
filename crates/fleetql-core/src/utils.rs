/// Canonical lookup key for a field name: ASCII upper-case.
///
/// # Examples
/// ```
/// use fleetql_core::utils::canonical_name;
/// assert_eq!(canonical_name("updateStatus"), "UPDATESTATUS");
/// assert_eq!(canonical_name("NAME"), "NAME");
/// ```
pub fn canonical_name(s: &str) -> String {
    s.to_ascii_uppercase()
}

/// Case-insensitive (ASCII) prefix test.
///
/// # Examples
/// ```
/// use fleetql_core::utils::starts_with_ignore_case;
/// assert!(starts_with_ignore_case("CONTROLLERID", "contr"));
/// assert!(!starts_with_ignore_case("NAME", "names"));
/// ```
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Render a list of names the way error messages show them: `[a, b, c]`.
pub fn bracket_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("[");
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(item);
    }
    out.push(']');
    out
}
