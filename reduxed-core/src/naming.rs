//! Action type naming
//!
//! Handler names are written in camelCase (`fooBarAction`) and turned into
//! upper snake case action types (`FOO_BAR_ACTION`), optionally namespaced
//! with a prefix (`app/FOO_BAR_ACTION`).

/// Insert an underscore at every camelCase boundary and strip whitespace.
///
/// A boundary is an ASCII uppercase letter preceded by a character that is
/// neither an ASCII uppercase letter nor an underscore. Letter case is left
/// untouched. Whitespace is whatever [`char::is_whitespace`] accepts, which
/// includes U+0085 but not U+FEFF.
///
/// # Example
/// ```
/// use reduxed_core::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("camelCase"), "camel_Case");
/// assert_eq!(to_snake_case("camel_CaseWord"), "camel_Case_Word");
/// ```
pub fn to_snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev: Option<char> = None;

    for c in value.chars() {
        if let Some(p) = prev {
            if c.is_ascii_uppercase() && !p.is_ascii_uppercase() && p != '_' {
                out.push('_');
            }
        }
        prev = Some(c);
        if !c.is_whitespace() {
            out.push(c);
        }
    }

    out
}

/// Derive the action type for a handler name.
///
/// The name is snake-cased and uppercased. A non-empty prefix is prepended
/// followed by `/`.
///
/// # Example
/// ```
/// use reduxed_core::naming::action_type;
///
/// assert_eq!(action_type("foo/bar", "fooBarAction"), "foo/bar/FOO_BAR_ACTION");
/// assert_eq!(action_type("", "increment"), "INCREMENT");
/// ```
pub fn action_type(prefix: &str, name: &str) -> String {
    let name = to_snake_case(name).to_uppercase();
    if prefix.is_empty() {
        name
    } else {
        format!("{}/{}", prefix, name)
    }
}
