//! String inflections used to derive canonical controller names, view
//! directories, and action names.
//!
//! These are pure string transforms with no state:
//! - `controllerize("foo_bar")` → `"FooBarController"` (canonical registry key)
//! - `decontrollerize("FooBarController")` → `"foo_bar"` (view directory)
//! - `actionize("foo_bar")` → `"fooBar"`

/// Camelize an underscored string.
///
/// The first character is lowercased unless `upper` is set.
pub fn camelize(s: &str, upper: bool) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize = upper;
    let mut first = true;

    for c in s.chars() {
        if c == '_' {
            capitalize = true;
        } else if capitalize {
            result.push(c.to_ascii_uppercase());
            capitalize = false;
            first = false;
        } else if first {
            result.push(c.to_ascii_lowercase());
            first = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Underscore a camelcase string.
///
/// Consecutive capitals are treated as one word: `"SSLError"` → `"ssl_error"`.
pub fn underscore(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            // Word boundary: after a lowercase char, or when an acronym run
            // ends (capital followed by a lowercase char).
            let after_lower = i > 0 && chars[i - 1].is_ascii_lowercase();
            let acronym_end =
                i > 0 && chars[i - 1].is_ascii_uppercase() && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if after_lower || acronym_end {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Canonicalize a controller name: camelize and append `Controller` when
/// it is not already present. Idempotent on already-canonical names.
pub fn controllerize(name: &str) -> String {
    if name.ends_with("Controller") {
        return name.to_string();
    }
    format!("{}Controller", camelize(name, true))
}

/// Invert a canonical controller name back to its underscored form,
/// dropping the `Controller` suffix when present.
pub fn decontrollerize(name: &str) -> String {
    let base = name.strip_suffix("Controller").unwrap_or(name);
    underscore(base)
}

/// Canonicalize an action name to camelcase. Already-camelized names pass
/// through unmodified.
pub fn actionize(name: &str) -> String {
    camelize(name, false)
}

/// Build a helper name from a base and a suffix, e.g.
/// `helperize("foo_bar", "URL")` → `"fooBarURL"`.
pub fn helperize(base: &str, suffix: &str) -> String {
    format!("{}{}", camelize(base, false), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_camelize_lowercases_first_character() {
        assert_eq!(camelize("foo_bar", false), "fooBar");
    }

    #[test]
    fn test_camelize_uppercases_first_character_if_set() {
        assert_eq!(camelize("foo_bar_baz", true), "FooBarBaz");
    }

    #[test]
    fn test_underscore_camelcase_words() {
        assert_eq!(underscore("FooBar"), "foo_bar");
    }

    #[test]
    fn test_underscore_consecutive_capitals() {
        assert_eq!(underscore("SSLError"), "ssl_error");
    }

    #[test]
    fn test_controllerize_appends_suffix() {
        assert_eq!(controllerize("Foo"), "FooController");
    }

    #[test]
    fn test_controllerize_is_idempotent() {
        assert_eq!(controllerize("FooController"), "FooController");
    }

    #[test]
    fn test_controllerize_camelizes() {
        assert_eq!(controllerize("foo_bar_baz"), "FooBarBazController");
    }

    #[test]
    fn test_decontrollerize_removes_suffix() {
        assert_eq!(decontrollerize("FooController"), "foo");
    }

    #[test]
    fn test_decontrollerize_without_suffix() {
        assert_eq!(decontrollerize("Foo"), "foo");
    }

    #[test]
    fn test_decontrollerize_underscores() {
        assert_eq!(decontrollerize("FooBarBazController"), "foo_bar_baz");
    }

    #[test]
    fn test_actionize_camelizes_underscored() {
        assert_eq!(actionize("foo_bar"), "fooBar");
    }

    #[test]
    fn test_actionize_leaves_camelized_unmodified() {
        assert_eq!(actionize("fooBar"), "fooBar");
    }

    #[test]
    fn test_helperize() {
        assert_eq!(helperize("FooBar", "URL"), "fooBarURL");
        assert_eq!(helperize("fooBar", "URL"), "fooBarURL");
        assert_eq!(helperize("foo_bar", "URL"), "fooBarURL");
    }

    #[test]
    fn test_canonicalization_round_trip() {
        for name in ["post", "Post", "blog_posts", "BlogPosts", "PostsController"] {
            assert_eq!(
                decontrollerize(&controllerize(name)),
                decontrollerize(name)
            );
        }
    }
}
