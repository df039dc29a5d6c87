//! Feature keys derived from hierarchical test identifiers.
//!
//! A feature groups the parameterized executions of one test method:
//!
//! | identifier                                  | feature                      |
//! |---------------------------------------------|------------------------------|
//! | `tests/test_x.py::TestA::test_b[param1]`    | `TestA::test_b`              |
//! | `tests/test_x.py::test_standalone[param]`   | `test_x.py::test_standalone` |
//! | `test_solo`                                 | `test_solo`                  |

use regex::Regex;
use std::sync::OnceLock;

/// Separator between identifier segments.
pub const SEPARATOR: &str = "::";

fn param_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[.*\]$").expect("valid parameter suffix pattern"))
}

/// Remove a trailing `[...]` parameterization suffix.
pub fn strip_params(segment: &str) -> &str {
    match param_suffix().find(segment) {
        Some(m) => &segment[..m.start()],
        None => segment,
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Derive the feature key for a test identifier.
pub fn feature_key(identifier: &str) -> String {
    let parts: Vec<&str> = identifier.split(SEPARATOR).collect();

    match parts.as_slice() {
        [_, class, method, ..] => {
            format!("{}{}{}", strip_params(class), SEPARATOR, strip_params(method))
        }
        [file, function] => {
            format!("{}{}{}", base_name(file), SEPARATOR, strip_params(function))
        }
        _ => strip_params(identifier).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tests/test_x.py::TestA::test_b[param1]", "TestA::test_b")]
    #[case("tests/test_x.py::TestA::test_b", "TestA::test_b")]
    #[case("tests/test_x.py::test_standalone[param]", "test_x.py::test_standalone")]
    #[case("test_x.py::test_standalone", "test_x.py::test_standalone")]
    #[case("test_solo", "test_solo")]
    #[case("test_solo[3]", "test_solo")]
    #[case("a/b.py::Outer::Inner::test_m[x]", "Outer::Inner")]
    fn test_feature_key(#[case] identifier: &str, #[case] expected: &str) {
        assert_eq!(feature_key(identifier), expected);
    }

    #[test]
    fn test_strip_params() {
        assert_eq!(strip_params("test_b[a-b]"), "test_b");
        assert_eq!(strip_params("test_b[a][b]"), "test_b");
        assert_eq!(strip_params("test_b"), "test_b");
        assert_eq!(strip_params("test_[x]_mid"), "test_[x]_mid");
    }
}
