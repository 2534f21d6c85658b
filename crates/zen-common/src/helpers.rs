//! Environment helpers shared by the client entry points.

use std::str::FromStr;

use crate::{Error, Result};

pub fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

/// Parse `name` into `T`, returning `Ok(None)` when the variable is unset.
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidEnv {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_bool_values() {
        std::env::set_var("ZEN_TEST_BOOL_ON", "Yes");
        std::env::set_var("ZEN_TEST_BOOL_OFF", "0");
        assert!(env_bool("ZEN_TEST_BOOL_ON", false));
        assert!(!env_bool("ZEN_TEST_BOOL_OFF", true));
        assert!(env_bool("ZEN_TEST_BOOL_UNSET", true));
        assert!(!env_bool("ZEN_TEST_BOOL_UNSET", false));
    }

    #[test]
    fn test_env_parse() {
        std::env::set_var("ZEN_TEST_PARSE_SCALE", " 1.5 ");
        std::env::set_var("ZEN_TEST_PARSE_BAD", "fast");
        assert_eq!(env_parse::<f32>("ZEN_TEST_PARSE_SCALE").unwrap(), Some(1.5));
        assert_eq!(env_parse::<f32>("ZEN_TEST_PARSE_UNSET").unwrap(), None);
        assert!(matches!(
            env_parse::<f32>("ZEN_TEST_PARSE_BAD"),
            Err(Error::InvalidEnv { .. })
        ));
    }
}
