use std::fmt;

/// Generation service API key. Never printed, never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_owned();
        (!key.is_empty()).then_some(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// First non-blank key among the configured secret, the environment
/// variable and direct user input.
pub fn resolve_api_key(
    configured: Option<&str>,
    env_var: &str,
    user_input: Option<&str>,
) -> Option<ApiKey> {
    configured
        .and_then(ApiKey::new)
        .or_else(|| std::env::var(env_var).ok().and_then(ApiKey::new))
        .or_else(|| user_input.and_then(ApiKey::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_key() {
        let key = ApiKey::new("sk-secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(key.expose(), "sk-secret");
    }

    #[test]
    fn blank_keys_are_absent() {
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn configured_key_wins_over_user_input() {
        let key = resolve_api_key(Some("from-config"), "RUSAFETY_TEST_UNSET_VAR", Some("typed"));
        assert_eq!(key.unwrap().expose(), "from-config");

        let key = resolve_api_key(Some(" "), "RUSAFETY_TEST_UNSET_VAR", Some("typed"));
        assert_eq!(key.unwrap().expose(), "typed");

        assert!(resolve_api_key(None, "RUSAFETY_TEST_UNSET_VAR", None).is_none());
    }
}
