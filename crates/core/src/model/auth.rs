use std::fmt;

/// Opaque bearer token issued by the remote service.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Returns `None` for a blank token.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Cached profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    /// First word of the display name, used for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("Scholar")
    }
}

/// Authentication state handed to the API layer.
///
/// Built once by the caller and passed in explicitly; nothing in the
/// workspace reads credentials from ambient storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<AuthToken>,
    user: Option<UserProfile>,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<AuthToken>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: Option<UserProfile>) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.user.as_ref().map_or("Scholar", UserProfile::first_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_rejected() {
        assert!(AuthToken::new("   ").is_none());
        assert_eq!(AuthToken::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn token_is_redacted_in_debug() {
        let token = AuthToken::new("secret").unwrap();
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn greeting_uses_first_name_or_default() {
        let anon = SessionContext::anonymous();
        assert_eq!(anon.greeting_name(), "Scholar");
        assert!(!anon.is_authenticated());

        let ctx = SessionContext::anonymous()
            .with_token(AuthToken::new("t"))
            .with_user(Some(UserProfile::new("Ada Lovelace")));
        assert_eq!(ctx.greeting_name(), "Ada");
        assert!(ctx.is_authenticated());

        let blank = UserProfile::new("  ");
        assert_eq!(blank.first_name(), "Scholar");
    }
}
