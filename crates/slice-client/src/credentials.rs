use std::fmt;
use reqwest::RequestBuilder;

/// Credentials attached to every backend request.
///
/// Handed to the client explicitly; the client never reads tokens from
/// ambient storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    #[default]
    None,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Bearer(_))
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::bearer("super-secret");
        assert_eq!(format!("{:?}", creds), "Bearer(<redacted>)");
        assert!(creds.is_authenticated());
        assert!(!Credentials::None.is_authenticated());
    }

    #[test]
    fn test_bearer_header_applied() {
        let client = reqwest::Client::new();
        let request = Credentials::bearer("tok")
            .apply(client.get("http://localhost/jobs/1"))
            .build()
            .unwrap();
        let header = request.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer tok");

        let request = Credentials::None
            .apply(client.get("http://localhost/jobs/1"))
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
