use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

/// The shared username/password pair
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password_digest: [u8; 32],
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl AsRef<str>) -> Self {
        Self {
            username: username.into(),
            password_digest: digest(password.as_ref()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Compare both halves in full; digests keep the comparison from
    /// depending on where the first mismatch is.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = digest(username) == digest(&self.username);
        let pass_ok = digest(password) == self.password_digest;
        user_ok & pass_ok
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header value.
pub fn parse_basic_authorization(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    #[test]
    fn parses_basic_header() {
        let parsed = parse_basic_authorization(&header("admin:password123")).unwrap();
        assert_eq!(parsed, ("admin".to_string(), "password123".to_string()));
    }

    #[test]
    fn password_may_contain_colons() {
        let parsed = parse_basic_authorization(&header("admin:a:b:c")).unwrap();
        assert_eq!(parsed.1, "a:b:c");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = format!("basic {}", STANDARD.encode("u:p"));
        assert!(parse_basic_authorization(&value).is_some());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(parse_basic_authorization("Bearer secret-token").is_none());
        assert!(parse_basic_authorization("Basic !!!not-base64!!!").is_none());
        assert!(parse_basic_authorization(&header("no-colon")).is_none());
        assert!(parse_basic_authorization("Basic").is_none());
    }

    #[test]
    fn credentials_match_exactly() {
        let credentials = Credentials::new("admin", "password123");
        assert!(credentials.matches("admin", "password123"));
        assert!(!credentials.matches("admin", "password124"));
        assert!(!credentials.matches("Admin", "password123"));
        assert!(!credentials.matches("", ""));
    }

    #[test]
    fn debug_output_hides_the_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
