//! Cookie-backed dashboard sessions.
//!
//! There is no server-side session record. The cookie carries
//! `<subject>.<hex HMAC-SHA256(subject)>`, so a value only authenticates if
//! this server issued it; unsigned or tampered cookies read as absent.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Seven days.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Subject used for the single implicit dashboard user.
pub const DEFAULT_SUBJECT: &str = "default";

const SIGNATURE_SEPARATOR: char = '.';

#[derive(Clone)]
pub struct SessionManager {
    signing_key: Secret<String>,
    secure: bool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// `secure` is the already-resolved cookie flag; see `AdminConfig::secure_cookie`.
    pub fn new(signing_key: Secret<String>, secure: bool) -> Self {
        Self {
            signing_key,
            secure,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_key.expose_secret().as_bytes())
            .expect("HMAC can take key of any size")
    }

    /// Produce the opaque token stored in the cookie.
    pub fn issue(&self, subject: &str) -> String {
        let mut mac = self.mac();
        mac.update(subject.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{}{}{}", subject, SIGNATURE_SEPARATOR, signature)
    }

    /// Recover the subject from a token, or `None` if it was not issued here.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (subject, signature) = token.rsplit_once(SIGNATURE_SEPARATOR)?;
        if subject.is_empty() {
            return None;
        }
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(subject.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(subject.to_string())
    }

    /// Set (or overwrite) the session cookie for `subject`.
    pub fn create_session(&self, jar: CookieJar, subject: &str) -> CookieJar {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, self.issue(subject)))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS))
            .path("/");

        tracing::info!(subject = %subject, "Session created");
        jar.add(cookie)
    }

    /// The authenticated subject, if the cookie is present and genuine.
    pub fn read_session(&self, jar: &CookieJar) -> Option<String> {
        let cookie = jar.get(SESSION_COOKIE_NAME)?;
        let subject = self.verify(cookie.value());
        if subject.is_none() {
            tracing::warn!("Ignoring session cookie with invalid signature");
        }
        subject
    }

    /// Remove the session cookie. A missing cookie is not an error.
    pub fn delete_session(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    }

    pub fn is_authenticated(&self, jar: &CookieJar) -> bool {
        self.read_session(jar).is_some()
    }
}
