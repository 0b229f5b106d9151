use crate::siwe::config::SiweConfig;
use crate::siwe::time_utils::{add_ttl, current_time};
use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of random bytes behind every nonce value (32 hex characters).
pub const NONCE_BYTES: usize = 16;

/// A function that provides the current time.
pub type TimeProviderFn = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A single-use sign-in nonce with its validity window.
///
/// A `Nonce` is immutable once issued. The caller stores it next to the
/// pending sign-in attempt and hands it back for verification; enforcing
/// that it is consumed only once is the job of the caller's nonce store.
///
/// # Serialization
///
/// Timestamps serialize as RFC 3339 strings, so a nonce survives a JSON
/// round trip through a session store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce {
    /// Opaque, unpredictable token.
    pub value: String,
    /// When the nonce was issued.
    pub issued_at: DateTime<Utc>,
    /// The nonce is invalid at or after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,
    /// The nonce is invalid strictly before this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
}

impl Nonce {
    /// Creates an unbounded nonce from an existing value and issue time.
    ///
    /// Mostly useful for rebuilding a challenge that was issued elsewhere.
    pub fn new(value: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            issued_at,
            expiration_time: None,
            not_before: None,
        }
    }

    /// Sets the expiration time.
    pub fn with_expiration_time(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    /// Sets the not-before time.
    pub fn with_not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Returns `true` if the nonce has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time.is_some_and(|exp| exp <= now)
    }

    /// Returns `true` if the nonce is inside its validity window at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && self.not_before.is_none_or(|nbf| nbf <= now)
    }
}

/// Issues fresh nonces.
///
/// Values come from the operating system's CSPRNG and are encoded as
/// lowercase hex. The issue time comes from a pluggable time provider so
/// tests can pin the clock.
///
/// # Example
///
/// ```rust
/// use siwe_auth::NonceIssuer;
/// use std::time::Duration;
///
/// let issuer = NonceIssuer::new();
/// let nonce = issuer.issue(Some(Duration::from_secs(300)), None);
///
/// assert_eq!(nonce.value.len(), 32);
/// let ttl = nonce.expiration_time.unwrap() - nonce.issued_at;
/// assert_eq!(ttl.num_seconds(), 300);
/// ```
pub struct NonceIssuer {
    time_provider: TimeProviderFn,
    default_ttl: Option<Duration>,
}

impl Default for NonceIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceIssuer")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl NonceIssuer {
    /// Creates an issuer backed by the system clock and no default TTL.
    pub fn new() -> Self {
        Self {
            time_provider: Box::new(current_time),
            default_ttl: None,
        }
    }

    /// Creates an issuer whose default TTL comes from `config`.
    pub fn from_config(config: &SiweConfig) -> Self {
        Self::new().with_default_ttl(config.nonce_ttl)
    }

    /// Sets the TTL used by [`issue_default`](Self::issue_default).
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets a custom time provider function.
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use siwe_auth::NonceIssuer;
    ///
    /// let fixed = Utc.with_ymd_and_hms(2021, 10, 10, 12, 34, 56).unwrap();
    /// let nonce = NonceIssuer::new()
    ///     .with_time_provider(move || fixed)
    ///     .issue(None, None);
    /// assert_eq!(nonce.issued_at, fixed);
    /// ```
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.time_provider = Box::new(provider);
        self
    }

    /// Issues a nonce.
    ///
    /// * `ttl` - lifetime counted from the issue time; `None` or zero leaves
    ///   the nonce without an expiration time
    /// * `not_before` - stored verbatim
    pub fn issue(&self, ttl: Option<Duration>, not_before: Option<DateTime<Utc>>) -> Nonce {
        let issued_at = (self.time_provider)();
        let expiration_time = ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| add_ttl(issued_at, ttl));

        tracing::debug!(
            %issued_at,
            ?expiration_time,
            ?not_before,
            "Issued sign-in nonce"
        );

        Nonce {
            value: generate_nonce_value(),
            issued_at,
            expiration_time,
            not_before,
        }
    }

    /// Issues a nonce using the configured default TTL.
    pub fn issue_default(&self) -> Nonce {
        self.issue(self.default_ttl, None)
    }
}

/// Generates a random nonce value from the OS entropy source.
fn generate_nonce_value() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use std::collections::HashSet;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 10, 10, 12, 34, 56).unwrap()
    }

    #[test]
    fn test_issue_without_parameters() {
        let nonce = NonceIssuer::new().issue(None, None);

        assert_eq!(nonce.value.len(), 32);
        assert!(nonce.expiration_time.is_none());
        assert!(nonce.not_before.is_none());
    }

    #[test]
    fn test_value_is_lowercase_hex() {
        let nonce = NonceIssuer::new().issue(None, None);
        assert!(
            nonce
                .value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_issue_with_ttl() {
        let issuer = NonceIssuer::new();
        for secs in [1, 60, 300, 86_400] {
            let nonce = issuer.issue(Some(Duration::from_secs(secs)), None);
            let ttl = nonce.expiration_time.unwrap() - nonce.issued_at;
            assert_eq!(ttl, TimeDelta::seconds(secs as i64));
            assert!(nonce.not_before.is_none());
        }
    }

    #[test]
    fn test_zero_ttl_means_no_expiration() {
        let nonce = NonceIssuer::new().issue(Some(Duration::ZERO), None);
        assert!(nonce.expiration_time.is_none());
    }

    #[test]
    fn test_issue_with_not_before() {
        let not_before = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let nonce = NonceIssuer::new().issue(Some(Duration::from_secs(300)), Some(not_before));
        assert_eq!(nonce.not_before, Some(not_before));
    }

    #[test]
    fn test_custom_time_provider() {
        let nonce = NonceIssuer::new()
            .with_time_provider(fixed_time)
            .issue(Some(Duration::from_secs(60)), None);

        assert_eq!(nonce.issued_at, fixed_time());
        assert_eq!(
            nonce.expiration_time,
            Some(fixed_time() + TimeDelta::seconds(60))
        );
    }

    #[test]
    fn test_issue_default_uses_config() {
        let config = SiweConfig {
            nonce_ttl: Duration::from_secs(120),
            version: "1".to_string(),
        };
        let nonce = NonceIssuer::from_config(&config)
            .with_time_provider(fixed_time)
            .issue_default();

        assert_eq!(
            nonce.expiration_time,
            Some(fixed_time() + TimeDelta::seconds(120))
        );
    }

    #[test]
    fn test_issue_default_without_ttl() {
        let nonce = NonceIssuer::new().issue_default();
        assert!(nonce.expiration_time.is_none());
    }

    #[test]
    fn test_values_are_unique() {
        let issuer = NonceIssuer::new();
        let values: HashSet<_> = (0..1000).map(|_| issuer.issue(None, None).value).collect();
        assert_eq!(values.len(), 1000);
    }

    #[test]
    fn test_window_predicates() {
        let nonce = Nonce::new("aAbBcCdD", fixed_time())
            .with_not_before(fixed_time() + TimeDelta::seconds(10))
            .with_expiration_time(fixed_time() + TimeDelta::seconds(20));

        assert!(!nonce.is_active_at(fixed_time()));
        assert!(nonce.is_active_at(fixed_time() + TimeDelta::seconds(10)));
        assert!(!nonce.is_expired_at(fixed_time() + TimeDelta::seconds(19)));
        assert!(nonce.is_expired_at(fixed_time() + TimeDelta::seconds(20)));
        assert!(!nonce.is_active_at(fixed_time() + TimeDelta::seconds(20)));
    }

    #[test]
    fn test_serialization() {
        let nonce = Nonce::new("aAbBcCdD", fixed_time())
            .with_expiration_time(fixed_time() + TimeDelta::seconds(300));

        let json = serde_json::to_string(&nonce).unwrap();
        assert!(!json.contains("not_before"));

        let deserialized: Nonce = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, nonce);
    }
}
