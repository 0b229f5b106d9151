use crate::siwe::error::{NonceInvalidReason, VerificationError};
use crate::siwe::nonce::Nonce;
use crate::siwe::time_utils::current_time;
use chrono::{DateTime, Utc};

/// Checks a nonce's validity window against a given instant.
///
/// Each bound is checked independently; the validator does not require
/// `not_before < expiration_time`. A nonce with neither bound is always
/// valid, leaving single-use enforcement to the caller's nonce store.
pub struct NonceValidator;

impl NonceValidator {
    /// Validates `nonce` at `now`.
    ///
    /// # Errors
    ///
    /// - [`NonceInvalidReason::Expired`] when `expiration_time <= now`
    /// - [`NonceInvalidReason::NotYetValid`] when `not_before > now`
    ///
    /// Expiration is reported first when both bounds are violated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::{TimeDelta, Utc};
    /// use siwe_auth::{Nonce, NonceInvalidReason, NonceValidator, VerificationError};
    ///
    /// let now = Utc::now();
    /// let nonce = Nonce::new("aAbBcCdD", now).with_expiration_time(now);
    ///
    /// assert_eq!(
    ///     NonceValidator::validate(&nonce, now),
    ///     Err(VerificationError::InvalidNonce { reason: NonceInvalidReason::Expired })
    /// );
    /// assert!(NonceValidator::validate(&nonce, now - TimeDelta::seconds(1)).is_ok());
    /// ```
    pub fn validate(nonce: &Nonce, now: DateTime<Utc>) -> Result<(), VerificationError> {
        if nonce.is_expired_at(now) {
            return Err(VerificationError::nonce(NonceInvalidReason::Expired));
        }

        if nonce.not_before.is_some_and(|nbf| nbf > now) {
            return Err(VerificationError::nonce(NonceInvalidReason::NotYetValid));
        }

        Ok(())
    }

    /// Validates `nonce` against the system clock.
    pub fn validate_now(nonce: &Nonce) -> Result<(), VerificationError> {
        Self::validate(nonce, current_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 10, 10, 12, 34, 56).unwrap()
    }

    fn expect_reason(nonce: &Nonce, at: DateTime<Utc>, reason: NonceInvalidReason) {
        assert_eq!(
            NonceValidator::validate(nonce, at),
            Err(VerificationError::InvalidNonce { reason })
        );
    }

    #[test]
    fn test_unbounded_nonce_is_valid() {
        let nonce = Nonce::new("n", now() - TimeDelta::days(365));
        assert!(NonceValidator::validate(&nonce, now()).is_ok());
        assert!(NonceValidator::validate_now(&nonce).is_ok());
    }

    #[test]
    fn test_expired() {
        let nonce = Nonce::new("n", now()).with_expiration_time(now() - TimeDelta::seconds(1));
        expect_reason(&nonce, now(), NonceInvalidReason::Expired);
    }

    #[test]
    fn test_expiration_boundary_is_exclusive() {
        let nonce = Nonce::new("n", now()).with_expiration_time(now());
        expect_reason(&nonce, now(), NonceInvalidReason::Expired);
        assert!(NonceValidator::validate(&nonce, now() - TimeDelta::milliseconds(1)).is_ok());
    }

    #[test]
    fn test_not_yet_valid() {
        let nonce = Nonce::new("n", now()).with_not_before(now() + TimeDelta::hours(1));
        expect_reason(&nonce, now(), NonceInvalidReason::NotYetValid);
    }

    #[test]
    fn test_not_before_boundary_is_inclusive() {
        let nonce = Nonce::new("n", now()).with_not_before(now());
        assert!(NonceValidator::validate(&nonce, now()).is_ok());
        expect_reason(
            &nonce,
            now() - TimeDelta::milliseconds(1),
            NonceInvalidReason::NotYetValid,
        );
    }

    #[test]
    fn test_inside_window() {
        let nonce = Nonce::new("n", now())
            .with_not_before(now() - TimeDelta::minutes(1))
            .with_expiration_time(now() + TimeDelta::minutes(1));
        assert!(NonceValidator::validate(&nonce, now()).is_ok());
    }

    #[test]
    fn test_expiration_reported_before_not_before() {
        // Inverted bounds are not cross-checked; both fail at `now`
        let nonce = Nonce::new("n", now())
            .with_not_before(now() + TimeDelta::minutes(1))
            .with_expiration_time(now() - TimeDelta::minutes(1));
        expect_reason(&nonce, now(), NonceInvalidReason::Expired);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let nonce = Nonce::new("n", now()).with_expiration_time(now() + TimeDelta::minutes(1));
        for _ in 0..3 {
            assert!(NonceValidator::validate(&nonce, now()).is_ok());
        }
    }
}
