//! User data model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address in its canonical stored form: trimmed and lowercased.
///
/// Syntax is checked by the payload rules before a value gets here; this type
/// only guarantees the normalisation that makes uniqueness case-insensitive.
///
/// # Examples
/// ```
/// use taskboard::domain::EmailAddress;
///
/// let email = EmailAddress::normalised("  Ana@Example.com ");
/// assert_eq!(email.as_str(), "ana@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise raw input into the canonical form.
    #[must_use]
    pub fn normalised(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Borrow the canonical address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-settable user fields, already validated and normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name, trimmed.
    pub name: String,
    /// Canonical email.
    pub email: EmailAddress,
    /// Optional date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Optional occupation, trimmed; blank values are absent.
    pub occupation: Option<String>,
}

/// Persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Client-settable fields.
    pub profile: UserProfile,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the last successful mutation.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token; starts at 1.
    pub revision: u32,
}

impl User {
    /// Produce the next version of this user with `profile` applied.
    ///
    /// Refreshes `updated_at` and bumps the revision; the identifier and
    /// creation instant are carried over.
    #[must_use]
    pub fn revised(&self, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            profile,
            created_at: self.created_at,
            updated_at: now,
            revision: self.revision.saturating_add(1),
        }
    }
}
