//! Error types for board configuration following M-ERRORS-CANONICAL-STRUCTS guideline.
//!
//! Credentials are checked once at startup. Each failure names the field that
//! was wrong so the firmware can log something actionable before halting.

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

/// Result type alias for board configuration.
pub type Result<T> = core::result::Result<T, BoardError>;

/// Member of the credentials bundle an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// WiFi network name
    Ssid,
    /// WiFi passphrase
    Password,
    /// Server host address
    Host,
}

impl Field {
    /// Key used for this field in dotenv-style credential text.
    pub const fn key(self) -> &'static str {
        match self {
            Field::Ssid => "WIFI_SSID",
            Field::Password => "WIFI_PASSWORD",
            Field::Host => "SERVER_HOST",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Ssid => "ssid",
            Field::Password => "password",
            Field::Host => "host",
        })
    }
}

// =============================================================================
// Error Kind Enums (Internal)
// =============================================================================

/// Credentials error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum CredentialsErrorKind {
    Unconfigured(Field),
    MissingKey(Field),
    EmptySsid,
    SsidTooLong,
    PasswordTooShort,
    PasswordTooLong,
    PasswordInvalid,
}

/// Host error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum HostErrorKind {
    Empty,
    InvalidIpv4,
    InvalidHostname,
    TooLong,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// Board configuration error.
///
/// Returned by every fallible operation in this crate. Carries a backtrace
/// when the `std` feature is enabled.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// WiFi credential problems (placeholders, lengths, missing keys)
    Credentials(CredentialsError),
    /// Server host could not be parsed
    Host(HostError),
}

// =============================================================================
// Structured Error Types
// =============================================================================

/// Credentials error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CredentialsError {
    kind: CredentialsErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl CredentialsError {
    pub(crate) fn new(kind: CredentialsErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Field the error refers to
    pub fn field(&self) -> Field {
        match self.kind {
            CredentialsErrorKind::Unconfigured(field) | CredentialsErrorKind::MissingKey(field) => {
                field
            }
            CredentialsErrorKind::EmptySsid | CredentialsErrorKind::SsidTooLong => Field::Ssid,
            CredentialsErrorKind::PasswordTooShort
            | CredentialsErrorKind::PasswordTooLong
            | CredentialsErrorKind::PasswordInvalid => Field::Password,
        }
    }

    /// Check if the field still holds the template placeholder
    pub fn is_unconfigured(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::Unconfigured(_))
    }

    /// Check if the key was absent from credential text
    pub fn is_missing_key(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::MissingKey(_))
    }

    /// Check if the SSID or password has an unacceptable length
    pub fn is_bad_length(&self) -> bool {
        matches!(
            self.kind,
            CredentialsErrorKind::EmptySsid
                | CredentialsErrorKind::SsidTooLong
                | CredentialsErrorKind::PasswordTooShort
                | CredentialsErrorKind::PasswordTooLong
        )
    }

    /// Check if the SSID was empty
    pub fn is_empty_ssid(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::EmptySsid)
    }

    /// Check if the SSID exceeds 32 bytes
    pub fn is_ssid_too_long(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::SsidTooLong)
    }

    /// Check if the passphrase is shorter than 8 characters
    pub fn is_password_too_short(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::PasswordTooShort)
    }

    /// Check if the passphrase is longer than 63 characters and not a raw PSK
    pub fn is_password_too_long(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::PasswordTooLong)
    }

    /// Check if the passphrase has non-printable or non-ASCII characters
    pub fn is_password_invalid(&self) -> bool {
        matches!(self.kind, CredentialsErrorKind::PasswordInvalid)
    }

    /// Backtrace captured when the error was created
    #[cfg(feature = "std")]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

/// Host error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostError {
    kind: HostErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl HostError {
    pub(crate) fn new(kind: HostErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the host string was empty
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, HostErrorKind::Empty)
    }

    /// Check if this looked like an IPv4 literal but was malformed
    pub fn is_invalid_ipv4(&self) -> bool {
        matches!(self.kind, HostErrorKind::InvalidIpv4)
    }

    /// Check if this is a malformed hostname
    pub fn is_invalid_hostname(&self) -> bool {
        matches!(
            self.kind,
            HostErrorKind::InvalidHostname | HostErrorKind::TooLong
        )
    }

    /// Backtrace captured when the error was created
    #[cfg(feature = "std")]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

// =============================================================================
// Convenience Constructors for BoardError
// =============================================================================

impl BoardError {
    // Credentials errors
    pub(crate) fn unconfigured(field: Field) -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::Unconfigured(field)))
    }

    pub(crate) fn missing_key(field: Field) -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::MissingKey(field)))
    }

    pub(crate) fn empty_ssid() -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::EmptySsid))
    }

    pub(crate) fn ssid_too_long() -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::SsidTooLong))
    }

    pub(crate) fn password_too_short() -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::PasswordTooShort))
    }

    pub(crate) fn password_too_long() -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::PasswordTooLong))
    }

    pub(crate) fn password_invalid() -> Self {
        Self::Credentials(CredentialsError::new(CredentialsErrorKind::PasswordInvalid))
    }

    // Host errors
    pub(crate) fn empty_host() -> Self {
        Self::Host(HostError::new(HostErrorKind::Empty))
    }

    pub(crate) fn invalid_ipv4() -> Self {
        Self::Host(HostError::new(HostErrorKind::InvalidIpv4))
    }

    pub(crate) fn invalid_hostname() -> Self {
        Self::Host(HostError::new(HostErrorKind::InvalidHostname))
    }

    pub(crate) fn hostname_too_long() -> Self {
        Self::Host(HostError::new(HostErrorKind::TooLong))
    }

    /// Field of the credentials bundle this error refers to.
    pub fn field(&self) -> Field {
        match self {
            BoardError::Credentials(e) => e.field(),
            BoardError::Host(_) => Field::Host,
        }
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Credentials(e) => match e.kind {
                CredentialsErrorKind::Unconfigured(field) => {
                    write!(f, "Credentials error: {field} still holds the template placeholder")
                }
                CredentialsErrorKind::MissingKey(field) => {
                    write!(f, "Credentials error: missing key {}", field.key())
                }
                kind => write!(f, "Credentials error: {kind:?}"),
            },
            BoardError::Host(e) => write!(f, "Host error: {:?}", e.kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
