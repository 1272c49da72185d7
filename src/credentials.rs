//! WiFi and server credentials compiled into the firmware.
//!
//! The values come from `credentials.rs` at the crate root (copied from
//! `credentials.example.rs` and edited by hand). When that file is missing
//! the build falls back to the template and [`USING_TEMPLATE`] is `true`.
//! Any value can be overridden at build time:
//!
//! ```bash
//! WIFI_SSID=HomeNet WIFI_PASSWORD=secret123 SERVER_HOST=192.168.1.23 \
//!     cargo build --release --features embassy-rp
//! ```

use core::fmt;

use crate::error::{BoardError, Field, Result};
use crate::net::{Host, ServerEndpoint};

mod file {
    include!(concat!(env!("OUT_DIR"), "/credentials.rs"));
}

/// Placeholder SSID shipped in the template.
pub const PLACEHOLDER_SSID: &str = "YOUR_WIFI_SSID";
/// Placeholder password shipped in the template.
pub const PLACEHOLDER_PASSWORD: &str = "YOUR_WIFI_PASSWORD";
/// Placeholder host shipped in the template.
pub const PLACEHOLDER_HOST: &str = "YOUR_SERVER_IP";

/// WiFi network name.
pub const SSID: &str = match option_env!("WIFI_SSID") {
    Some(ssid) => ssid,
    None => file::SSID,
};

/// WiFi network password. Empty for an open network.
pub const PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(password) => password,
    None => file::PASSWORD,
};

/// IP address or hostname of the machine running the ingestion service.
pub const HOST: &str = match option_env!("SERVER_HOST") {
    Some(host) => host,
    None => file::HOST,
};

/// `true` when no local `credentials.rs` existed at build time.
///
/// Environment overrides still apply on top of the template.
pub const USING_TEMPLATE: bool = cfg!(credentials_template);

/// Longest SSID allowed by 802.11.
pub const MAX_SSID_LEN: usize = 32;
/// Shortest WPA2 passphrase.
pub const MIN_PASSPHRASE_LEN: usize = 8;
/// Longest WPA2 passphrase.
pub const MAX_PASSPHRASE_LEN: usize = 63;
/// Length of a raw PSK written as hex digits.
pub const RAW_PSK_HEX_LEN: usize = 64;

/// The SSID, password and host the board connects with.
///
/// `Debug` never prints the password.
///
/// # Examples
///
/// ```
/// use respeaker_board::credentials::Credentials;
///
/// let creds = Credentials::new("HomeNet", "correct horse", "192.168.1.23");
/// creds.validate().unwrap();
/// assert_eq!(creds.endpoint(8010).unwrap().to_string(), "192.168.1.23:8010");
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    ssid: &'a str,
    password: &'a str,
    host: &'a str,
}

impl Credentials<'static> {
    /// Credentials compiled into this build.
    pub const BUILT_IN: Self = Self::new(SSID, PASSWORD, HOST);
}

impl<'a> Credentials<'a> {
    /// Bundle the three values without checking them.
    #[inline]
    pub const fn new(ssid: &'a str, password: &'a str, host: &'a str) -> Self {
        Self {
            ssid,
            password,
            host,
        }
    }

    /// Read credentials from dotenv-style text.
    ///
    /// Expects `WIFI_SSID=`, `WIFI_PASSWORD=` and `SERVER_HOST=` lines.
    /// Blank lines and `#` comments are skipped. The first occurrence of a
    /// key wins. One matching pair of surrounding `"` or `'` quotes is
    /// removed, so `WIFI_PASSWORD=" spaced "` keeps its inner spaces.
    /// Values are not validated; call [`Credentials::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use respeaker_board::credentials::Credentials;
    ///
    /// let creds = Credentials::parse(
    ///     "WIFI_SSID=HomeNet\nWIFI_PASSWORD=secret123\nSERVER_HOST=10.0.0.2\n",
    /// ).unwrap();
    /// assert_eq!(creds.ssid(), "HomeNet");
    /// ```
    pub fn parse(text: &'a str) -> Result<Self> {
        let lookup = |field: Field| value_of(text, field.key()).ok_or_else(|| BoardError::missing_key(field));

        Ok(Self {
            ssid: lookup(Field::Ssid)?,
            password: lookup(Field::Password)?,
            host: lookup(Field::Host)?,
        })
    }

    /// WiFi network name.
    #[inline]
    pub const fn ssid(&self) -> &'a str {
        self.ssid
    }

    /// WiFi password.
    #[inline]
    pub const fn password(&self) -> &'a str {
        self.password
    }

    /// Server host as written in the configuration.
    #[inline]
    pub const fn host_str(&self) -> &'a str {
        self.host
    }

    /// An empty password selects an open network.
    #[inline]
    pub const fn is_open_network(&self) -> bool {
        self.password.is_empty()
    }

    /// Check every field.
    ///
    /// Template placeholders are reported first, in field order, so an
    /// unedited file gives a single clear error.
    pub fn validate(&self) -> Result<()> {
        if self.ssid == PLACEHOLDER_SSID {
            return Err(BoardError::unconfigured(Field::Ssid));
        }
        if self.password == PLACEHOLDER_PASSWORD {
            return Err(BoardError::unconfigured(Field::Password));
        }
        if self.host == PLACEHOLDER_HOST {
            return Err(BoardError::unconfigured(Field::Host));
        }

        validate_ssid(self.ssid)?;
        validate_password(self.password)?;
        Host::parse(self.host)?;
        Ok(())
    }

    /// Parsed server host.
    pub fn host(&self) -> Result<Host<'a>> {
        Host::parse(self.host)
    }

    /// Server endpoint on the given port.
    pub fn endpoint(&self, port: u16) -> Result<ServerEndpoint<'a>> {
        Ok(ServerEndpoint::new(self.host()?, port))
    }

    /// One `*` per password character, for logs.
    pub fn masked_password(&self) -> heapless::String<RAW_PSK_HEX_LEN> {
        let mut masked = heapless::String::new();
        for _ in self.password.chars().take(RAW_PSK_HEX_LEN) {
            // capacity equals the take() bound
            let _ = masked.push('*');
        }
        masked
    }

    /// Log the configuration without revealing the password.
    #[cfg(any(feature = "defmt", feature = "usb-logger"))]
    pub fn log_summary(&self) {
        let masked = self.masked_password();
        board_log!(info, "WiFi SSID: {}", self.ssid);
        if self.is_open_network() {
            board_log!(info, "WiFi password: <open network>");
        } else {
            board_log!(info, "WiFi password: {}", masked.as_str());
        }
        board_log!(info, "Server host: {}", self.host);
        if USING_TEMPLATE {
            board_log!(warn, "Built from credentials.example.rs, copy it to credentials.rs");
        }
    }
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("password", &self.masked_password().as_str())
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Credentials<'_> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "Credentials {{ ssid: {=str}, password: {=str}, host: {=str} }}",
            self.ssid,
            self.masked_password().as_str(),
            self.host
        );
    }
}

fn value_of<'t>(text: &'t str, key: &str) -> Option<&'t str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| unquote(v.trim()))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

fn validate_ssid(ssid: &str) -> Result<()> {
    if ssid.is_empty() {
        return Err(BoardError::empty_ssid());
    }
    if ssid.len() > MAX_SSID_LEN {
        return Err(BoardError::ssid_too_long());
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Ok(());
    }
    if !password.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return Err(BoardError::password_invalid());
    }
    if password.len() < MIN_PASSPHRASE_LEN {
        return Err(BoardError::password_too_short());
    }
    if password.len() == RAW_PSK_HEX_LEN && password.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(());
    }
    if password.len() > MAX_PASSPHRASE_LEN {
        return Err(BoardError::password_too_long());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CredentialsError;

    fn err_of(creds: Credentials<'_>) -> BoardError {
        creds.validate().unwrap_err()
    }

    #[test]
    fn test_valid_credentials() {
        let creds = Credentials::new("HomeNet", "secret123", "192.168.1.23");
        assert!(creds.validate().is_ok());
        assert!(!creds.is_open_network());
    }

    #[test]
    fn test_open_network() {
        let creds = Credentials::new("CafeWifi", "", "ingest.lan");
        assert!(creds.validate().is_ok());
        assert!(creds.is_open_network());
        assert_eq!(creds.masked_password().as_str(), "");
    }

    #[test]
    fn test_placeholders_rejected_in_field_order() {
        let template = Credentials::new(PLACEHOLDER_SSID, PLACEHOLDER_PASSWORD, PLACEHOLDER_HOST);
        let err = err_of(template);
        assert_eq!(err.field(), Field::Ssid);
        let BoardError::Credentials(e) = err else {
            panic!("expected credentials error");
        };
        assert!(e.is_unconfigured());

        let err = err_of(Credentials::new("HomeNet", PLACEHOLDER_PASSWORD, PLACEHOLDER_HOST));
        assert_eq!(err.field(), Field::Password);

        let err = err_of(Credentials::new("HomeNet", "secret123", PLACEHOLDER_HOST));
        assert_eq!(err.field(), Field::Host);
    }

    #[test]
    fn test_ssid_length() {
        let err = err_of(Credentials::new("", "secret123", "10.0.0.1"));
        assert_eq!(err.field(), Field::Ssid);
        let BoardError::Credentials(e) = err else {
            panic!("expected credentials error");
        };
        assert!(e.is_empty_ssid());

        let long = "s".repeat(MAX_SSID_LEN + 1);
        let BoardError::Credentials(e) = err_of(Credentials::new(&long, "secret123", "10.0.0.1")) else {
            panic!("expected credentials error");
        };
        assert!(e.is_ssid_too_long());
        assert!(e.is_bad_length());

        let max = "s".repeat(MAX_SSID_LEN);
        assert!(Credentials::new(&max, "secret123", "10.0.0.1").validate().is_ok());
    }

    fn password_error(pw: &str) -> CredentialsError {
        match err_of(Credentials::new("HomeNet", pw, "10.0.0.1")) {
            BoardError::Credentials(e) => e,
            BoardError::Host(_) => panic!("expected credentials error for {pw:?}"),
        }
    }

    #[test]
    fn test_password_rules() {
        let check = |pw: &str| Credentials::new("HomeNet", pw, "10.0.0.1").validate();

        assert!(check("12345678").is_ok());
        assert!(check(&"p".repeat(MAX_PASSPHRASE_LEN)).is_ok());
        assert!(check(&"a1".repeat(RAW_PSK_HEX_LEN / 2)).is_ok());
        assert!(check(&"A1".repeat(RAW_PSK_HEX_LEN / 2)).is_ok());
    }

    #[test]
    fn test_password_too_short() {
        for pw in ["short", "1234567"] {
            let e = password_error(pw);
            assert!(e.is_password_too_short(), "{pw}");
            assert_eq!(e.field(), Field::Password);
        }
    }

    #[test]
    fn test_password_too_long() {
        let e = password_error(&"p".repeat(MAX_PASSPHRASE_LEN + 1));
        assert!(e.is_password_too_long());

        // 64 printable characters that are not all hex digits
        let e = password_error(&"z1".repeat(RAW_PSK_HEX_LEN / 2));
        assert!(e.is_password_too_long());

        let e = password_error(&"a".repeat(RAW_PSK_HEX_LEN + 2));
        assert!(e.is_password_too_long());
    }

    #[test]
    fn test_password_invalid_characters() {
        // checked before length, so short inputs still report the character problem
        for pw in ["pass\tword1", "pässwörd", "tab\t", "new\nline123"] {
            let e = password_error(pw);
            assert!(e.is_password_invalid(), "{pw:?}");
            assert!(!e.is_bad_length(), "{pw:?}");
        }
    }

    #[test]
    fn test_bad_host_reported_as_host() {
        let err = err_of(Credentials::new("HomeNet", "secret123", "not a host"));
        assert!(matches!(err, BoardError::Host(_)));
        assert_eq!(err.field(), Field::Host);
    }

    #[test]
    fn test_parse() {
        let text = "
            # board 3, living room
            WIFI_SSID = HomeNet
            WIFI_PASSWORD=pa=ss word
            SERVER_HOST=192.168.1.23

            WIFI_SSID=Ignored
        ";
        let creds = Credentials::parse(text).unwrap();
        assert_eq!(creds.ssid(), "HomeNet");
        assert_eq!(creds.password(), "pa=ss word");
        assert_eq!(creds.host_str(), "192.168.1.23");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_parse_strips_quotes() {
        let text = "WIFI_SSID=\"Home Net\"\nWIFI_PASSWORD=' secret123 '\nSERVER_HOST=\"ingest.lan'\n";
        let creds = Credentials::parse(text).unwrap();
        assert_eq!(creds.ssid(), "Home Net");
        assert_eq!(creds.password(), " secret123 ");
        // mismatched quotes are kept as written
        assert_eq!(creds.host_str(), "\"ingest.lan'");
    }

    #[test]
    fn test_parse_empty_quoted_value() {
        let creds = Credentials::parse("WIFI_SSID=Cafe\nWIFI_PASSWORD=\"\"\nSERVER_HOST=10.0.0.1\n").unwrap();
        assert!(creds.is_open_network());
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_parse_missing_key() {
        let err = Credentials::parse("WIFI_SSID=HomeNet\nSERVER_HOST=10.0.0.1\n").unwrap_err();
        assert_eq!(err.field(), Field::Password);
        let BoardError::Credentials(e) = err else {
            panic!("expected credentials error");
        };
        assert!(e.is_missing_key());
    }

    #[test]
    fn test_parse_skips_commented_keys() {
        let err = Credentials::parse("WIFI_SSID=a\nWIFI_PASSWORD=\n# SERVER_HOST=10.0.0.1\n").unwrap_err();
        assert_eq!(err.field(), Field::Host);
    }

    #[test]
    fn test_endpoint() {
        let creds = Credentials::new("HomeNet", "secret123", "ingest.lan");
        let ep = creds.endpoint(crate::net::DEFAULT_SERVER_PORT).unwrap();
        assert_eq!(ep.host, Host::Name("ingest.lan"));
        assert_eq!(ep.port, 8010);
    }

    #[test]
    fn test_debug_masks_password() {
        let creds = Credentials::new("HomeNet", "secret123", "10.0.0.1");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("HomeNet"));
        assert!(dbg.contains("*********"));
        assert!(!dbg.contains("secret123"));
    }

    #[test]
    fn test_built_in_matches_constants() {
        assert_eq!(Credentials::BUILT_IN.ssid(), SSID);
        assert_eq!(Credentials::BUILT_IN.password(), PASSWORD);
        assert_eq!(Credentials::BUILT_IN.host_str(), HOST);
    }
}
