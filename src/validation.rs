use crate::error::LinkError;
use url::Url;

pub const MIN_CODE_LENGTH: usize = 6;
pub const MAX_CODE_LENGTH: usize = 8;
pub const MAX_URL_LENGTH: usize = 2048;

/// Accepts absolute `http`/`https` URLs with a host.
///
/// The input is only inspected, never normalized; callers store the string
/// they were given.
pub fn validate_url(text: &str) -> Result<(), LinkError> {
    if text.is_empty() || text.len() > MAX_URL_LENGTH || text.chars().any(char::is_control) {
        return Err(LinkError::InvalidUrl);
    }
    let url = Url::parse(text).map_err(|_| LinkError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(LinkError::InvalidUrl),
    }
}

pub fn validate_code(code: &str) -> Result<(), LinkError> {
    let length_ok = (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len());
    if length_ok && code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(LinkError::InvalidCode)
    }
}

/// Treats an empty custom code as "none requested".
pub fn requested_code(code: Option<&str>) -> Option<&str> {
    code.filter(|code| !code.is_empty())
}
