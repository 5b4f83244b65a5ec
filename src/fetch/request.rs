//! Identifying request headers.
//!
//! Every request the scanner makes carries the same header set: a User-Agent
//! naming the product and the operator's contact address, and a `From` header
//! with that address, so a site owner can tell who is scanning and reach them.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, FROM, USER_AGENT};

use crate::config::ScanConfig;
use crate::error_handling::ConfigError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_DEFAULT: &str = "en-US,en;q=0.9";

pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Builds the identifying headers for `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidContactEmail` if the address cannot be sent
    /// as a header value.
    pub(crate) fn identifying(config: &ScanConfig) -> Result<HeaderMap, ConfigError> {
        let invalid = || ConfigError::InvalidContactEmail(config.contact_email.clone());
        let user_agent = HeaderValue::from_str(&config.user_agent()).map_err(|_| invalid())?;
        let from = HeaderValue::from_str(&config.contact_email).map_err(|_| invalid())?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(FROM, from);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_DEFAULT),
        );
        Ok(headers)
    }

    /// Headers the browser does not set on its own (it controls User-Agent
    /// through a launch flag), as `(name, value)` pairs.
    pub(crate) fn browser_extra(config: &ScanConfig) -> Vec<(String, String)> {
        vec![
            ("From".to_string(), config.contact_email.clone()),
            (
                "Accept-Language".to_string(),
                ACCEPT_LANGUAGE_DEFAULT.to_string(),
            ),
        ]
    }
}
