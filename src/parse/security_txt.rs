//! security.txt discovery (RFC 9116).

use std::time::Duration;

use log::debug;
use url::Url;

use crate::config::AUXILIARY_REQUEST_TIMEOUT_SECS;
use crate::models::SecurityTxt;

/// Locations probed, in order.
pub const SECURITY_TXT_PATHS: &[&str] = &["/.well-known/security.txt", "/security.txt"];

/// Probes the origin of `page_url` for a security.txt file.
///
/// The first location answering 2xx wins. Returns `Err` only when every probe
/// failed at the transport level, so the caller can tell "absent" from
/// "unknown".
pub async fn probe_security_txt(
    client: &reqwest::Client,
    page_url: &Url,
) -> Result<SecurityTxt, reqwest::Error> {
    let mut last_error = None;
    let mut any_response = false;

    for path in SECURITY_TXT_PATHS {
        let Ok(candidate) = page_url.join(path) else {
            continue;
        };
        let response = client
            .get(candidate.as_str())
            .timeout(Duration::from_secs(AUXILIARY_REQUEST_TIMEOUT_SECS))
            .send()
            .await;
        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!("security.txt found at {candidate}");
                return Ok(SecurityTxt {
                    present: true,
                    location: Some(candidate.into()),
                });
            }
            Ok(resp) => {
                debug!("No security.txt at {candidate} (status {})", resp.status());
                any_response = true;
            }
            Err(e) => {
                debug!("security.txt probe of {candidate} failed: {e}");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !any_response => Err(e),
        _ => Ok(SecurityTxt::default()),
    }
}
