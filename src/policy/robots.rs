//! robots.txt evaluation.
//!
//! Parsing and matching are done by `texting_robots`, which compiles the group
//! for one user agent (falling back to `*`), picks the longest matching rule,
//! lets Allow win ties and percent-normalizes both patterns and URLs. A
//! `RobotsPolicy` is that compiled robot for our product token plus the host it
//! was read from.

use std::fmt;
use std::time::Duration;

use log::warn;
use texting_robots::Robot;
use url::Url;

/// Parsed robots.txt of one origin, compiled for one user agent.
///
/// Never mutated after parsing; a re-fetch produces a new value.
pub struct RobotsPolicy {
    domain: String,
    /// `None` when the file had no usable content for us
    robot: Option<Robot>,
}

impl fmt::Debug for RobotsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotsPolicy")
            .field("domain", &self.domain)
            .field("has_rules", &self.robot.is_some())
            .field("crawl_delay", &self.crawl_delay())
            .finish()
    }
}

impl RobotsPolicy {
    /// A policy with no rules (used when robots.txt does not exist).
    pub fn allow_all(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            robot: None,
        }
    }

    /// Compiles robots.txt `content` for `user_agent`.
    ///
    /// Content the parser rejects outright is treated as having no rules.
    pub fn parse(domain: &str, user_agent: &str, content: &[u8]) -> Self {
        let robot = match Robot::new(user_agent, content) {
            Ok(robot) => Some(robot),
            Err(e) => {
                warn!("Unparseable robots.txt for {domain}, treating as no rules: {e}");
                None
            }
        };
        Self {
            domain: domain.to_string(),
            robot,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `Crawl-delay` of the group that applies to us, if any.
    pub fn crawl_delay(&self) -> Option<Duration> {
        let secs = self.robot.as_ref()?.delay?;
        Duration::try_from_secs_f32(secs).ok()
    }

    /// Whether `url` (absolute, or a path with optional query) may be fetched.
    pub fn allows(&self, url: &str) -> bool {
        if is_robots_txt(url) {
            return true;
        }
        match &self.robot {
            Some(robot) => robot.allowed(url),
            None => true,
        }
    }
}

fn is_robots_txt(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path() == "/robots.txt",
        Err(_) => url == "/robots.txt",
    }
}
