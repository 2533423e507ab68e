/// Site enable/disable matching for Page Clipper
use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

/// Schemes that belong to the browser itself. Capture never applies there.
const INTERNAL_SCHEMES: &[&str] = &[
    "about",
    "chrome",
    "chrome-extension",
    "chrome-search",
    "chrome-untrusted",
    "devtools",
    "edge",
    "moz-extension",
    "view-source",
];

/// Whether capture is active for a hostname
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteState {
    Enabled,
    Disabled,
}

impl SiteState {
    pub fn is_enabled(self) -> bool {
        self == SiteState::Enabled
    }
}

/// Hostnames the user switched capture off for.
///
/// Entries are exact hostnames. A stored `github.com` also covers
/// `gist.github.com` because matching walks the hostname's suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisabledDomains(BTreeSet<String>);

impl DisabledDomains {
    pub fn new() -> Self {
        DisabledDomains(BTreeSet::new())
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.0.contains(hostname)
    }

    /// Flip the state of the hostname of `url`.
    ///
    /// Returns the new state, or `None` when the URL has no usable hostname.
    pub fn toggle(&mut self, url: &str) -> Option<SiteState> {
        let hostname = toggleable_hostname(url)?;

        let matched = hostname_suffixes(&hostname)
            .into_iter()
            .find(|suffix| self.0.contains(suffix));

        match matched {
            Some(entry) => {
                // Enabling drops whichever entry covered this host, even an ancestor
                debug!("Enabling {} (removing {})", hostname, entry);
                self.0.remove(&entry);
                Some(SiteState::Enabled)
            }
            None => {
                debug!("Disabling {}", hostname);
                self.0.insert(hostname);
                Some(SiteState::Disabled)
            }
        }
    }
}

impl<S: Into<String>> FromIterator<S> for DisabledDomains {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        DisabledDomains(iter.into_iter().map(Into::into).collect())
    }
}

/// Decide whether capture is suppressed on `url`.
///
/// - Unparsable URLs (or URLs without a host) are treated as enabled
/// - Browser-internal pages are always disabled
/// - Otherwise any suffix of at least two labels found in `disabled` disables the page
pub fn is_disabled(url: &str, disabled: &DisabledDomains) -> bool {
    let parsed = match Url::parse(url.trim()) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if is_internal_scheme(parsed.scheme()) {
        return true;
    }

    match host_of(&parsed) {
        Some(hostname) => hostname_suffixes(hostname)
            .iter()
            .any(|suffix| disabled.contains(suffix)),
        None => false,
    }
}

/// Toggle the hostname of `url` in `disabled`, returning the updated set.
///
/// The state is `None` when nothing changed (unparsable or internal URL).
pub fn toggle(url: &str, mut disabled: DisabledDomains) -> (DisabledDomains, Option<SiteState>) {
    let state = disabled.toggle(url);
    (disabled, state)
}

/// Current state of the hostname of `url`
pub fn site_state(url: &str, disabled: &DisabledDomains) -> SiteState {
    if is_disabled(url, disabled) {
        SiteState::Disabled
    } else {
        SiteState::Enabled
    }
}

/// List the dot-joined suffixes of `hostname` that have at least two labels,
/// most specific first.
///
/// Examples:
/// - gist.github.com → ["gist.github.com", "github.com"]
/// - github.com → ["github.com"]
/// - localhost → []
pub fn hostname_suffixes(hostname: &str) -> Vec<String> {
    let labels: Vec<&str> = hostname.split('.').collect();

    if labels.len() < 2 {
        return Vec::new();
    }

    (0..=labels.len() - 2)
        .map(|start| labels[start..].join("."))
        .collect()
}

/// Extract the hostname a toggle applies to
fn toggleable_hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    if is_internal_scheme(parsed.scheme()) {
        return None;
    }

    let hostname = host_of(&parsed)?.to_string();

    // A single-label host can never match, so disabling it would stick forever
    if hostname_suffixes(&hostname).is_empty() {
        return None;
    }

    Some(hostname)
}

/// Hostname without the DNS root dot, so `github.com.` and `github.com` are one host
fn host_of(parsed: &Url) -> Option<&str> {
    parsed
        .host_str()
        .map(|host| host.trim_end_matches('.'))
        .filter(|host| !host.is_empty())
}

fn is_internal_scheme(scheme: &str) -> bool {
    INTERNAL_SCHEMES.contains(&scheme)
}
