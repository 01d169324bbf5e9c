// src/crawl/link.rs
// =============================================================================
// This module turns raw href strings into canonical, absolute links.
//
// How it works:
// 1. Parse the href as a URL; relative hrefs are joined onto the domain root
// 2. Drop the fragment (#section) so one page maps to one link
// 3. Strip exactly one trailing slash from the assembled string
// 4. Reject links we never want to record (the root, tel:, mailto:, .pdf, .mp3)
//
// The domain root is plain HTTP when the domain carries an explicit port
// (local test servers), HTTPS otherwise.
//
// Rust concepts:
// - Newtypes: RawLink and NormalizedLink are both strings underneath, but the
//   compiler keeps them apart so an unresolved href never lands in the
//   visited set
// - thiserror: derives Display and Error for our error enums
// =============================================================================

use std::fmt;

use thiserror::Error;
use url::{ParseError, Url};

/// An href exactly as it appeared in the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawLink(String);

impl RawLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawLink {
    fn from(href: &str) -> Self {
        Self(href.to_owned())
    }
}

impl From<String> for RawLink {
    fn from(href: String) -> Self {
        Self(href)
    }
}

impl fmt::Display for RawLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An absolute, canonical link. Only this module can build one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedLink(String);

impl NormalizedLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain is empty")]
    Empty,

    #[error("invalid domain '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: ParseError,
    },

    #[error("domain '{0}' must be a bare host, optionally with a port")]
    NotAHost(String),
}

/// Why a raw href was not accepted.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The href is not a valid URI reference
    #[error("failed to parse link {raw}: {source}")]
    Parse {
        raw: String,
        #[source]
        source: ParseError,
    },

    /// The bare domain root, which is where the crawl starts anyway
    #[error("skip host link: {0}")]
    HostRoot(NormalizedLink),

    /// tel: and mailto: links
    #[error("skip non-http link: {0}")]
    NonHttpScheme(NormalizedLink),

    /// .pdf and .mp3 downloads
    #[error("skip asset link: {0}")]
    UnsupportedAsset(NormalizedLink),
}

impl NormalizeError {
    // Filtering is expected behaviour; only parse failures are worth a warning
    pub fn is_filtered(&self) -> bool {
        !matches!(self, NormalizeError::Parse { .. })
    }
}

/// The host (and optional port) a crawl run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    // host[:port] as the url crate serializes it (lowercase, default port dropped)
    authority: String,
    // scheme://authority/ - relative hrefs are joined onto this
    root: Url,
}

impl Domain {
    // Accepts "example.com", "https://example.com/" or "127.0.0.1:8080"
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');

        if host.is_empty() {
            return Err(DomainError::Empty);
        }

        let scheme = if host.contains(':') { "http" } else { "https" };
        let root = Url::parse(&format!("{}://{}/", scheme, host)).map_err(|source| {
            DomainError::Invalid {
                input: input.to_owned(),
                source,
            }
        })?;

        if root.path() != "/" || root.query().is_some() || root.fragment().is_some() {
            return Err(DomainError::NotAHost(input.to_owned()));
        }

        let host_str = root
            .host_str()
            .ok_or_else(|| DomainError::NotAHost(input.to_owned()))?;
        let authority = match root.port() {
            Some(port) => format!("{}:{}", host_str, port),
            None => host_str.to_owned(),
        };

        Ok(Self { authority, root })
    }

    pub fn as_str(&self) -> &str {
        &self.authority
    }

    // The crawl's entry point: "/" resolved against the domain, never rejected
    pub fn start_link(&self) -> NormalizedLink {
        let root = self.root.as_str();
        NormalizedLink(root.strip_suffix('/').unwrap_or(root).to_owned())
    }

    /// True when the link points at this domain, over either scheme.
    pub fn owns(&self, link: &NormalizedLink) -> bool {
        self.rest_after_authority(link)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    }

    fn is_root(&self, link: &NormalizedLink) -> bool {
        self.rest_after_authority(link)
            .is_some_and(|rest| rest.is_empty())
    }

    fn rest_after_authority<'a>(&self, link: &'a NormalizedLink) -> Option<&'a str> {
        ["https://", "http://"].into_iter().find_map(|scheme| {
            link.as_str()
                .strip_prefix(scheme)?
                .strip_prefix(self.authority.as_str())
        })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority)
    }
}

// Resolves an href against the domain and applies the rejection rules.
//
// Examples (domain = "example.com"):
//   "/docs/"                    -> Ok("https://example.com/docs")
//   "https://other.org/a#top"   -> Ok("https://other.org/a")
//   "#mainContent"              -> Err(HostRoot)
//   "mailto:hi@example.com"     -> Err(NonHttpScheme)
//   "/brochure.pdf"             -> Err(UnsupportedAsset)
pub fn normalize(raw: &RawLink, domain: &Domain) -> Result<NormalizedLink, NormalizeError> {
    let link = resolve(raw, domain)?;

    if domain.is_root(&link) {
        return Err(NormalizeError::HostRoot(link));
    }

    if link.as_str().starts_with("tel:") || link.as_str().starts_with("mailto:") {
        return Err(NormalizeError::NonHttpScheme(link));
    }

    if link.as_str().ends_with(".pdf") || link.as_str().ends_with(".mp3") {
        return Err(NormalizeError::UnsupportedAsset(link));
    }

    Ok(link)
}

fn resolve(raw: &RawLink, domain: &Domain) -> Result<NormalizedLink, NormalizeError> {
    let parse_failure = |source| NormalizeError::Parse {
        raw: raw.as_str().to_owned(),
        source,
    };

    // Hrefs without a scheme come back as RelativeUrlWithoutBase; joining them
    // onto the root fills in the scheme and host in one step
    let mut url = match Url::parse(raw.as_str()) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            domain.root.join(raw.as_str()).map_err(parse_failure)?
        }
        Err(source) => return Err(parse_failure(source)),
    };
    url.set_fragment(None);

    let mut link = String::from(url);
    if link.ends_with('/') {
        link.pop();
    }

    Ok(NormalizedLink(link))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does Url::parse fail on "/docs"?
//    - Url only represents absolute URLs, so a relative href returns
//      ParseError::RelativeUrlWithoutBase
//    - root.join("/docs") resolves it the way a browser would
//
// 2. What is a newtype?
//    - A struct with a single field, like NormalizedLink(String)
//    - The field is private, so other modules cannot build one by hand
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(input: &str) -> Domain {
        Domain::parse(input).unwrap()
    }

    fn norm(href: &str, on: &str) -> Result<NormalizedLink, NormalizeError> {
        normalize(&RawLink::from(href), &domain(on))
    }

    fn accepted(href: &str, on: &str) -> String {
        norm(href, on).unwrap().as_str().to_owned()
    }

    #[test]
    fn test_relative_link_gets_https_and_host() {
        assert_eq!(accepted("/link1", "example.com"), "https://example.com/link1");
        assert_eq!(accepted("about", "example.com"), "https://example.com/about");
    }

    #[test]
    fn test_domain_with_port_uses_http() {
        assert_eq!(
            accepted("/link1", "127.0.0.1:8080"),
            "http://127.0.0.1:8080/link1"
        );
    }

    #[test]
    fn test_absolute_link_keeps_its_scheme_and_host() {
        assert_eq!(accepted("http://other.org/x", "example.com"), "http://other.org/x");
        assert_eq!(
            accepted("//cdn.example.net/lib", "example.com"),
            "https://cdn.example.net/lib"
        );
    }

    #[test]
    fn test_strips_one_trailing_slash() {
        assert_eq!(accepted("/docs/", "example.com"), "https://example.com/docs");
        assert_eq!(
            accepted("https://example.com/legal/privacy-notice/", "example.com"),
            "https://example.com/legal/privacy-notice"
        );
    }

    #[test]
    fn test_equivalent_hrefs_normalize_identically() {
        let forms = [
            "/features/travel",
            "/features/travel/",
            "/features/travel#what-is-the-european-economic-area",
            "https://example.com/features/travel",
            "https://EXAMPLE.com/features/travel/",
        ];
        for href in forms {
            assert_eq!(
                accepted(href, "example.com"),
                "https://example.com/features/travel",
                "href {href}"
            );
        }
    }

    #[test]
    fn test_query_is_kept() {
        assert_eq!(
            accepted("/search?q=rust", "example.com"),
            "https://example.com/search?q=rust"
        );
    }

    #[test]
    fn test_rejects_domain_root() {
        for href in ["/", "", "#", "#mainContent", "https://example.com/", "http://example.com"] {
            assert!(
                matches!(norm(href, "example.com"), Err(NormalizeError::HostRoot(_))),
                "href {href:?}"
            );
        }
        assert!(matches!(
            norm("/", "127.0.0.1:8080"),
            Err(NormalizeError::HostRoot(_))
        ));
    }

    #[test]
    fn test_rejects_tel_and_mailto() {
        assert!(matches!(
            norm("mailto:help@example.com", "example.com"),
            Err(NormalizeError::NonHttpScheme(_))
        ));
        assert!(matches!(
            norm("tel:+442038720620", "example.com"),
            Err(NormalizeError::NonHttpScheme(_))
        ));
    }

    #[test]
    fn test_rejects_pdf_and_mp3() {
        assert!(matches!(
            norm("/files/terms.pdf", "example.com"),
            Err(NormalizeError::UnsupportedAsset(_))
        ));
        assert!(matches!(
            norm("https://podcasts.example.net/episode-1.mp3", "example.com"),
            Err(NormalizeError::UnsupportedAsset(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_href() {
        let err = norm("http://[::1", "example.com").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse { .. }));
        assert!(!err.is_filtered());
    }

    #[test]
    fn test_filtered_errors_are_not_parse_failures() {
        assert!(norm("/", "example.com").unwrap_err().is_filtered());
        assert!(norm("mailto:a@b.c", "example.com").unwrap_err().is_filtered());
    }

    #[test]
    fn test_domain_parse_strips_scheme_and_slash() {
        let parsed = domain("https://Example.com/");
        assert_eq!(parsed.as_str(), "example.com");
        assert_eq!(parsed.start_link().as_str(), "https://example.com");

        let local = domain("http://127.0.0.1:8080");
        assert_eq!(local.as_str(), "127.0.0.1:8080");
        assert_eq!(local.start_link().as_str(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_domain_parse_errors() {
        assert!(matches!(Domain::parse("  "), Err(DomainError::Empty)));
        assert!(matches!(
            Domain::parse("example.com/blog"),
            Err(DomainError::NotAHost(_))
        ));
        assert!(matches!(
            Domain::parse("exa mple.com"),
            Err(DomainError::Invalid { .. })
        ));
    }

    #[test]
    fn test_owns_matches_host_exactly() {
        let d = domain("example.com");
        assert!(d.owns(&accepted_link("/a", &d)));
        assert!(d.owns(&accepted_link("http://example.com/b?x=1", &d)));
        assert!(!d.owns(&accepted_link("https://example.com.evil.org/a", &d)));
        assert!(!d.owns(&accepted_link("https://other.org/a", &d)));
    }

    fn accepted_link(href: &str, d: &Domain) -> NormalizedLink {
        normalize(&RawLink::from(href), d).unwrap()
    }
}
