//! URL hash parsing and formatting.
//!
//! The hash is the only persisted navigation handle:
//! - `#/<slug>` on unversioned sites
//! - `#/<version>/<slug>` (or `#/<version>`) on versioned sites

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped inside a hash segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Navigation target parsed from a URL hash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    /// Requested version (versioned sites only).
    pub version: Option<String>,
    /// Requested page slug.
    pub slug: Option<String>,
}

impl Route {
    /// Route to a slug on an unversioned site.
    #[must_use]
    pub fn page(slug: impl Into<String>) -> Self {
        Self {
            version: None,
            slug: Some(slug.into()),
        }
    }

    /// Route to a slug of a version.
    #[must_use]
    pub fn versioned(version: impl Into<String>, slug: Option<String>) -> Self {
        Self {
            version: Some(version.into()),
            slug,
        }
    }

    /// Parse a URL hash.
    ///
    /// A leading `#` and `/` are optional. Empty segments mean "absent".
    #[must_use]
    pub fn parse(hash: &str, versioned: bool) -> Self {
        let rest = hash.strip_prefix('#').unwrap_or(hash);
        let rest = rest.strip_prefix('/').unwrap_or(rest);

        if versioned {
            let (version, slug) = rest.split_once('/').unwrap_or((rest, ""));
            Self {
                version: non_empty(version),
                slug: non_empty(slug.trim_end_matches('/')),
            }
        } else {
            Self {
                version: None,
                slug: non_empty(rest.trim_end_matches('/')),
            }
        }
    }

    /// Format as a URL hash, including the leading `#/`.
    #[must_use]
    pub fn to_hash(&self) -> String {
        let mut hash = String::from("#/");
        if let Some(version) = &self.version {
            hash.extend(utf8_percent_encode(version, SEGMENT));
            if self.slug.is_some() {
                hash.push('/');
            }
        }
        if let Some(slug) = &self.slug {
            hash.extend(utf8_percent_encode(slug, SEGMENT));
        }
        hash
    }
}

/// Percent-decode a segment, mapping empty to `None`.
fn non_empty(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    let decoded: Cow<'_, str> = percent_decode_str(segment).decode_utf8_lossy();
    Some(decoded.into_owned())
}
