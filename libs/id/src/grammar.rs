//! Grammar for the two ARK dialects.
//!
//! Matching only classifies and splits the input. Check digits, version
//! numbers, and registry flags are checked by [`crate::ArkInfo::parse`].
//!
//! ```text
//! V1: ark:/NAAN/VERSION[/PROJECT[/RESOURCE[/VALUE][.TIMESTAMP]]]
//! V0: ark:/NAAN/PROJECT-TOKEN-ARTIFACT[.DATE]
//! ```

/// Literal scheme prefix of every ARK identifier.
pub const ARK_PREFIX: &str = "ark:/";

/// Raw pieces of an identifier that matched the V1 grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V1Match<'a> {
    /// Dialect version digits.
    pub version: &'a str,
    pub project_id: Option<&'a str>,
    /// Escaped resource UUID including its check digit.
    pub resource: Option<&'a str>,
    /// Escaped value UUID including its check digit.
    pub value: Option<&'a str>,
    pub timestamp: Option<&'a str>,
}

/// Raw pieces of an identifier that matched the V0 grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V0Match<'a> {
    pub project_id: &'a str,
    pub resource_token: &'a str,
    /// Trailing checksum artifact of the legacy system; not validated further.
    pub artifact: &'a str,
    pub date: Option<&'a str>,
}

/// Result of matching an identifier against both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarMatch<'a> {
    V1(V1Match<'a>),
    V0(V0Match<'a>),
}

/// Matches `input` against the V1 grammar, then the V0 grammar.
///
/// Returns `None` if neither matches.
#[must_use]
pub fn classify<'a>(naan: &str, input: &'a str) -> Option<GrammarMatch<'a>> {
    let path = input
        .strip_prefix(ARK_PREFIX)?
        .strip_prefix(naan)?
        .strip_prefix('/')?;

    match_v1(path)
        .map(GrammarMatch::V1)
        .or_else(|| match_v0(path).map(GrammarMatch::V0))
}

fn match_v1(path: &str) -> Option<V1Match<'_>> {
    let (version, rest) = match path.split_once('/') {
        Some((version, rest)) => (version, Some(rest)),
        None => (path, None),
    };
    if !is_digits(version) {
        return None;
    }

    let mut matched = V1Match {
        version,
        project_id: None,
        resource: None,
        value: None,
        timestamp: None,
    };
    let Some(rest) = rest else {
        return Some(matched);
    };

    let (project_id, rest) = match rest.split_once('/') {
        Some((project_id, rest)) => (project_id, Some(rest)),
        None => (rest, None),
    };
    if !is_project_id(project_id) {
        return None;
    }
    matched.project_id = Some(project_id);
    let Some(rest) = rest else {
        return Some(matched);
    };

    let (segments, timestamp) = match rest.split_once('.') {
        Some((segments, timestamp)) => (segments, Some(timestamp)),
        None => (rest, None),
    };
    if let Some(timestamp) = timestamp {
        if !is_timestamp(timestamp) {
            return None;
        }
    }
    matched.timestamp = timestamp;

    let (resource, value) = match segments.split_once('/') {
        Some((resource, value)) => (resource, Some(value)),
        None => (segments, None),
    };
    if !is_escaped_uuid(resource) {
        return None;
    }
    matched.resource = Some(resource);
    if let Some(value) = value {
        if !is_escaped_uuid(value) {
            return None;
        }
        matched.value = Some(value);
    }

    Some(matched)
}

fn match_v0(path: &str) -> Option<V0Match<'_>> {
    let (body, date) = match path.split_once('.') {
        Some((body, date)) => (body, Some(date)),
        None => (path, None),
    };
    if let Some(date) = date {
        if !(6..=8).contains(&date.len()) || !is_digits(date) {
            return None;
        }
    }

    let mut parts = body.splitn(3, '-');
    let project_id = parts.next()?;
    let resource_token = parts.next()?;
    let artifact = parts.next()?;

    let alphanumeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric());
    if !is_project_id(project_id) || !alphanumeric(resource_token) || !alphanumeric(artifact) {
        return None;
    }

    Some(V0Match {
        project_id,
        resource_token,
        artifact,
        date,
    })
}

/// Returns true for exactly four hexadecimal digits, in either case.
#[must_use]
pub fn is_project_id(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Returns true for `YYYYMMDD` or `YYYYMMDDThhmmss[fraction]Z`
/// (6 to 13 digits after the `T`).
#[must_use]
pub fn is_timestamp(s: &str) -> bool {
    if s.len() == 8 {
        return is_digits(s);
    }
    let Some(date) = s.get(..8) else {
        return false;
    };
    let Some(time) = s.get(8..).and_then(|t| t.strip_prefix('T')) else {
        return false;
    };
    let Some(time) = time.strip_suffix('Z') else {
        return false;
    };
    is_digits(date) && (6..=13).contains(&time.len()) && is_digits(time)
}

fn is_escaped_uuid(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'=')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
