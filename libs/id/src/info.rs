//! Parsed ARK identifiers.

use std::fmt;

use serde::Serialize;

use crate::error::{ArkError, ArkResult};
use crate::grammar::{self, GrammarMatch, V0Match, V1Match, ARK_PREFIX};
use crate::segment::unescape_and_validate;
use crate::settings::Settings;

/// Time of day appended to legacy dates to form a full version timestamp.
const MIDNIGHT_SUFFIX: &str = "T000000Z";

/// The two identifier dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dialect {
    /// Legacy fixed-width identifiers: `ark:/NAAN/PROJECT-TOKEN-ARTIFACT`.
    V0,
    /// Hierarchical identifiers: `ark:/NAAN/VERSION/PROJECT/RESOURCE/VALUE`.
    V1,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V0 => f.write_str("v0"),
            Self::V1 => f.write_str("v1"),
        }
    }
}

/// A successfully parsed ARK identifier.
///
/// Only [`ArkInfo::parse`] and [`ArkInfo::parse_url`] construct values.
/// `value_id` implies `resource_id`, and V0 identifiers never carry a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArkInfo {
    dialect: Dialect,
    project_id: Option<String>,
    resource_id: Option<String>,
    value_id: Option<String>,
    timestamp: Option<String>,
}

impl ArkInfo {
    /// Parses an ARK identifier (`ark:/NAAN/...`).
    ///
    /// V1 identifiers must carry the configured dialect version, and their
    /// resource and value segments must pass check digit validation. V0
    /// identifiers are rejected when their project is registered without
    /// `AllowVersion0`; an unregistered project is not an error here.
    pub fn parse(settings: &Settings, input: &str) -> ArkResult<Self> {
        match grammar::classify(settings.naan(), input) {
            Some(GrammarMatch::V1(matched)) => Self::from_v1(settings, input, matched),
            Some(GrammarMatch::V0(matched)) => Self::from_v0(settings, input, matched),
            None => Err(ArkError::malformed(input)),
        }
    }

    /// Parses an ARK URL: `http(s)://<external host>/ark:/...`.
    pub fn parse_url(settings: &Settings, url: &str) -> ArkResult<Self> {
        let path = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .and_then(|rest| rest.strip_prefix(settings.external_host()))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| rest.starts_with(ARK_PREFIX))
            .ok_or_else(|| ArkError::malformed(url))?;

        Self::parse(settings, path).map_err(|err| match err {
            ArkError::MalformedIdentifier { .. } => ArkError::malformed(url),
            other => other,
        })
    }

    fn from_v1(settings: &Settings, input: &str, matched: V1Match<'_>) -> ArkResult<Self> {
        let expected = settings.dialect_version();
        if matched.version.parse::<u32>().ok() != Some(expected) {
            return Err(ArkError::VersionMismatch {
                input: input.to_string(),
                found: matched.version.to_string(),
                expected,
            });
        }

        let resource_id = matched
            .resource
            .map(|segment| unescape_and_validate(input, segment))
            .transpose()?;
        let value_id = matched
            .value
            .map(|segment| unescape_and_validate(input, segment))
            .transpose()?;

        Ok(Self {
            dialect: Dialect::V1,
            project_id: matched.project_id.map(str::to_string),
            resource_id,
            value_id,
            timestamp: matched.timestamp.map(str::to_string),
        })
    }

    fn from_v0(settings: &Settings, input: &str, matched: V0Match<'_>) -> ArkResult<Self> {
        let project_id = matched.project_id.to_ascii_uppercase();

        if let Some(project) = settings.project(&project_id) {
            if !project.allows_version_0()? {
                return Err(ArkError::VersionZeroNotAllowed {
                    input: input.to_string(),
                });
            }
        }

        // Partial legacy dates are ambiguous and dropped.
        let timestamp = matched.date.filter(|date| date.len() >= 8);

        Ok(Self {
            dialect: Dialect::V0,
            project_id: Some(project_id),
            resource_id: Some(matched.resource_token.to_string()),
            value_id: None,
            timestamp: timestamp.map(str::to_string),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_v0(&self) -> bool {
        self.dialect == Dialect::V0
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The bare resource ID: a base64url UUID for V1, the legacy token for V0.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn value_id(&self) -> Option<&str> {
        self.value_id.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Timestamp for a re-minted V1 identifier.
    ///
    /// Legacy dates (`YYYYMMDD`) become midnight UTC of that day.
    pub fn version_timestamp(&self) -> Option<String> {
        let timestamp = self.timestamp.as_deref()?;
        match self.dialect {
            Dialect::V0 => Some(format!("{timestamp}{MIDNIGHT_SUFFIX}")),
            Dialect::V1 => Some(timestamp.to_string()),
        }
    }

    /// `ark:/NAAN/VERSION` with no project.
    pub fn is_top_level(&self) -> bool {
        self.project_id.is_none()
    }

    pub fn is_project_level(&self) -> bool {
        self.project_id.is_some() && self.resource_id.is_none()
    }

    pub fn is_resource_level(&self) -> bool {
        self.resource_id.is_some() && self.value_id.is_none()
    }

    pub fn is_value_level(&self) -> bool {
        self.value_id.is_some()
    }

    pub fn has_timestamp(&self) -> bool {
        self.timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn settings() -> Settings {
        Settings::builder("00000", "ark.example.org")
            .project("0001", [("AllowVersion0", "false")])
            .project("0002", [("AllowVersion0", "true")])
            .project("0003", [("AllowVersion0", "sometimes")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_top_level() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/1").unwrap();
        assert_eq!(info.dialect(), Dialect::V1);
        assert!(info.is_top_level());
        assert!(!info.is_project_level());
        assert_eq!(info.project_id(), None);
    }

    #[test]
    fn test_parse_project() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/1/0003").unwrap();
        assert!(info.is_project_level());
        assert_eq!(info.project_id(), Some("0003"));
        assert_eq!(info.resource_id(), None);
        assert_eq!(info.timestamp(), None);
    }

    #[test]
    fn test_parse_resource_and_value() {
        let info = ArkInfo::parse(
            &settings(),
            "ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn/pLlW4ODASumZfZFbJdpw1gu.20180604T085622Z",
        )
        .unwrap();
        assert!(info.is_value_level());
        assert!(!info.is_resource_level());
        assert_eq!(info.resource_id(), Some("cmfk1DMHRBiR4-_6HXpEFA"));
        assert_eq!(info.value_id(), Some("pLlW4ODASumZfZFbJdpw1g"));
        assert_eq!(info.timestamp(), Some("20180604T085622Z"));
        assert_eq!(info.version_timestamp().as_deref(), Some("20180604T085622Z"));
    }

    #[test]
    fn test_parse_keeps_v1_project_spelling() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/1/080e").unwrap();
        assert_eq!(info.project_id(), Some("080e"));
    }

    #[test]
    fn test_parse_wrong_check_digit() {
        let result = ArkInfo::parse(&settings(), "ark:/00000/1/0001/cmfk1DMHRBir4=_6HXpEFAn");
        assert_eq!(
            result,
            Err(ArkError::InvalidCheckDigit {
                input: "ark:/00000/1/0001/cmfk1DMHRBir4=_6HXpEFAn".to_string()
            })
        );
    }

    #[test]
    fn test_parse_wrong_value_check_digit() {
        let result = ArkInfo::parse(
            &settings(),
            "ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn/pLlW4ODASumZfZFbJdpw1gv",
        );
        assert!(matches!(result, Err(ArkError::InvalidCheckDigit { .. })));
    }

    #[test]
    fn test_parse_version_mismatch() {
        let err = ArkInfo::parse(&settings(), "ark:/00000/2/0001").unwrap_err();
        assert_eq!(
            err,
            ArkError::VersionMismatch {
                input: "ark:/00000/2/0001".to_string(),
                found: "2".to_string(),
                expected: 1,
            }
        );

        let err = ArkInfo::parse(&settings(), "ark:/00000/99999999999999999999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VersionMismatch);
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["", "ark:/00000", "ark:/12345/1", "http://example.org", "ark:/00000/1/0001/a-b"] {
            assert_eq!(
                ArkInfo::parse(&settings(), input),
                Err(ArkError::malformed(input)),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_v0() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/0002-779b9990a0c3f-6e.20190129").unwrap();
        assert!(info.is_v0());
        assert!(info.is_resource_level());
        assert_eq!(info.project_id(), Some("0002"));
        assert_eq!(info.resource_id(), Some("779b9990a0c3f"));
        assert_eq!(info.value_id(), None);
        assert_eq!(info.timestamp(), Some("20190129"));
        assert_eq!(info.version_timestamp().as_deref(), Some("20190129T000000Z"));
    }

    #[test]
    fn test_parse_v0_uppercases_project() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/080e-76bb2132d30d6-0").unwrap();
        assert_eq!(info.project_id(), Some("080E"));
    }

    #[test]
    fn test_parse_v0_drops_short_date() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/0002-751e0b8a-6.2021519").unwrap();
        assert_eq!(info.timestamp(), None);
        assert_eq!(info.version_timestamp(), None);
    }

    #[test]
    fn test_parse_v0_gated_by_project() {
        let settings = settings();
        assert_eq!(
            ArkInfo::parse(&settings, "ark:/00000/0001-751e0b8a-6"),
            Err(ArkError::VersionZeroNotAllowed {
                input: "ark:/00000/0001-751e0b8a-6".to_string()
            })
        );
        assert!(matches!(
            ArkInfo::parse(&settings, "ark:/00000/0003-751e0b8a-6"),
            Err(ArkError::InvalidSetting { key: "AllowVersion0", .. })
        ));
        // Unregistered projects still parse.
        let info = ArkInfo::parse(&settings, "ark:/00000/00ff-751e0b8a-6").unwrap();
        assert_eq!(info.project_id(), Some("00FF"));
    }

    #[test]
    fn test_parse_url() {
        let settings = settings();
        let info = ArkInfo::parse_url(
            &settings,
            "https://ark.example.org/ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn",
        )
        .unwrap();
        assert_eq!(info.resource_id(), Some("cmfk1DMHRBiR4-_6HXpEFA"));

        let info = ArkInfo::parse_url(&settings, "http://ark.example.org/ark:/00000/1").unwrap();
        assert!(info.is_top_level());

        for url in [
            "https://other.example.org/ark:/00000/1",
            "ftp://ark.example.org/ark:/00000/1",
            "https://ark.example.org/ark:/00000/x",
            "ark:/00000/1",
        ] {
            assert_eq!(
                ArkInfo::parse_url(&settings, url),
                Err(ArkError::malformed(url)),
                "{url}"
            );
        }
    }

    #[test]
    fn test_serialize() {
        let info = ArkInfo::parse(&settings(), "ark:/00000/1/0003").unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["dialect"], "V1");
        assert_eq!(json["project_id"], "0003");
        assert!(json["resource_id"].is_null());
    }
}
