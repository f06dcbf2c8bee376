//! Rendering parsed identifiers into redirect URLs and resource IRIs, and
//! minting identifiers from resource IRIs.

use crate::error::{ArkError, ArkResult};
use crate::grammar::{is_project_id, is_timestamp, ARK_PREFIX};
use crate::info::{ArkInfo, Dialect};
use crate::legacy::{legacy_resource_number, legacy_resource_uuid};
use crate::segment::add_check_digit_and_escape;
use crate::settings::{ProjectConfig, SettingKey, Settings};
use crate::template::{encode_component, TemplateValues};

/// Returns the URL a client resolving `info` should be redirected to.
///
/// The top-level identifier redirects to `TopLevelObjectUrl`. Projects with
/// `UsePhp` set redirect to the legacy system, all others to the current one.
pub fn to_redirect_url(info: &ArkInfo, settings: &Settings) -> ArkResult<String> {
    let Some(project_id) = info.project_id() else {
        return settings.top_level_object_url().map(str::to_string);
    };
    let project = settings.get_project_config(project_id)?;

    if project.uses_legacy_system()? {
        legacy_redirect_url(info, settings, project)
    } else {
        current_redirect_url(info, settings, project)
    }
}

/// Renders the canonical resource IRI of `info` from `DSPResourceIri`.
///
/// For V0 identifiers the legacy token is first mapped to its migrated ID.
pub fn to_resource_iri(info: &ArkInfo, settings: &Settings) -> ArkResult<String> {
    let project_id = info.project_id().ok_or_else(|| ArkError::ProjectRequired {
        input: format!(
            "{ARK_PREFIX}{}/{}",
            settings.naan(),
            settings.dialect_version()
        ),
    })?;
    let project = settings.get_project_config(project_id)?;
    if info.is_project_level() {
        return Err(ArkError::ResourceRequired {
            input: format!(
                "{ARK_PREFIX}{}/{}/{project_id}",
                settings.naan(),
                settings.dialect_version()
            ),
        });
    }

    let mut values = template_values(info, settings, project);
    if info.is_v0() {
        if let Some(token) = info.resource_id() {
            values.insert("resource_id", legacy_resource_uuid(token));
        }
    }
    values.render(project.require(SettingKey::ResourceIri)?)
}

/// Re-mints `info` as a current-dialect ARK ID.
///
/// V0 dates are carried over as midnight timestamps.
pub fn convert_to_v1(info: &ArkInfo, settings: &Settings) -> ArkResult<String> {
    let resource_iri = to_resource_iri(info, settings)?;
    let timestamp = info.version_timestamp();
    resource_iri_to_ark_id(settings, &resource_iri, info.value_id(), timestamp.as_deref())
}

/// Splits a resource IRI of the form `scheme://host/PROJECT/RESOURCE` into
/// its project and resource IDs.
pub fn parse_resource_address(address: &str) -> ArkResult<(&str, &str)> {
    let invalid = || ArkError::InvalidResourceAddress {
        address: address.to_string(),
    };

    let (scheme, rest) = address.split_once("://").ok_or_else(invalid)?;
    if scheme.is_empty() || !scheme.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    let mut parts = rest.split('/');
    let (Some(host), Some(project_id), Some(resource_id), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let is_resource_id = |s: &str| {
        !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    };
    if host.is_empty() || !is_project_id(project_id) || !is_resource_id(resource_id) {
        return Err(invalid());
    }
    Ok((project_id, resource_id))
}

/// Mints `ark:/NAAN/VERSION/PROJECT/RESOURCE[/VALUE][.TIMESTAMP]` for a
/// resource IRI.
pub fn resource_iri_to_ark_id(
    settings: &Settings,
    resource_iri: &str,
    value_id: Option<&str>,
    timestamp: Option<&str>,
) -> ArkResult<String> {
    let (project_id, resource_id) = parse_resource_address(resource_iri)?;

    let mut ark_id = format!(
        "{ARK_PREFIX}{}/{}/{project_id}/{}",
        settings.naan(),
        settings.dialect_version(),
        add_check_digit_and_escape(resource_id)?,
    );
    if let Some(value_id) = value_id {
        ark_id.push('/');
        ark_id.push_str(&add_check_digit_and_escape(value_id)?);
    }
    if let Some(timestamp) = timestamp.filter(|ts| !ts.is_empty()) {
        if !is_timestamp(timestamp) {
            return Err(ArkError::malformed(format!("{ark_id}.{timestamp}")));
        }
        ark_id.push('.');
        ark_id.push_str(timestamp);
    }
    Ok(ark_id)
}

/// Like [`resource_iri_to_ark_id`], prefixed with the external host.
///
/// The scheme is `https` when the HTTPS proxy flag is set, `http` otherwise.
pub fn resource_iri_to_ark_url(
    settings: &Settings,
    resource_iri: &str,
    value_id: Option<&str>,
    timestamp: Option<&str>,
) -> ArkResult<String> {
    let ark_id = resource_iri_to_ark_id(settings, resource_iri, value_id, timestamp)?;
    let scheme = if settings.use_https() { "https" } else { "http" };
    Ok(format!("{scheme}://{}/{ark_id}", settings.external_host()))
}

fn template_values(info: &ArkInfo, settings: &Settings, project: ProjectConfig<'_>) -> TemplateValues {
    let url_version = match info.dialect() {
        Dialect::V0 => 0,
        Dialect::V1 => settings.dialect_version(),
    };

    let mut values = TemplateValues::new();
    values.insert("url_version", url_version.to_string());
    values.insert_opt("project_id", info.project_id());
    values.insert_opt("resource_id", info.resource_id());
    values.insert_opt("value_id", info.value_id());
    values.insert_opt("timestamp", info.timestamp());
    values.insert_opt("host", project.get(SettingKey::Host));
    values.insert_opt("project_host", project.get(SettingKey::ProjectHost));
    values
}

fn legacy_redirect_url(
    info: &ArkInfo,
    settings: &Settings,
    project: ProjectConfig<'_>,
) -> ArkResult<String> {
    let mut values = template_values(info, settings, project);

    let Some(resource_id) = info.resource_id() else {
        return values.render(project.require(SettingKey::ProjectRedirectUrl)?);
    };
    values.insert(
        "resource_int_id",
        legacy_resource_number(resource_id)?.to_string(),
    );

    let key = match info.timestamp() {
        None => SettingKey::LegacyResourceRedirectUrl,
        Some(timestamp) => {
            // The legacy system only understands YYYYMMDD.
            values.insert("timestamp", timestamp.get(..8).unwrap_or(timestamp));
            SettingKey::LegacyResourceVersionRedirectUrl
        }
    };
    values.render(project.require(key)?)
}

fn current_redirect_url(
    info: &ArkInfo,
    settings: &Settings,
    project: ProjectConfig<'_>,
) -> ArkResult<String> {
    let key = match (info.resource_id(), info.value_id(), info.has_timestamp()) {
        (None, _, _) => SettingKey::ProjectRedirectUrl,
        (Some(_), None, false) => SettingKey::ResourceRedirectUrl,
        (Some(_), None, true) => SettingKey::ResourceVersionRedirectUrl,
        (Some(_), Some(_), false) => SettingKey::ValueRedirectUrl,
        (Some(_), Some(_), true) => SettingKey::ValueVersionRedirectUrl,
    };
    let template = project.require(key)?;

    let mut values = template_values(info, settings, project);
    if info.is_v0() && info.resource_id().is_some() {
        let resource_iri = to_resource_iri(info, settings)?;
        let migrated = resource_iri.rsplit('/').next().unwrap_or(&resource_iri);
        values.insert("resource_id", migrated);
    }

    // Redirect templates embed whole IRIs as single path components.
    if info.resource_id().is_some() {
        if let Some(iri_template) = project.get(SettingKey::ResourceIri) {
            let resource_iri = values.render(iri_template)?;
            values.insert("resource_iri", encode_component(&resource_iri));
        }
    }
    if let Some(iri_template) = project.get(SettingKey::ProjectIri) {
        let project_iri = values.render(iri_template)?;
        values.insert("project_iri", encode_component(&project_iri));
    }

    values.render(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn settings() -> Settings {
        Settings::builder("00000", "ark.example.org")
            .defaults([
                ("TopLevelObjectUrl", "http://dasch.swiss"),
                ("Host", "app.dasch.swiss"),
                ("ProjectHost", "meta.dasch.swiss"),
                ("DSPResourceIri", "http://rdfh.ch/$project_id/$resource_id"),
                ("DSPProjectIri", "http://rdfh.ch/projects/$project_id"),
                ("DSPProjectRedirectUrl", "http://$project_host/projects/$project_id"),
                ("DSPResourceRedirectUrl", "http://$host/resource/$resource_iri"),
                (
                    "DSPResourceVersionRedirectUrl",
                    "http://$host/resource/$resource_iri?version=$timestamp",
                ),
                ("DSPValueRedirectUrl", "http://$host/value/$project_iri/$value_id"),
                (
                    "DSPValueVersionRedirectUrl",
                    "http://$host/value/$project_iri/$value_id?version=$timestamp",
                ),
                ("PhpResourceRedirectUrl", "http://$host/resources/$resource_int_id"),
                (
                    "PhpResourceVersionRedirectUrl",
                    "http://$host/resources/$resource_int_id?citdate=$timestamp",
                ),
            ])
            .project("0001", [("UsePhp", "false")])
            .project("0803", [("UsePhp", "true"), ("AllowVersion0", "true")])
            .project("0002", [("AllowVersion0", "true")])
            .project("0009", [("DSPResourceRedirectUrl", "http://$host/$unknown")])
            .build()
            .unwrap()
    }

    fn parse(settings: &Settings, input: &str) -> ArkInfo {
        ArkInfo::parse(settings, input).unwrap()
    }

    #[test]
    fn test_redirect_encodes_resource_iri() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn");
        assert_eq!(
            to_redirect_url(&info, &settings).unwrap(),
            "http://app.dasch.swiss/resource/http%3A%2F%2Frdfh.ch%2F0001%2Fcmfk1DMHRBiR4-_6HXpEFA"
        );

        let info = parse(&settings, "ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn.20180604T085622Z");
        assert!(to_redirect_url(&info, &settings)
            .unwrap()
            .ends_with("?version=20180604T085622Z"));
    }

    #[test]
    fn test_redirect_encodes_project_iri() {
        let settings = settings();
        let info = parse(
            &settings,
            "ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn/pLlW4ODASumZfZFbJdpw1gu",
        );
        assert_eq!(
            to_redirect_url(&info, &settings).unwrap(),
            "http://app.dasch.swiss/value/http%3A%2F%2Frdfh.ch%2Fprojects%2F0001/pLlW4ODASumZfZFbJdpw1g"
        );
    }

    #[test]
    fn test_redirect_top_level_and_project() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1");
        assert_eq!(to_redirect_url(&info, &settings).unwrap(), "http://dasch.swiss");

        let info = parse(&settings, "ark:/00000/1/0001");
        assert_eq!(
            to_redirect_url(&info, &settings).unwrap(),
            "http://meta.dasch.swiss/projects/0001"
        );
    }

    #[test]
    fn test_redirect_unknown_project() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1/00ff");
        assert_eq!(
            to_redirect_url(&info, &settings),
            Err(ArkError::UnknownProject {
                project_id: "00ff".to_string()
            })
        );
    }

    #[test]
    fn test_redirect_missing_placeholder() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1/0009/cmfk1DMHRBiR4=_6HXpEFAn");
        assert!(matches!(
            to_redirect_url(&info, &settings),
            Err(ArkError::MissingPlaceholder { placeholder, .. }) if placeholder == "unknown"
        ));
    }

    #[test]
    fn test_legacy_redirect() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1/0803/751e0b8am.20190118T102919Z");
        assert_eq!(
            to_redirect_url(&info, &settings).unwrap(),
            "http://app.dasch.swiss/resources/1?citdate=20190118"
        );

        let info = parse(&settings, "ark:/00000/0803-779b9990a0c3f-6e");
        assert_eq!(
            to_redirect_url(&info, &settings).unwrap(),
            "http://app.dasch.swiss/resources/2141746"
        );
    }

    #[test]
    fn test_legacy_redirect_requires_hex_resource() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1/0803/cmfk1DMHRBiR4=_6HXpEFAn");
        assert_eq!(
            to_redirect_url(&info, &settings),
            Err(ArkError::InvalidResourceId {
                resource_id: "cmfk1DMHRBiR4-_6HXpEFA".to_string()
            })
        );
    }

    #[test]
    fn test_v0_redirect_uses_migrated_id() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/0002-779b9990a0c3f-6e");
        assert_eq!(
            to_redirect_url(&info, &settings).unwrap(),
            "http://app.dasch.swiss/resource/http%3A%2F%2Frdfh.ch%2F0002%2FEf9heHjPWDS7dMR_gGax2Q"
        );
    }

    #[test]
    fn test_resource_iri() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/0002-751e0b8a-6.2021519");
        assert_eq!(
            to_resource_iri(&info, &settings).unwrap(),
            "http://rdfh.ch/0002/70aWaB2kWsuiN6ujYgM0ZQ"
        );

        let info = parse(&settings, "ark:/00000/1");
        assert_eq!(
            to_resource_iri(&info, &settings),
            Err(ArkError::ProjectRequired {
                input: "ark:/00000/1".to_string()
            })
        );
    }

    #[test]
    fn test_resource_iri_needs_a_resource() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/1/0001");
        let err = to_resource_iri(&info, &settings).unwrap_err();
        assert_eq!(
            err,
            ArkError::ResourceRequired {
                input: "ark:/00000/1/0001".to_string()
            }
        );
        assert!(!err.is_configuration_error());
        assert_eq!(
            convert_to_v1(&info, &settings).unwrap_err().kind(),
            ErrorKind::ResourceRequired
        );
    }

    #[test]
    fn test_convert_to_v1() {
        let settings = settings();
        let info = parse(&settings, "ark:/00000/0002-751e0b8a-6.20190129");
        assert_eq!(
            convert_to_v1(&info, &settings).unwrap(),
            "ark:/00000/1/0002/70aWaB2kWsuiN6ujYgM0ZQD.20190129T000000Z"
        );

        let info = parse(&settings, "ark:/00000/0002-779b9990a0c3f-6e");
        assert_eq!(
            convert_to_v1(&info, &settings).unwrap(),
            "ark:/00000/1/0002/Ef9heHjPWDS7dMR_gGax2Q0"
        );
    }

    #[test]
    fn test_parse_resource_address() {
        assert_eq!(
            parse_resource_address("http://rdfh.ch/0001/cmfk1DMHRBiR4-_6HXpEFA"),
            Ok(("0001", "cmfk1DMHRBiR4-_6HXpEFA"))
        );
        for address in [
            "rdfh.ch/0001/abc",
            "http://rdfh.ch/0001",
            "http://rdfh.ch/0001/abc/def",
            "http://rdfh.ch/001/abc",
            "http://rdfh.ch/0001/",
            "http://rdfh.ch/0001/a=b",
            "http:///0001/abc",
            "://rdfh.ch/0001/abc",
        ] {
            assert!(
                matches!(
                    parse_resource_address(address),
                    Err(ArkError::InvalidResourceAddress { .. })
                ),
                "{address}"
            );
        }
    }

    #[test]
    fn test_resource_iri_to_ark_url() {
        let settings = settings();
        let iri = "http://rdfh.ch/0001/cmfk1DMHRBiR4-_6HXpEFA";
        assert_eq!(
            resource_iri_to_ark_url(&settings, iri, None, None).unwrap(),
            "https://ark.example.org/ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn"
        );
        assert_eq!(
            resource_iri_to_ark_url(&settings, iri, None, Some("20180604T085622513Z")).unwrap(),
            "https://ark.example.org/ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn.20180604T085622513Z"
        );
        assert_eq!(
            resource_iri_to_ark_id(&settings, iri, Some("pLlW4ODASumZfZFbJdpw1g"), Some("")).unwrap(),
            "ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn/pLlW4ODASumZfZFbJdpw1gu"
        );
    }

    #[test]
    fn test_resource_iri_to_ark_url_plain_http() {
        let settings = Settings::builder("00000", "ark.example.org")
            .https_proxy(false)
            .build()
            .unwrap();
        assert_eq!(
            resource_iri_to_ark_url(&settings, "http://rdfh.ch/0001/cmfk1DMHRBiR4-_6HXpEFA", None, None)
                .unwrap(),
            "http://ark.example.org/ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn"
        );
    }

    #[test]
    fn test_resource_iri_to_ark_id_rejects_bad_timestamp() {
        let settings = settings();
        let result = resource_iri_to_ark_id(
            &settings,
            "http://rdfh.ch/0001/cmfk1DMHRBiR4-_6HXpEFA",
            None,
            Some("2018"),
        );
        assert!(matches!(result, Err(ArkError::MalformedIdentifier { .. })));
    }
}
