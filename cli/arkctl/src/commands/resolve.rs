//! Commands that resolve existing identifiers.

use anyhow::Result;
use arkr_id::grammar::ARK_PREFIX;
use arkr_id::{
    convert_to_v1, to_redirect_url, to_resource_iri, ArkError, ArkInfo, ArkResult, Settings,
};
use clap::Args;
use serde::Serialize;
use tracing::{debug, warn};

use crate::output::{print_fields, print_value};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// ARK ID (`ark:/...`) or ARK URL.
    ark: String,
}

#[derive(Debug, Args)]
pub struct RedirectArgs {
    /// ARK ID (`ark:/...`) or ARK URL.
    ark: String,
}

#[derive(Debug, Args)]
pub struct ResourceIriArgs {
    /// ARK ID (`ark:/...`) or ARK URL.
    ark: String,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// ARK ID (`ark:/...`) or ARK URL, usually a legacy one.
    ark: String,
}

#[derive(Debug, Serialize)]
struct Resolved<'a> {
    ark: &'a str,
    level: &'static str,
    #[serde(flatten)]
    info: &'a ArkInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    registered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_iri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted: Option<&'a str>,
}

impl<'a> Resolved<'a> {
    fn new(ark: &'a str, info: &'a ArkInfo) -> Self {
        Self {
            ark,
            level: level(info),
            info,
            registered: None,
            redirect_url: None,
            resource_iri: None,
            converted: None,
        }
    }
}

/// What the identifier addresses.
fn level(info: &ArkInfo) -> &'static str {
    if info.is_top_level() {
        "top"
    } else if info.is_project_level() {
        "project"
    } else if info.is_resource_level() {
        "resource"
    } else {
        "value"
    }
}

/// Parses an ARK ID, or an ARK URL if it lacks the `ark:/` prefix.
fn parse_input(settings: &Settings, input: &str) -> ArkResult<ArkInfo> {
    let result = if input.starts_with(ARK_PREFIX) {
        ArkInfo::parse(settings, input)
    } else {
        ArkInfo::parse_url(settings, input)
    };

    match &result {
        Ok(info) => debug!(
            ark_id = %input,
            project_id = ?info.project_id(),
            dialect = %info.dialect(),
            "Parsed ARK identifier"
        ),
        Err(e) => warn!(ark_id = %input, error = %e, "Rejected ARK identifier"),
    }
    result
}

fn reject(input: &str, err: ArkError) -> anyhow::Error {
    warn!(ark_id = %input, error = %err, kind = ?err.kind(), "Resolution failed");
    err.into()
}

pub fn parse(ctx: &CommandContext, args: ParseArgs) -> Result<()> {
    let settings = ctx.settings()?;
    let info = parse_input(&settings, &args.ark)?;

    let registered = info.project_id().map(|id| settings.has_project(id));
    let out = Resolved {
        registered,
        ..Resolved::new(&args.ark, &info)
    };

    let dialect = info.dialect().to_string();
    let registered_text = registered.map(|r| if r { "yes" } else { "no" });
    let fields = [
        ("dialect", Some(dialect.as_str())),
        ("level", Some(out.level)),
        ("project_id", info.project_id()),
        ("registered", registered_text),
        ("resource_id", info.resource_id()),
        ("value_id", info.value_id()),
        ("timestamp", info.timestamp()),
    ];
    print_fields(&fields, &out, ctx.format);
    Ok(())
}

pub fn redirect(ctx: &CommandContext, args: RedirectArgs) -> Result<()> {
    let settings = ctx.settings()?;
    let info = parse_input(&settings, &args.ark)?;
    let url = to_redirect_url(&info, &settings).map_err(|e| reject(&args.ark, e))?;
    debug!(ark_id = %args.ark, redirect_url = %url, "Resolved redirect");

    let out = Resolved {
        redirect_url: Some(url.as_str()),
        ..Resolved::new(&args.ark, &info)
    };
    print_value(&url, &out, ctx.format);
    Ok(())
}

pub fn resource_iri(ctx: &CommandContext, args: ResourceIriArgs) -> Result<()> {
    let settings = ctx.settings()?;
    let info = parse_input(&settings, &args.ark)?;
    let iri = to_resource_iri(&info, &settings).map_err(|e| reject(&args.ark, e))?;

    let out = Resolved {
        resource_iri: Some(iri.as_str()),
        ..Resolved::new(&args.ark, &info)
    };
    print_value(&iri, &out, ctx.format);
    Ok(())
}

pub fn convert(ctx: &CommandContext, args: ConvertArgs) -> Result<()> {
    let settings = ctx.settings()?;
    let info = parse_input(&settings, &args.ark)?;
    let converted = convert_to_v1(&info, &settings).map_err(|e| reject(&args.ark, e))?;
    debug!(ark_id = %args.ark, converted = %converted, "Converted ARK identifier");

    let out = Resolved {
        converted: Some(converted.as_str()),
        ..Resolved::new(&args.ark, &info)
    };
    print_value(&converted, &out, ctx.format);
    Ok(())
}
