//! Minting identifiers for resource IRIs.

use anyhow::Result;
use arkr_id::{resource_iri_to_ark_id, resource_iri_to_ark_url};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::output::print_value;

use super::CommandContext;

#[derive(Debug, Args)]
pub struct MintArgs {
    /// Resource IRI (`http://rdfh.ch/<project>/<resource>`).
    resource_iri: String,

    /// Value UUID, to address a value of the resource.
    #[arg(long)]
    value_id: Option<String>,

    /// Version timestamp (`YYYYMMDD` or `YYYYMMDDThhmmss[fraction]Z`).
    #[arg(long)]
    timestamp: Option<String>,

    /// Print the full ARK URL instead of the bare ARK ID.
    #[arg(long)]
    url: bool,
}

#[derive(Debug, Serialize)]
struct Minted<'a> {
    resource_iri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<&'a str>,
    ark: &'a str,
}

pub fn mint(ctx: &CommandContext, args: MintArgs) -> Result<()> {
    let settings = ctx.settings()?;
    let value_id = args.value_id.as_deref();
    let timestamp = args.timestamp.as_deref();

    let ark = if args.url {
        resource_iri_to_ark_url(&settings, &args.resource_iri, value_id, timestamp)?
    } else {
        resource_iri_to_ark_id(&settings, &args.resource_iri, value_id, timestamp)?
    };
    debug!(resource_iri = %args.resource_iri, ark = %ark, "Minted ARK identifier");

    let out = Minted {
        resource_iri: &args.resource_iri,
        value_id,
        timestamp,
        ark: &ark,
    };
    print_value(&ark, &out, ctx.format);
    Ok(())
}
