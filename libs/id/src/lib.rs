//! # arkr-id
//!
//! ARK identifier parsing, validation, and formatting for the resolver.
//!
//! ## Identifier Formats
//!
//! Two dialects share the `ark:/NAAN/` prefix:
//!
//! - V1: `ark:/00000/1/0001/cmfk1DMHRBiR4=_6HXpEFAn/pLlW4ODASumZfZFbJdpw1gu.20180604T085622Z`
//!   (version, project, resource, value, timestamp; every segment after the
//!   project is optional, in that order)
//! - V0: `ark:/00000/080E-76bb2132d30d6-0.20190129`
//!   (legacy fixed-width identifiers, accepted per project)
//!
//! Resource and value IDs are base64url UUIDs carrying a trailing check
//! digit, with `-` written as `=`.
//!
//! ## Design Principles
//!
//! - Every operation is a pure function of its inputs; nothing here logs or
//!   performs I/O
//! - [`Settings`] are immutable; reloads swap whole values via [`SharedSettings`]
//! - All failures are rejected inputs reported as [`ArkError`]
//!
//! ## Example
//!
//! ```
//! use arkr_id::{to_redirect_url, ArkInfo, Settings};
//!
//! let settings = Settings::builder("00000", "ark.example.org")
//!     .default_value("TopLevelObjectUrl", "http://dasch.swiss")
//!     .build()
//!     .unwrap();
//!
//! let info = ArkInfo::parse(&settings, "ark:/00000/1").unwrap();
//! assert_eq!(to_redirect_url(&info, &settings).unwrap(), "http://dasch.swiss");
//! ```

pub mod check_digit;
mod error;
mod formatter;
pub mod grammar;
mod info;
mod legacy;
mod macros;
mod segment;
mod settings;
mod shared;
mod template;

pub use error::{ArkError, ArkResult, ErrorKind};
pub use formatter::{
    convert_to_v1, parse_resource_address, resource_iri_to_ark_id, resource_iri_to_ark_url,
    to_redirect_url, to_resource_iri,
};
pub use info::{ArkInfo, Dialect};
pub use legacy::{legacy_resource_number, legacy_resource_uuid, migration_namespace};
pub use segment::{add_check_digit_and_escape, unescape_and_validate, ESCAPE};
pub use settings::{
    parse_flag, ProjectConfig, Section, SettingKey, Settings, SettingsBuilder,
    DEFAULT_DIALECT_VERSION,
};
pub use shared::SharedSettings;
pub use template::{encode_component, TemplateValues};
