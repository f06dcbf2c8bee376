//! Error types for ARK parsing, validation, and formatting.

use thiserror::Error;

/// Errors that can occur when parsing, validating, or rendering ARK identifiers.
///
/// Every variant is a rejected input: none of them indicate a system fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArkError {
    /// The input matches neither the V1 nor the V0 grammar.
    #[error("Invalid ARK ID: {input}")]
    MalformedIdentifier { input: String },

    /// A V1-shaped identifier carries a dialect version other than the current one.
    #[error(
        "Invalid ARK ID {input}. The version of the ARK ID ({found}) doesn't match the version defined in the settings ({expected})."
    )]
    VersionMismatch {
        input: String,
        found: String,
        expected: u32,
    },

    /// A well-formed V0 identifier whose project disables the legacy dialect.
    #[error("Invalid ARK ID (version 0 not allowed): {input}")]
    VersionZeroNotAllowed { input: String },

    /// A UUID-bearing segment failed check digit validation.
    #[error("Invalid ARK ID (wrong check digit): {input}")]
    InvalidCheckDigit { input: String },

    /// A legacy redirect needed a hexadecimal resource ID and did not get one.
    #[error("Invalid resource ID: {resource_id}")]
    InvalidResourceId { resource_id: String },

    /// A resource address did not have the `scheme://host/project/resource` shape.
    #[error("Invalid resource IRI: {address}")]
    InvalidResourceAddress { address: String },

    /// The project has no entry in the registry.
    #[error("Unknown project: {project_id}")]
    UnknownProject { project_id: String },

    /// The identifier has no project segment but the operation needs one.
    #[error("Project ID is required: {input}")]
    ProjectRequired { input: String },

    /// The identifier has no resource segment but the operation needs one.
    #[error("Resource ID is required: {input}")]
    ResourceRequired { input: String },

    /// Check digit calculation over a code whose weighted sum is zero.
    #[error("Invalid code: {code}")]
    DegenerateCode { code: String },

    /// Check digit calculation over a code containing a non-alphabet symbol.
    #[error("Invalid base64url character '{character}' in code: {code}")]
    InvalidCharacter { character: char, code: String },

    /// A registry key required for the operation is not configured.
    #[error("Missing setting '{key}' for {scope}")]
    MissingSetting { scope: String, key: &'static str },

    /// A registry value could not be interpreted (e.g. a non-boolean flag).
    #[error("Invalid value for setting '{key}' in {scope}: {value}")]
    InvalidSetting {
        scope: String,
        key: &'static str,
        value: String,
    },

    /// A template references a placeholder that has no value.
    #[error("Template '{template}' references unknown placeholder '{placeholder}'")]
    MissingPlaceholder {
        template: String,
        placeholder: String,
    },

    /// Global settings failed validation at construction time.
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },
}

/// Fieldless classification of [`ArkError`], for mapping to response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedIdentifier,
    VersionMismatch,
    VersionZeroNotAllowed,
    InvalidCheckDigit,
    InvalidResourceId,
    InvalidResourceAddress,
    UnknownProject,
    ProjectRequired,
    ResourceRequired,
    DegenerateCode,
    InvalidCharacter,
    Configuration,
}

impl ArkError {
    pub(crate) fn malformed(input: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            input: input.into(),
        }
    }

    pub(crate) fn unknown_project(project_id: impl Into<String>) -> Self {
        Self::UnknownProject {
            project_id: project_id.into(),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedIdentifier { .. } => ErrorKind::MalformedIdentifier,
            Self::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            Self::VersionZeroNotAllowed { .. } => ErrorKind::VersionZeroNotAllowed,
            Self::InvalidCheckDigit { .. } => ErrorKind::InvalidCheckDigit,
            Self::InvalidResourceId { .. } => ErrorKind::InvalidResourceId,
            Self::InvalidResourceAddress { .. } => ErrorKind::InvalidResourceAddress,
            Self::UnknownProject { .. } => ErrorKind::UnknownProject,
            Self::ProjectRequired { .. } => ErrorKind::ProjectRequired,
            Self::ResourceRequired { .. } => ErrorKind::ResourceRequired,
            Self::DegenerateCode { .. } => ErrorKind::DegenerateCode,
            Self::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
            Self::MissingSetting { .. }
            | Self::InvalidSetting { .. }
            | Self::MissingPlaceholder { .. }
            | Self::InvalidSettings { .. } => ErrorKind::Configuration,
        }
    }

    /// Returns true if the identifier text itself was rejected by the grammar
    /// or by check digit validation.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            ArkError::MalformedIdentifier { .. } | ArkError::InvalidCheckDigit { .. }
        )
    }

    /// Returns true if the error stems from the registry or its templates
    /// rather than from the caller's input.
    pub fn is_configuration_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

/// Result alias used throughout the crate.
pub type ArkResult<T> = Result<T, ArkError>;
