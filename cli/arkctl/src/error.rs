//! Error handling and display for the CLI.

use arkr_id::{ArkError, ErrorKind};
use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read registry {path}: {source}")]
    RegistryRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry {path}: {source}")]
    RegistryParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported value for '{key}' in [{section}]: expected a string, boolean, or number")]
    UnsupportedValue { section: String, key: String },

    #[error(transparent)]
    Ark(#[from] ArkError),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let ark_error = err.downcast_ref::<ArkError>().or_else(|| {
        err.downcast_ref::<CliError>().and_then(|cli_err| match cli_err {
            CliError::Ark(ark_err) => Some(ark_err),
            _ => None,
        })
    });

    if let Some(hint) = ark_error.and_then(hint) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
        return;
    }

    if let Some(CliError::RegistryParse { .. } | CliError::UnsupportedValue { .. }) =
        err.downcast_ref::<CliError>()
    {
        eprintln!(
            "\n{}",
            "Hint: The registry needs a [defaults] table and one [projects.<id>] table per project."
                .yellow()
        );
    }
}

fn hint(err: &ArkError) -> Option<&'static str> {
    if err.is_configuration_error() {
        return Some("Check the registry (--registry / ARK_REGISTRY).");
    }
    if err.is_syntax_error() {
        return Some(match err.kind() {
            ErrorKind::InvalidCheckDigit => "The identifier was probably mistyped or truncated.",
            _ => "ARK IDs look like ark:/<NAAN>/1/<project>/<resource>. Check --naan (ARK_NAAN).",
        });
    }

    match err.kind() {
        ErrorKind::VersionMismatch => {
            Some("Check --dialect-version (ARK_DIALECT_VERSION) against the identifier.")
        }
        ErrorKind::UnknownProject | ErrorKind::VersionZeroNotAllowed => {
            Some("Check the project's section in the registry (--registry / ARK_REGISTRY).")
        }
        ErrorKind::ResourceRequired => {
            Some("Resource IRIs exist for resources only; use `ark redirect` for projects.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_kind() {
        let err = ArkError::UnknownProject {
            project_id: "0001".to_string(),
        };
        assert!(hint(&err).unwrap().contains("registry"));

        let err = ArkError::DegenerateCode {
            code: "AAAA".to_string(),
        };
        assert_eq!(hint(&err), None);
    }

    #[test]
    fn test_hints_for_syntax_and_registry_errors() {
        let err = ArkError::InvalidCheckDigit {
            input: "ark:/00000/1/0001/abc".to_string(),
        };
        assert!(hint(&err).unwrap().contains("mistyped"));

        let err = ArkError::MalformedIdentifier {
            input: "ark:/nope".to_string(),
        };
        assert!(hint(&err).unwrap().contains("ARK_NAAN"));

        let err = ArkError::MissingPlaceholder {
            template: "http://$host".to_string(),
            placeholder: "host".to_string(),
        };
        assert_eq!(hint(&err), Some("Check the registry (--registry / ARK_REGISTRY)."));

        let err = ArkError::ResourceRequired {
            input: "ark:/00000/1/0001".to_string(),
        };
        assert!(hint(&err).unwrap().contains("ark redirect"));
    }

    #[test]
    fn test_ark_errors_pass_through() {
        let err = CliError::from(ArkError::ProjectRequired {
            input: "ark:/00000/1".to_string(),
        });
        assert_eq!(err.to_string(), "Project ID is required: ark:/00000/1");
    }
}
