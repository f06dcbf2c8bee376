//! Check digit commands.
//!
//! These commands need no registry.

use anyhow::Result;
use arkr_id::check_digit::{calculate_check_digit, is_valid};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::output::{print_json, print_value, OutputFormat};

use super::CommandContext;

/// Check digit commands.
#[derive(Debug, Args)]
pub struct CheckDigitCommand {
    #[command(subcommand)]
    command: CheckDigitSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckDigitSubcommand {
    /// Print a code with its check digit appended.
    Calculate {
        /// Base64url code without a check digit.
        code: String,
    },

    /// Check that a code ends in a correct check digit.
    Validate {
        /// Base64url code including its check digit.
        code: String,
    },
}

impl CheckDigitCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        match self.command {
            CheckDigitSubcommand::Calculate { code } => calculate(ctx.format, &code),
            CheckDigitSubcommand::Validate { code } => validate(ctx.format, &code),
        }
    }
}

fn calculate(format: OutputFormat, code: &str) -> Result<()> {
    let digit = calculate_check_digit(code)?;
    let checked = format!("{code}{digit}");

    let out = serde_json::json!({
        "code": code,
        "check_digit": digit.to_string(),
        "checked": checked,
    });
    print_value(&checked, &out, format);
    Ok(())
}

fn validate(format: OutputFormat, code: &str) -> Result<()> {
    let valid = is_valid(code);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "code": code, "valid": valid });
            print_json(&out);
        }
        OutputFormat::Text if valid => println!("{} {code}", "Valid:".green().bold()),
        OutputFormat::Text => println!("{} {code}", "Invalid:".red().bold()),
    }

    if !valid {
        anyhow::bail!("Check digit validation failed for {code}");
    }
    Ok(())
}
