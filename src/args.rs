use crate::grafeas::Severity;
use clap::{builder::PossibleValuesParser, ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use strum::VariantNames;

#[derive(Debug, Parser)]
pub struct Args {
    /// Turn debugging information on
    #[arg(short, long, global = true, action(ArgAction::Count))]
    pub verbose: u8,
    /// Less verbose output
    #[arg(short, long, global = true, action(ArgAction::Count))]
    pub quiet: u8,
    #[command(subcommand)]
    pub subcommand: SubCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// Convert a trivy report into grafeas notes and occurrences
    Vuln(Vuln),
    /// List the package ecosystems recognized for lang-pkgs results
    SupportedEcosystems,
}

#[derive(Debug, Parser)]
pub struct Vuln {
    /// Path to the trivy json report
    pub file: PathBuf,
    /// Registry uri of the scanned image (eg. us-docker.pkg.dev/project/repo/image@sha256:...)
    #[arg(short, long)]
    pub source: String,
    /// Project id used in note resource names
    #[arg(short, long)]
    pub project: String,
    /// Filter only for notes of specific severities
    #[arg(
        short,
        long = "filter",
        value_parser(PossibleValuesParser::new(Severity::VARIANTS))
    )]
    pub filters: Vec<String>,
}
