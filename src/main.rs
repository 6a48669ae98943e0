use clap::Parser;
use env_logger::Env;
use strum::VariantNames;
use tokio::fs;
use trivy2grafeas::args::{Args, SubCommand};
use trivy2grafeas::convert::{self, ScanTarget};
use trivy2grafeas::errors::*;
use trivy2grafeas::grafeas::PackageType;
use trivy2grafeas::trivy::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet > 0 {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            _ => "debug",
        }
    };
    env_logger::init_from_env(Env::default().default_filter_or(log_level));

    match args.subcommand {
        SubCommand::Vuln(vuln) => {
            info!("Converting {:?}", vuln.file);

            let buf = fs::read(&vuln.file)
                .await
                .with_context(|| anyhow!("Failed to read report: {:?}", vuln.file))?;
            let report = serde_json::from_slice::<Report>(&buf)
                .context("Failed to parse report as trivy json")?;

            let target = ScanTarget {
                uri: vuln.source,
                project: vuln.project,
            };
            let mut list = convert::convert(&target, &report)?;

            if !vuln.filters.is_empty() {
                list.retain(|_, entry| vuln.filters.contains(&entry.note.severity.to_string()));
            }

            debug!("Converted {} notes", list.len());
            let json = serde_json::to_string_pretty(&list)?;
            println!("{}", json);
        }
        SubCommand::SupportedEcosystems => {
            for ecosystem in PackageType::VARIANTS {
                println!("{}", ecosystem);
            }
        }
    }

    Ok(())
}
