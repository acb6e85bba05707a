use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pkgstage::catalog::RepoCatalog;
use pkgstage::change::Operation;
use pkgstage::cli::{Cli, Commands};
use pkgstage::config::{EngineConfig, DEFAULT_CONFIG_PATH};
use pkgstage::output::Output;
use pkgstage::{GateStatus, Mode, PackageManager, StageError};

fn main() {
    // e.g. RUST_LOG=pkgstage=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        Output::error(format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = EngineConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if cli.dry_run {
        config.dry_run = true;
        Output::dry_run(format!("Using state in {}", config.base_dir().display()));
    }

    let pm = PackageManager::new(&config).context("Failed to open package state")?;

    match cli.command {
        Commands::Add { packages } => cmd_stage(&pm, Operation::Add, &packages),
        Commands::Remove { packages } => cmd_stage(&pm, Operation::Remove, &packages),
        Commands::List => cmd_list(&pm),
        Commands::Unstaged => cmd_unstaged(&pm),
        Commands::Command { upgrade } => cmd_command(&pm, upgrade),
        Commands::Clear => {
            pm.clear_unstaged()?;
            Output::success("Cleared unstaged changes");
            Ok(())
        }
        Commands::Agree => cmd_agree(&pm),
        Commands::Status => cmd_status(&pm),
        Commands::Summary { out } => cmd_summary(&pm, out.as_deref()),
        Commands::Info { package } => cmd_info(&config, &package),
    }
}

fn cmd_stage(pm: &PackageManager, operation: Operation, packages: &[String]) -> Result<()> {
    if !pm.status().is_active() {
        Output::warning("Package manager is disabled; changes will not be applied");
    }

    for package in packages {
        let staged = match operation {
            Operation::Add => pm.stage_add(package),
            Operation::Remove => pm.stage_remove(package),
        };
        match staged {
            Ok(()) => Output::change(operation.symbol(), package),
            Err(StageError::AgreementRequired) => {
                Output::hint("Run `pkgstage agree` to accept the user agreement");
                return Err(StageError::AgreementRequired.into());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to stage '{package}'"));
            }
        }
    }

    Output::success(format!("Staged {} package change(s)", packages.len()));
    Ok(())
}

fn cmd_list(pm: &PackageManager) -> Result<()> {
    Output::subheader("ADDED:");
    for pkg in pm.add_packages()? {
        Output::list_item(pkg);
    }
    Output::subheader("REMOVED:");
    for pkg in pm.remove_packages()? {
        Output::list_item(pkg);
    }
    Ok(())
}

fn cmd_unstaged(pm: &PackageManager) -> Result<()> {
    let unstaged = pm.unstaged()?;
    if unstaged.is_empty() {
        Output::info("No unstaged changes");
        return Ok(());
    }
    for entry in unstaged {
        Output::change(entry.operation.symbol(), entry.name);
    }
    Ok(())
}

fn cmd_command(pm: &PackageManager, upgrade: bool) -> Result<()> {
    let mode = if upgrade { Mode::Upgrade } else { Mode::Apply };
    let cmd = pm.final_command(mode)?;
    if cmd.is_empty() {
        Output::info("Nothing to do");
    } else {
        println!("{cmd}");
    }
    Ok(())
}

fn cmd_agree(pm: &PackageManager) -> Result<()> {
    if pm.status() != GateStatus::RequiresAgreement {
        Output::info(format!(
            "Package manager is {}; no agreement is required",
            pm.status()
        ));
        return Ok(());
    }

    pm.accept_agreement()?;
    Output::success("User agreement accepted");
    Ok(())
}

fn cmd_status(pm: &PackageManager) -> Result<()> {
    Output::kv("Status", pm.status().as_str());
    Output::kv(
        "Agreement",
        if pm.agreement_accepted() { "accepted" } else { "pending" },
    );
    Output::kv("State", pm.base_dir().display().to_string());
    Output::kv("Unstaged", pm.unstaged()?.len().to_string());
    Ok(())
}

fn cmd_summary(pm: &PackageManager, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if pm.write_summary(path)? {
                Output::success(format!("Wrote summary to {}", path.display()));
            } else {
                Output::info("Nothing to summarize");
            }
        }
        None => print!("{}", pm.summary()?),
    }
    Ok(())
}

fn cmd_info(config: &EngineConfig, package: &str) -> Result<()> {
    let info = RepoCatalog::new(config.catalog_url()).package_info(package)?;
    Output::kv("Name", info.name.as_deref().unwrap_or(package));
    if let Some(version) = info.version {
        Output::kv("Version", version);
    }
    if let Some(description) = info.description {
        Output::kv("Description", description);
    }
    Ok(())
}
