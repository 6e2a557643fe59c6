//! `nyd init` command - create a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::workspace::{Workspace, WorkspaceError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Rewrite the config template even if .nyd/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
    }

    match Workspace::init(&path, args.force) {
        Ok(workspace) => {
            if global.quiet {
                return Ok(());
            }
            println!(
                "{} Initialized workspace at {}",
                style("✓").green(),
                style(workspace.root().display()).cyan()
            );
            println!();
            print_structure(workspace.root());
            println!();
            println!("Next steps:");
            println!(
                "  Copy your exports to {} and {}",
                style("data/cases.csv").yellow(),
                style("data/hearings.csv").yellow()
            );
            println!(
                "  {} Register a judge",
                style("nyd auth register --role judge --name <NAME>").yellow()
            );
            println!("  {} Court-wide overview", style("nyd status").yellow());
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(root)) => {
            println!(
                "{} Workspace already exists at {}",
                style("!").yellow(),
                style(root.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("nyd init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    for entry in [".nyd/", ".nyd/config.yaml", "data/"] {
        if root.join(entry).exists() {
            println!("  {}", style(entry).dim());
        }
    }
}
