//! `nyd auth` command - registration, login and password reset

use clap::Subcommand;
use dialoguer::{theme::ColorfulTheme, Password};
use miette::{bail, IntoDiagnostic, Result};
use tracing::info;

use crate::cli::helpers::{success, workspace, Context};
use crate::cli::GlobalOpts;
use crate::core::store::CredentialStore;
use crate::core::{PortfolioView, Role, Session, Workspace};

/// Identity and secret shared by every authenticated command
#[derive(clap::Args, Debug, Clone)]
pub struct Credentials {
    /// Judge name or advocate name
    #[arg(long)]
    pub name: String,

    /// Password (prompted for when omitted)
    #[arg(long, env = "NYD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct AuthArgs {
    /// Role to authenticate as
    #[arg(long, value_enum)]
    pub role: Role,

    #[command(flatten)]
    pub credentials: Credentials,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Register a new identity
    Register(AuthArgs),

    /// Check a password and that the identity has cases
    Login(AuthArgs),

    /// Replace the password of a registered identity
    Reset(AuthArgs),
}

pub fn run(cmd: AuthCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AuthCommands::Register(args) => run_register(args, global),
        AuthCommands::Login(args) => run_login(args, global),
        AuthCommands::Reset(args) => run_reset(args, global),
    }
}

fn identity(credentials: &Credentials) -> Result<String> {
    let name = credentials.name.trim();
    if name.is_empty() {
        bail!("Name cannot be empty.");
    }
    Ok(name.to_string())
}

/// Password from the flag or environment, else an interactive prompt
fn secret(credentials: &Credentials, confirm: bool) -> Result<String> {
    let secret = match &credentials.password {
        Some(password) => password.clone(),
        None => {
            let theme = ColorfulTheme::default();
            let mut prompt = Password::with_theme(&theme).with_prompt("Password");
            if confirm {
                prompt = prompt.with_confirmation("Confirm password", "Passwords do not match.");
            }
            prompt.interact().into_diagnostic()?
        }
    };
    if secret.is_empty() {
        bail!("Password cannot be empty.");
    }
    Ok(secret)
}

/// Validate credentials and return an authenticated session
pub fn authenticate(workspace: &Workspace, role: Role, credentials: &Credentials) -> Result<Session> {
    let name = identity(credentials)?;
    let store = workspace.state().credentials(role);
    if !store.contains(&name) {
        bail!(
            "{} '{}' is not registered. Register first with `nyd auth register --role {}`.",
            role,
            name,
            role.to_string().to_lowercase()
        );
    }
    let secret = secret(credentials, false)?;
    if !store.validate(&name, &secret) {
        bail!("Incorrect password.");
    }
    info!(%role, identity = %name, "authenticated");
    Ok(Session::new(true, role, name))
}

/// Authenticate and resolve a non-empty portfolio
pub fn sign_in(global: &GlobalOpts, role: Role, credentials: &Credentials) -> Result<(Context, PortfolioView)> {
    let ctx = Context::load(global)?;
    let session = authenticate(&ctx.workspace, role, credentials)?;
    let view = session.portfolio(ctx.dataset.view())?;
    if view.is_empty() {
        bail!("No cases found for {}: {}", role, session.identity);
    }
    Ok((ctx, view))
}

fn run_register(args: AuthArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = workspace(global)?;
    let name = identity(&args.credentials)?;
    let mut store = workspace.state().credentials(args.role);
    if store.contains(&name) {
        bail!(
            "{} '{}' is already registered. Use `nyd auth reset` to change the password.",
            args.role,
            name
        );
    }
    let secret = secret(&args.credentials, true)?;
    store.register(&name, &secret)?;
    success(global, format!("Registered {}: {}", args.role, name));
    Ok(())
}

fn run_login(args: AuthArgs, global: &GlobalOpts) -> Result<()> {
    let (_, view) = sign_in(global, args.role, &args.credentials)?;
    success(
        global,
        format!(
            "Logged in as {}: {} ({} case row(s))",
            view.role(),
            view.identity(),
            view.len()
        ),
    );
    Ok(())
}

fn run_reset(args: AuthArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = workspace(global)?;
    let name = identity(&args.credentials)?;
    let mut store = workspace.state().credentials(args.role);
    if !store.contains(&name) {
        bail!("{} '{}' is not registered.", args.role, name);
    }
    let secret = secret(&args.credentials, true)?;
    if !store.reset(&name, &secret)? {
        bail!("{} '{}' is not registered.", args.role, name);
    }
    success(global, format!("Password reset for {}: {}", args.role, name));
    Ok(())
}
