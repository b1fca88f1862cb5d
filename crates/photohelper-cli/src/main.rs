//! Photo Helper account CLI.
//!
//! Drives the account state machine from the terminal: each run restores the
//! stored session, applies one command, renders every state change, and
//! reports any error exactly once.

mod cli;
mod render;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use photohelper_core::auth::{
    EmailForm, FederatedCredential, IdentityProvider, StaticIdentityProvider,
};
use photohelper_core::{AuthState, Config, SessionError, SessionManager};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{AppleArgs, Cli, Command, ConfigArgs, LoginArgs};

/// Password source for non-interactive runs
const ENV_PASSWORD: &str = "PHOTO_HELPER_PASSWORD";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g., RUST_LOG=photohelper_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    // Edits the file as written, without env or flag overrides mixed in
    if let Command::Config(ref args) = cli.command {
        configure(args)?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    config.apply_env();
    if let Some(store) = cli.store {
        config.store = store;
    }
    debug!(?config, "Config loaded");

    let store = config.open_store().context("Failed to open session store")?;
    let manager = SessionManager::new(store, config.session_options());
    let mut states = manager.subscribe();

    let command = run(cli.command, &manager);
    tokio::pin!(command);

    let outcome = loop {
        tokio::select! {
            outcome = &mut command => break outcome,
            changed = states.changed() => {
                if changed.is_ok() {
                    render::state_change(&states.borrow_and_update());
                }
            }
        }
    };
    if states.has_changed().unwrap_or(false) {
        render::state_change(&states.borrow_and_update());
    }

    let mut success = true;
    if let Some(message) = manager.acknowledge_error() {
        eprintln!("Error: {}", message);
        success = false;
    }
    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        success = false;
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(command: Command, manager: &SessionManager) -> Result<()> {
    match command {
        Command::Status => {
            status(manager);
            Ok(())
        }
        Command::Login(args) => login(args, manager).await,
        Command::Apple(args) => apple(args, manager),
        Command::Google => report(manager.login_with_google().await),
        Command::Upgrade => upgrade(manager),
        Command::Logout => report(manager.logout()),
        Command::Plans => {
            render::plans();
            Ok(())
        }
        Command::Config(ref args) => configure(args),
    }
}

fn configure(args: &ConfigArgs) -> Result<()> {
    let mut config = Config::load().context("Failed to load config")?;
    let mut changed = false;
    if let Some(store) = args.set_store {
        config.store = store;
        changed = true;
    }
    if let Some(ms) = args.login_delay_ms {
        config.login_delay_ms = ms;
        changed = true;
    }
    if changed {
        config.save().context("Failed to save config")?;
        info!("Config saved");
    }
    render::config(&config);
    Ok(())
}

fn status(manager: &SessionManager) {
    match manager.state() {
        AuthState::Authenticated(user) => render::profile(&user),
        other => println!("{}", other),
    }
}

async fn login(args: LoginArgs, manager: &SessionManager) -> Result<()> {
    let password = match std::env::var(ENV_PASSWORD) {
        Ok(p) => p,
        Err(_) => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };
    let confirm_password = if args.signup {
        match std::env::var(ENV_PASSWORD) {
            Ok(p) => p,
            Err(_) => rpassword::prompt_password("Confirm password: ")
                .context("Failed to read password")?,
        }
    } else {
        String::new()
    };

    let form = EmailForm {
        email: args.email,
        password,
        confirm_password,
        name: args.name,
        is_new_user: args.signup,
    };
    form.check()?;

    report(
        manager
            .login_with_email(&form.email, &form.password, form.is_new_user, &form.name)
            .await,
    )
}

fn apple(args: AppleArgs, manager: &SessionManager) -> Result<()> {
    let provider = match (args.fail, args.user_id) {
        (Some(reason), _) => StaticIdentityProvider::failing(reason),
        (None, Some(user_id)) => {
            let mut credential =
                FederatedCredential::new(user_id).with_name(args.given_name, args.family_name);
            if let Some(email) = args.email {
                credential = credential.with_email(email);
            }
            StaticIdentityProvider::succeeding(credential)
        }
        (None, None) => anyhow::bail!("--user-id or --fail is required"),
    };

    report(manager.login_with_apple(provider.sign_in()))
}

fn upgrade(manager: &SessionManager) -> Result<()> {
    if manager.current_user().is_none() {
        println!("Sign in first to upgrade.");
        return Ok(());
    }
    if manager.is_premium() {
        println!("Already on Premium.");
        return Ok(());
    }
    report(manager.upgrade_to_premium())?;
    info!("Premium upgrade applied");
    println!("Welcome to Premium!");
    Ok(())
}

/// A store failure still leaves the new state in place; say so.
fn report(result: Result<AuthState, SessionError>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_persistence() => {
            Err(anyhow::Error::new(e).context("Session changed but could not be stored"))
        }
        Err(e) => Err(e.into()),
    }
}
