//! CLI argument definitions for the photohelper binary.

use clap::{Args, Parser, Subcommand};
use photohelper_core::StoreBackend;

/// Manage the photo-helper account on this machine
#[derive(Parser, Debug)]
#[command(name = "photohelper")]
#[command(about = "Photo Helper account: sign in, upgrade, sign out")]
#[command(version)]
pub struct Cli {
    /// Where the session is stored (file, keyring, memory)
    #[arg(long, global = true, value_parser = parse_store)]
    pub store: Option<StoreBackend>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current account and plan
    Status,
    /// Sign in or create an account with email and password
    Login(LoginArgs),
    /// Complete a Sign in with Apple flow
    Apple(AppleArgs),
    /// Sign in with Google (placeholder account)
    Google,
    /// Upgrade the signed-in account to Premium
    Upgrade,
    /// Sign out and forget the stored session
    Logout,
    /// List plans and premium features
    Plans,
    /// Show or change the saved configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    /// Create a new account instead of signing in
    #[arg(long)]
    pub signup: bool,

    /// Display name for new accounts
    #[arg(long, default_value = "")]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct AppleArgs {
    /// Stable user identifier returned by Apple
    #[arg(long, required_unless_present = "fail")]
    pub user_id: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub given_name: Option<String>,

    #[arg(long)]
    pub family_name: Option<String>,

    /// Report a failed sign-in with this reason instead
    #[arg(long, conflicts_with = "user_id")]
    pub fail: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Save this session store as the default
    #[arg(long, value_parser = parse_store)]
    pub set_store: Option<StoreBackend>,

    /// Save this simulated login delay, in milliseconds
    #[arg(long)]
    pub login_delay_ms: Option<u64>,
}

fn parse_store(value: &str) -> Result<StoreBackend, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}
