use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::admin::{ActivityFilter, SortOrder, TimeRange, UserSortKey};

/// Sign in to the mindbridge backend and call its API.
#[derive(Parser, Debug)]
#[command(name = "mindbridge", version)]
pub struct Cli {
    /// Configuration file (YAML). Defaults to ./config.yaml when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in as a user
    Login(LoginArgs),
    /// Sign in as an administrator
    AdminLogin(LoginArgs),
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Status,
    /// Fetch the current profile from the backend
    Whoami,
    /// Show the user dashboard
    Dashboard,
    /// Update the signed-in user's profile
    Profile {
        /// New display name
        #[arg(long)]
        name: String,
    },
    /// Administrator commands
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Call any endpoint with the stored credentials
    Request(RequestArgs),
    /// Check backend health
    Health,
    /// Print the configuration JSON schema
    Schema,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub email: Option<String>,
    /// Prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long, short)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, short)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Show the admin dashboard
    Dashboard,
    /// List users
    Users {
        #[arg(long, default_value_t = UserSortKey::default())]
        sort_by: UserSortKey,
        #[arg(long, default_value_t = SortOrder::default())]
        order: SortOrder,
    },
    /// Show recent activity
    Activities {
        #[arg(long, default_value_t = ActivityFilter::default())]
        filter: ActivityFilter,
        #[arg(long, default_value_t = TimeRange::default())]
        range: TimeRange,
    },
    /// Show one user
    Show { id: String },
    /// Re-enable a user account
    Activate { id: String },
    /// Disable a user account
    Deactivate { id: String },
    /// Delete a user account
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method, e.g. GET or POST
    pub method: String,
    /// Path relative to the backend base URL, e.g. /dashboard
    pub endpoint: String,
    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,
    /// Query parameter, repeatable
    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,
    /// Extra header, repeatable
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,
}
