use std::io::{self, BufRead, Write};

use reqwest::Method;
use tracing::debug;

use super::commands::{AdminCommand, Cli, Command, LoginArgs, RequestArgs, SignupArgs};
use super::output::Output;
use super::CliError;
use crate::api::RequestOptions;
use crate::config::{config_schema, load_config};
use crate::session::{Role, SessionError, SessionManager};
use crate::startup;
use crate::utils::logger::init_logging;

/// Load configuration, start the session and execute one command.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config,
        json,
        command,
    } = cli;
    let output = Output::new(json);

    // The schema does not depend on any configuration being valid.
    if matches!(command, Command::Schema) {
        return print_schema();
    }

    if let Some(path) = &config {
        if !path.exists() {
            return Err(CliError::MissingConfig(path.clone()));
        }
    }
    let config = load_config(config.as_deref())?;
    init_logging(&config.logging)?;
    debug!("Using backend at {}", config.api.base_url);

    let mut session = startup::start(&config).await.map_err(SessionError::from)?;
    execute(&mut session, command, &output).await
}

async fn execute(
    session: &mut SessionManager,
    command: Command,
    output: &Output,
) -> Result<(), CliError> {
    match command {
        Command::Login(args) => {
            let (email, password) = read_credentials(args)?;
            let profile = session.login(&email, &password).await?;
            output.profile("Signed in", &profile)
        }
        Command::AdminLogin(args) => {
            let (email, password) = read_credentials(args)?;
            let profile = session.admin_login(&email, &password).await?;
            output.profile("Signed in as administrator", &profile)
        }
        Command::Signup(SignupArgs {
            email,
            password,
            name,
        }) => {
            let name = prompt("Name", name)?;
            let (email, password) = read_credentials(LoginArgs { email, password })?;
            let profile = session.signup(&email, &password, &name).await?;
            output.profile("Account created", &profile)
        }
        Command::Logout => {
            session.logout();
            output.message("Signed out")
        }
        Command::Status => output.status(session),
        Command::Whoami => {
            let profile = match session.state().role() {
                Some(Role::User) => session.refresh_user().await?,
                Some(Role::Admin) => session.refresh_admin().await?,
                None => return Err(SessionError::NotAuthenticated.into()),
            };
            output.profile("Current profile", &profile)
        }
        Command::Dashboard => output.value(&session.dashboard().await?),
        Command::Profile { name } => {
            let profile = session.update_profile(&name).await?;
            output.profile("Profile updated", &profile)
        }
        Command::Admin(admin) => execute_admin(session, admin, output).await,
        Command::Request(args) => {
            let endpoint = args.endpoint.clone();
            let options = request_options(args)?;
            output.value(&session.authenticated_request(&endpoint, options).await?)
        }
        Command::Health => output.value(&session.health().await?),
        Command::Schema => print_schema(),
    }
}

async fn execute_admin(
    session: &SessionManager,
    command: AdminCommand,
    output: &Output,
) -> Result<(), CliError> {
    match command {
        AdminCommand::Dashboard => output.value(&session.admin_dashboard().await?),
        AdminCommand::Users { sort_by, order } => {
            output.users(&session.list_users(sort_by, order).await?)
        }
        AdminCommand::Activities { filter, range } => {
            output.activities(&session.activities(filter, range).await?)
        }
        AdminCommand::Show { id } => output.value(&session.user_details(&id).await?),
        AdminCommand::Activate { id } => output.value(&session.activate_user(&id).await?),
        AdminCommand::Deactivate { id } => output.value(&session.deactivate_user(&id).await?),
        AdminCommand::Delete { id } => output.value(&session.delete_user(&id).await?),
    }
}

fn print_schema() -> Result<(), CliError> {
    println!("{}", config_schema()?);
    Ok(())
}

fn read_credentials(args: LoginArgs) -> Result<(String, String), CliError> {
    let email = prompt("Email", args.email)?;
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        return Err(CliError::Usage("a password is required".to_string()));
    }
    Ok((email, password))
}

/// Use `given` if present, otherwise ask on stdin. The question goes to
/// stderr so `--json` output on stdout stays parseable.
fn prompt(label: &str, given: Option<String>) -> Result<String, CliError> {
    prompt_with(label, given, &mut io::stdin().lock(), &mut io::stderr())
}

fn prompt_with<R: BufRead, W: Write>(
    label: &str,
    given: Option<String>,
    input: &mut R,
    question: &mut W,
) -> Result<String, CliError> {
    let value = match given {
        Some(value) => value,
        None => {
            write!(question, "{}: ", label)?;
            question.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            line
        }
    };
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(CliError::Usage(format!("{} is required", label.to_lowercase())));
    }
    Ok(value)
}

/// Turn `request` arguments into backend request options.
pub(crate) fn request_options(args: RequestArgs) -> Result<RequestOptions, CliError> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .map_err(|_| CliError::Usage(format!("invalid HTTP method '{}'", args.method)))?;
    let mut options = RequestOptions::new(method);

    for pair in &args.query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| CliError::Usage(format!("query '{}' is not KEY=VALUE", pair)))?;
        options = options.with_query(key, value);
    }
    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| CliError::Usage(format!("header '{}' is not NAME:VALUE", header)))?;
        options = options.with_header(name.trim(), value.trim());
    }
    if let Some(data) = &args.data {
        let body = serde_json::from_str(data)
            .map_err(|e| CliError::Usage(format!("--data is not valid JSON: {}", e)))?;
        options = options.with_json(body);
    }
    Ok(options)
}
