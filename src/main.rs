use clap::{Args, Parser, Subcommand};

use argentbank::config::{ClientConfig, ConfigError};
use argentbank::routes::Navigation;
use argentbank::{AppContext, SessionError, UserProfile};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("profile fetch was cancelled")]
    FetchCancelled,
}

#[derive(Parser, Debug)]
#[command(name = "argentbank", about = "Argent Bank session client")]
struct Cli {
    /// Overrides `ARGENT_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long, env = "ARGENT_EMAIL")]
    email: String,

    #[arg(long, env = "ARGENT_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the profile.
    Login(LoginArgs),
    /// Sign in and change the username.
    Rename {
        #[command(flatten)]
        login: LoginArgs,
        user_name: String,
    },
    /// Resolve a route, optionally after signing in.
    Route {
        path: String,
        #[arg(long, env = "ARGENT_EMAIL")]
        email: Option<String>,
        #[arg(long, env = "ARGENT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    let ctx = AppContext::from_config(&config)?;

    match cli.command {
        Command::Login(args) => {
            let profile = sign_in(&ctx, &args.email, &args.password).await?;
            print_welcome(&profile);
        }
        Command::Rename { login, user_name } => {
            sign_in(&ctx, &login.email, &login.password).await?;
            let profile = ctx
                .update_user_name(&user_name)
                .await?
                .wait()
                .await
                .into_result()?
                .ok_or(CliError::FetchCancelled)?;
            print_welcome(&profile);
        }
        Command::Route { path, email, password } => {
            if let (Some(email), Some(password)) = (email.as_deref(), password.as_deref()) {
                sign_in(&ctx, email, password).await?;
            }
            print_navigation(&ctx.navigate(&path));
        }
    }
    Ok(())
}

async fn sign_in(ctx: &AppContext, email: &str, password: &str) -> Result<UserProfile, CliError> {
    let outcome = ctx.login(email, password, None).await?;
    let profile = outcome
        .profile_fetch
        .wait()
        .await
        .into_result()?
        .ok_or(CliError::FetchCancelled)?;
    tracing::info!(redirect_to = %outcome.redirect_to.href(), "signed in");
    Ok(profile)
}

fn print_welcome(profile: &UserProfile) {
    println!("Welcome back {}!", profile.display_name());
    if let (Some(first), Some(last)) = (profile.first_name.as_deref(), profile.last_name.as_deref()) {
        println!("  name:     {first} {last}");
    }
    if let Some(user_name) = profile.user_name.as_deref() {
        println!("  username: {user_name}");
    }
}

fn print_navigation(nav: &Navigation) {
    match nav {
        Navigation::Render { page, location } => println!("render {page:?} at {}", location.href()),
        Navigation::Redirect { to, pending } => {
            println!("redirect to {} (from {})", to.href(), pending.from.href());
        }
        Navigation::NotFound { location } => println!("not found: {}", location.href()),
    }
}
