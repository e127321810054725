use clap::{Parser, ValueEnum};
use db_infra::config::pool::PoolSettings;
use db_infra::{bind, orchestrate_migration, BindOptions, ConnectionParameters, DeploymentProfile};
use migration::MigrationCommand;
use tracing::error;

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Postgresql,
    Mysql,
}

impl From<Profile> for DeploymentProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Postgresql => DeploymentProfile::PostgreSql,
            Profile::Mysql => DeploymentProfile::MySql,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Example database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Server profile whose DB_* parameters select the target database
    #[arg(short, long, value_enum, env = "APP_PROFILE")]
    profile: Profile,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.to_string().contains("invalid value") && e.to_string().contains("--profile") {
                eprintln!("❌ Unsupported profile provided.");
                eprintln!();
                eprintln!("The default profile is not supported for CLI operations: its");
                eprintln!("database lives in memory for one process and is seeded from");
                eprintln!("init scripts, so there is nothing to migrate.");
                eprintln!();
                eprintln!("Supported profiles:");
                eprintln!("  • postgresql - DB_SERVERNAME, DB_DATABASENAME, DB_USER, DB_PASSWORD");
                eprintln!("  • mysql      - DB_URL, DB_USERNAME, DB_PASSWORD, DB_DRIVERCLASS (optional)");
                std::process::exit(1);
            }
            e.exit();
        }
    };

    let profile = DeploymentProfile::from(args.profile);
    let pool = match PoolSettings::from_env() {
        Ok(pool) => pool,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let options = BindOptions::new().with_pool(pool);
    let params = ConnectionParameters::from_env();

    let binding = match bind(profile, &params, &options).await {
        Ok(binding) => binding,
        Err(e) => {
            eprintln!("❌ Failed to bind {profile} profile: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = orchestrate_migration(&binding, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
