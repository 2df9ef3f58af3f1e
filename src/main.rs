mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gitcal_core::config::{Overrides, Settings};
use gitcal_core::error::ConfigError;
use gitcal_core::export;
use gitcal_core::gitlab::GitLab;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "gitcal", version)]
#[command(about = "Export GitLab issues and milestones with due dates to iCalendar files")]
struct Cli {
    /// Config file (default: <config dir>/gitcal/config.toml)
    #[arg(long, value_name = "PATH", conflicts_with_all = ["url", "token"])]
    config: Option<PathBuf>,

    /// URL of the GitLab instance
    #[arg(short, long, requires = "token")]
    url: Option<String>,

    /// Private access token
    #[arg(short, long, requires = "url")]
    token: Option<String>,

    /// Project IDs, separated by commas or spaces
    #[arg(short, long, value_name = "IDS", num_args = 1..)]
    projects: Vec<String>,

    /// Group IDs, separated by commas or spaces
    #[arg(short, long, value_name = "IDS", num_args = 1..)]
    groups: Vec<String>,

    /// Export only issues
    #[arg(short, long)]
    issues: bool,

    /// Export only milestones
    #[arg(short, long)]
    milestones: bool,

    /// Write everything into one calendar with this name
    #[arg(short, long, value_name = "NAME")]
    combine: Option<String>,

    /// Add an alarm this many days before each due date
    #[arg(short, long, value_name = "DAYS")]
    reminder: Option<u32>,

    /// Output directory [default: .]
    #[arg(short, long, value_name = "DIR")]
    directory: Option<String>,

    /// More logging (-v debug, -vv everything)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(self) -> Overrides {
        Overrides {
            config: self.config,
            url: self.url,
            token: self.token,
            projects: self.projects,
            groups: self.groups,
            issues: self.issues,
            milestones: self.milestones,
            combine: self.combine,
            reminder: self.reminder,
            directory: self.directory,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("gitcal: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            let code = err
                .downcast_ref::<ConfigError>()
                .map_or(1, ConfigError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.overrides())?;
    let url = settings.connection.url.clone();

    let client = GitLab::new(&settings.connection)?;
    let user = client
        .authenticate()
        .await
        .with_context(|| format!("Could not log in to {url}"))?;
    info!("Logged in to {url} as {}", user.username);

    let report = export::run(&client, &settings.export).await?;

    info!(
        "Done: {} calendar(s) written to {}, {} source(s) skipped",
        report.written(),
        settings.export.directory.display(),
        report.failed.len()
    );
    Ok(())
}
