use std::path::PathBuf;
use std::time::Duration;
use clap::{Parser, Subcommand};
use slice_client::{ClientConfig, ClientError, Credentials};

/// slice - upload videos and follow their processing from the terminal
#[derive(Parser, Debug)]
#[command(name = "slice")]
#[command(version)]
#[command(about = "Upload videos to StackSlice and watch the generated hooks, captions and clips", long_about = None)]
pub struct Cli {
    /// Backend URL (overrides SLICE_API_URL)
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Bearer token (overrides SLICE_API_TOKEN)
    #[arg(long = "token")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the backend is reachable and healthy
    Health,

    /// Log in and print an access token
    Login(AccountArgs),

    /// Create an account and print an access token
    Signup(AccountArgs),

    /// Upload a video (mp4, mov, avi) and watch the job it starts
    Upload {
        file: PathBuf,

        /// Print the job id and exit instead of watching
        #[arg(long = "no-watch")]
        no_watch: bool,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Follow an existing job until it completes or fails
    Watch {
        job_id: String,

        #[command(flatten)]
        poll: PollArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct AccountArgs {
    #[arg(long = "email")]
    pub email: String,

    #[arg(long = "password", env = "SLICE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct PollArgs {
    /// Milliseconds between status requests (overrides SLICE_POLL_INTERVAL_MS)
    #[arg(long = "interval-ms", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,
}

impl Cli {
    /// Environment config with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<ClientConfig, ClientError> {
        let mut config = ClientConfig::load()?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(token) = &self.token {
            config.credentials = Credentials::bearer(token.clone());
        }
        match &self.command {
            Command::Upload { poll, .. } | Command::Watch { poll, .. } => {
                if let Some(ms) = poll.interval_ms {
                    config.poll_interval = Duration::from_millis(ms);
                }
            }
            _ => {}
        }
    }
}
