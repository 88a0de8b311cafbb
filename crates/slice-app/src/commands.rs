use anyhow::Context;
use slice_client::{ApiClient, CancellationToken, ClientConfig, JobPoller, PollError};
use slice_core::JobId;
use tracing::{debug, info};
use crate::cli::{AccountArgs, Command};
use crate::error::AppError;
use crate::render;

pub async fn run(command: Command, config: ClientConfig) -> anyhow::Result<()> {
    let client = ApiClient::from_config(&config)?;
    debug!(url = %client.base_url(), "using backend");

    match command {
        Command::Health => health(&client).await,
        Command::Login(args) => login(&client, args, false).await,
        Command::Signup(args) => login(&client, args, true).await,
        Command::Upload { file, no_watch, .. } => {
            if !client.credentials().is_authenticated() {
                return Err(AppError::NotAuthenticated.into());
            }

            let resp = client
                .upload_video(&file)
                .await
                .with_context(|| format!("uploading {}", file.display()))?;
            println!("{}", resp.message);
            println!("Job: {}", resp.job_id);
            println!("Credits remaining: {}", resp.credits_remaining);

            if no_watch {
                return Ok(());
            }
            watch(client, &config, resp.job_id).await
        }
        Command::Watch { job_id, .. } => {
            let job_id = JobId::new(job_id)?;
            watch(client, &config, job_id).await
        }
    }
}

async fn health(client: &ApiClient) -> anyhow::Result<()> {
    let health = client.health().await?;
    if !health.is_healthy() {
        return Err(AppError::Unhealthy(health.status).into());
    }
    println!(
        "Backend healthy (version {}, database {})",
        health.version.as_deref().unwrap_or("unknown"),
        health.database.as_deref().unwrap_or("unknown"),
    );
    Ok(())
}

async fn login(client: &ApiClient, args: AccountArgs, create: bool) -> anyhow::Result<()> {
    let token = if create {
        client.signup(&args.email, &args.password).await?
    } else {
        client.login(&args.email, &args.password).await?
    };

    info!(
        user = %token.user.email,
        credits = token.user.credits_remaining,
        "logged in"
    );
    println!("{}", token.access_token);
    Ok(())
}

async fn watch(client: ApiClient, config: &ClientConfig, job_id: JobId) -> anyhow::Result<()> {
    let poller = JobPoller::from_config(client, config)?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let outcome = poller
        .poll(&job_id, |snapshot| println!("{}", render::progress_line(snapshot)), &cancel)
        .await;

    match outcome {
        Ok(snapshot) => {
            if let Some(results) = &snapshot.results {
                print!("{}", render::summary(results));
            }
            Ok(())
        }
        Err(PollError::JobFailed(message)) => Err(AppError::JobFailed {
            job_id: job_id.to_string(),
            message,
        }
        .into()),
        Err(PollError::Cancelled) => Err(AppError::Interrupted(job_id.to_string()).into()),
        Err(e) => Err(e).context(format!("polling job {}", job_id)),
    }
}
