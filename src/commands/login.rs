use crate::api::{self, Mode};
use crate::commands::Out;
use crate::home::HomeScreen;
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Logs in to the budgeting service and stores the session token in the secrets directory.
pub async fn login(
    mut config: Config,
    mode: Mode,
    today: NaiveDate,
    email: &str,
    password: &str,
) -> Result<Out<()>> {
    let mut api = api::api(&config, mode, today)?;
    let token = api
        .login(email, password)
        .await
        .with_context(|| format!("Unable to log in as {email}"))?;
    config.save_session(token).await?;
    debug!("Session saved to {}", config.session_path().display());
    Ok(format!("Logged in as {email}").into())
}

/// Ends the session with the service and removes the stored token. Unless `yes` is given, asks for
/// confirmation on stdin first.
pub async fn logout(config: Config, mode: Mode, today: NaiveDate, yes: bool) -> Result<Out<()>> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    logout_with(config, mode, today, yes, &mut stdin).await
}

async fn logout_with<R>(
    mut config: Config,
    mode: Mode,
    today: NaiveDate,
    yes: bool,
    input: &mut R,
) -> Result<Out<()>>
where
    R: AsyncBufRead + Unpin,
{
    if !yes && !confirm("Are you sure you want to log out?", input).await? {
        return Ok("Still logged in".into());
    }
    let mut api = api::api(&config, mode, today)?;
    let mut home = HomeScreen::new(api.as_mut(), today);
    if let Err(alert) = home.logout().await {
        bail!(alert);
    }
    config.clear_session().await?;
    Ok("Logged out".into())
}

/// Asks a yes/no question. Anything but `y` or `yes` is a no.
async fn confirm<R>(question: &str, input: &mut R) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    info!("{question} [y/N]");
    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .context("Unable to read the answer")?;
    Ok(matches!(
        line.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
