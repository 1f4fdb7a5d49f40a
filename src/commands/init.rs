use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its secrets subdirectory and an initial `config.json` file that
/// points at `api_url`.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of data directory, e.g. `$HOME/budget`
/// - `api_url` - The base URL of the budgeting service, e.g. `https://budget.example.com/api`
///
/// # Errors
/// - Returns an error if `api_url` is not an http or https URL.
/// - Returns an error if any file operations fail.
pub async fn init(budget_home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(budget_home, api_url)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the budget directory at {}, now run 'budget login'",
        config.root().display()
    )
    .into())
}
