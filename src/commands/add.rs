use crate::api::{self, Mode};
use crate::args::AddArgs;
use crate::budget::Budget;
use crate::commands::{check, Out, RELOGIN_MESSAGE};
use crate::home::HomeScreen;
use crate::{render, Config, Result};
use anyhow::bail;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// What `budget add` reports.
#[derive(Debug, Clone, Serialize)]
pub struct Added {
    pub id: String,
    pub budget: Budget,
}

/// Records an income or a cost dated today, then shows the updated budget.
pub async fn add(config: Config, mode: Mode, today: NaiveDate, args: AddArgs) -> Result<Out<Added>> {
    let mut api = api::api(&config, mode, today)?;
    let mut home = HomeScreen::new(api.as_mut(), today);
    home.load().await;
    check(&mut home)?;
    submit(&mut home, &args).await
}

/// Submits `args` through a loaded home screen. A transaction the service accepted but that could
/// not be refreshed afterwards is still an error, since the budget shown would be stale.
async fn submit(home: &mut HomeScreen<'_>, args: &AddArgs) -> Result<Out<Added>> {
    home.open_modal(args.kind());
    home.add_transaction(args.kind(), args.amount(), args.category())
        .await;
    if home.state().is_logged_out() {
        bail!(RELOGIN_MESSAGE);
    }
    if let Some(message) = home.state().add_error() {
        bail!("Unable to add the transaction: {message}");
    }
    let Some(id) = home.added().map(String::from) else {
        bail!("The transaction was not added");
    };
    if let Some(message) = home.take_error() {
        bail!("The transaction was added as {id}, but refreshing the budget failed: {message}");
    }
    debug!("Monthly list now has {} entries", home.state().monthly.len());

    let budget = home.state().budget();
    let message = format!(
        "Added {} of {} ({id})\n{}",
        args.kind(),
        args.amount(),
        render::budget(&budget)
    );
    Ok(Out::new(message, Added { id, budget }))
}
