use super::Context;
use crate::utils;
use colored::Colorize;
use std::path::Path;

pub async fn handle(context: &Context, file: &Path) -> anyhow::Result<()> {
    println!("{}", "Computing plan...".blue());

    let desired = utils::load_desired(file)?;
    // Refreshed in memory only; plan never writes state
    let mut state = context.state.load().await?;
    let plan = context.provider.refresh_plan(&desired, &mut state).await?;

    println!();
    utils::print_plan(&plan);
    Ok(())
}
