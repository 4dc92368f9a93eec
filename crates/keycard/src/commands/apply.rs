use super::Context;
use crate::utils;
use colored::Colorize;
use std::path::Path;

pub async fn handle(context: &Context, file: &Path, yes: bool) -> anyhow::Result<()> {
    let desired = utils::load_desired(file)?;
    let lock = context.state.acquire_lock().await?;
    let mut state = context.state.load().await?;

    let plan = context.provider.refresh_plan(&desired, &mut state).await?;
    utils::print_plan(&plan);
    if !plan.has_changes {
        context.state.save(&state).await?;
        lock.release().await?;
        return Ok(());
    }

    println!();
    if !yes && !utils::confirm("Apply these changes?")? {
        println!("{}", "Apply cancelled.".yellow());
        lock.release().await?;
        return Ok(());
    }

    println!();
    println!("{}", "Applying...".blue());
    let result = context.provider.apply(&plan, &desired, &mut state).await;

    // State is saved even after a failure so completed actions are not lost
    context.state.save(&state).await?;
    lock.release().await?;

    utils::print_apply_result(&result);
    if !result.is_success() {
        anyhow::bail!("apply failed; {} action(s) did not complete", result.failed.len());
    }
    println!("{}", "✓ Apply complete".green().bold());
    Ok(())
}
