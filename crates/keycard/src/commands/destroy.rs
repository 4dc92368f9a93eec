use super::Context;
use crate::utils;
use colored::Colorize;

pub async fn handle(context: &Context, address: Option<&str>, yes: bool) -> anyhow::Result<()> {
    let lock = context.state.acquire_lock().await?;
    let mut state = context.state.load().await?;

    let targets: Vec<String> = state
        .resources
        .keys()
        .filter(|key| address.is_none_or(|a| *key == a))
        .cloned()
        .collect();
    if targets.is_empty() {
        lock.release().await?;
        match address {
            Some(address) => anyhow::bail!("{} is not managed", address),
            None => {
                println!("{}", "Nothing to destroy.".green());
                return Ok(());
            }
        }
    }

    for target in &targets {
        println!("  {} {}", "-".red(), target.bold());
    }
    println!();
    if !yes && !utils::confirm(&format!("Delete {} resource(s)?", targets.len()))? {
        println!("{}", "Destroy cancelled.".yellow());
        lock.release().await?;
        return Ok(());
    }

    let result = context.provider.destroy(address, &mut state).await;
    context.state.save(&state).await?;
    lock.release().await?;

    utils::print_apply_result(&result);
    if !result.is_success() {
        anyhow::bail!("destroy failed for {} resource(s)", result.failed.len());
    }
    Ok(())
}
