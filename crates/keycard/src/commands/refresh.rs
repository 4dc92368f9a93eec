use super::Context;
use colored::Colorize;

pub async fn handle(context: &Context) -> anyhow::Result<()> {
    let lock = context.state.acquire_lock().await?;
    let mut state = context.state.load().await?;
    println!(
        "{}",
        format!("Refreshing {} resource(s)...", state.resources.len()).blue()
    );

    let removed = context.provider.refresh(&mut state).await?;
    context.state.save(&state).await?;
    lock.release().await?;

    for address in &removed {
        println!("  {} {} no longer exists", "-".red(), address.bold());
    }
    println!(
        "{}",
        format!(
            "✓ {} resource(s) in state, {} removed",
            state.resources.len(),
            removed.len()
        )
        .green()
    );
    Ok(())
}
