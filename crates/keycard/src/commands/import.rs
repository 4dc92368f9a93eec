use super::Context;
use colored::Colorize;

pub async fn handle(
    context: &Context,
    resource_type: &str,
    name: &str,
    id: &str,
) -> anyhow::Result<()> {
    let lock = context.state.acquire_lock().await?;
    let mut state = context.state.load().await?;

    let attributes = context
        .provider
        .import(resource_type, name, id, &mut state)
        .await?;
    context.state.save(&state).await?;
    lock.release().await?;

    println!(
        "{} {}.{}",
        "✓ Imported".green(),
        resource_type.bold(),
        name.bold()
    );
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    Ok(())
}
