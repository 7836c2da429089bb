use anyhow::Result;
use member_browser::state::AppState;
use shared::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Reads .env first when present
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.app.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(config.is_development())
        .init();

    info!("🚀 Member browser starting ({})", config.app.environment);

    let state = AppState::headless(config.clone())?;

    match config.credentials() {
        Some((username, password)) => {
            state.account.login(username, password).await?;
        }
        None => warn!("No credentials configured, browsing anonymously"),
    }

    let members = state.members_service();
    let params = members.get_user_params();
    let page = members.get_members(&params).await?;

    match &page.pagination {
        Some(p) => info!(
            "📄 Page {}/{} ({} members in total)",
            p.current_page, p.total_pages, p.total_items
        ),
        None => info!("📄 {} members (no pagination info)", page.result.len()),
    }

    for member in &page.result {
        info!(
            "👤 {} ({}){}",
            member.display_name(),
            member.username,
            member
                .city
                .as_deref()
                .map(|city| format!(" from {}", city))
                .unwrap_or_default()
        );
    }

    if let Some(first) = page.result.first() {
        let detail = members.get_member_detail(&first.username).await?;
        info!(
            "🖼️ {} has {} gallery images",
            detail.member.display_name(),
            detail.images.len()
        );
    }

    Ok(())
}
