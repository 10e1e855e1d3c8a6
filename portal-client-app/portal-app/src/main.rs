mod state;

use anyhow::Context;
use tracing::{info, warn};

use portal_shared::config::AppConfig;
use state::PortalState;

fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry
    portal_shared::telemetry::init_telemetry(&config.telemetry)?;

    info!(env = %config.app.env, "{} starting...", config.app.name);

    let state = PortalState::build(config).context("Failed to open backing store")?;

    info!(
        competitions = state.competitions.list().len(),
        pending_approval = state.competitions.pending_approval().len(),
        projects = state.projects.list().len(),
        forum_posts = state.community.forum_posts().len(),
        team_requests = state.community.team_requests().len(),
        users = state.auth.users().len(),
        "Stores ready"
    );

    match state.auth.current_user() {
        Some(user) => info!(user_id = %user.id, role = user.role.as_str(), "Session restored"),
        None => info!("No active session"),
    }

    let write_errors = [
        state.auth.last_write_error(),
        state.competitions.last_write_error(),
        state.projects.last_write_error(),
        state.community.last_write_error(),
    ];
    for error in write_errors.into_iter().flatten() {
        warn!(error = %error, "Seed data could not be persisted; changes will not survive a restart");
    }

    info!(used_bytes = state.store.used_bytes(), "{} ready", state.config.app.name);
    Ok(())
}
