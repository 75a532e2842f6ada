//! Bot runtime - builds the service context and runs the gateway

use std::sync::Arc;

use starboard_common::{AppConfig, AppError, AppResult, Monitor, SettingsHandle};
use starboard_core::{Channel, MirrorOutcome};
use starboard_db::{create_pool, run_migrations, PgMappingRepository};
use starboard_service::{ServiceContext, SettingsService};
use tracing::{error, info, warn};

use crate::client::{GatewayClient, ServiceDispatcher};
use crate::http::DiscordHttp;

/// Run the bot until Ctrl-C or a fatal gateway error
pub async fn run(config: AppConfig) -> AppResult<()> {
    let monitor = Arc::new(Monitor::new(config.monitor.history_capacity));

    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Database ready");

    let mapping_repo = Arc::new(PgMappingRepository::new(pool, monitor.clone()));
    let http = Arc::new(DiscordHttp::new(&config.discord).map_err(|e| AppError::Discord(e.to_string()))?);

    let ctx = ServiceContext::builder()
        .mapping_repo(mapping_repo)
        .message_source(http.clone())
        .mirror_sink(http.clone())
        .monitor(Arc::clone(&monitor))
        .settings(SettingsHandle::new(config.starboard.settings()))
        .serialize_per_message(config.starboard.serialize_per_message)
        .build()?;

    verify_channels(&ctx, &http).await;

    let mut gateway = GatewayClient::new(
        &config.discord,
        Arc::new(ServiceDispatcher::new(ctx.clone())),
    );

    let result = tokio::select! {
        result = gateway.run() => result.map_err(|e| AppError::Discord(e.to_string())),
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    let stats = SettingsService::new(&ctx).stats();
    info!(
        reactions_added = stats.reaction_add_count,
        reactions_removed = stats.reaction_remove_count,
        starboard_updates = stats.starboard_updates,
        avg_update_ms = stats.avg_update_time.as_millis() as u64,
        db_queries = stats.db_query_count,
        "Starboard stopped"
    );

    result
}

/// Check the configured channels against Discord and log what is wrong
///
/// Problems are reported, not fatal: the settings can still be fixed at
/// runtime through `SettingsService`.
async fn verify_channels(ctx: &ServiceContext, http: &DiscordHttp) {
    let settings = ctx.settings().snapshot();
    let service = SettingsService::new(ctx);

    match settings.forum_channel_id {
        Some(forum_id) => match http.get_channel(forum_id).await {
            Ok(MirrorOutcome::Applied(model)) => {
                if let Err(e) = service.set_forum_channel(&Channel::from(model)) {
                    error!(channel_id = %forum_id, error = %e, "Configured starboard forum is unusable");
                }
            }
            Ok(outcome) => {
                error!(channel_id = %forum_id, outcome = outcome.label(), "Configured starboard forum is not accessible");
            }
            Err(e) => warn!(channel_id = %forum_id, error = %e, "Could not check starboard forum"),
        },
        None => warn!("No starboard forum configured; no message is eligible"),
    }

    let Some(channel_id) = settings.starboard_channel_id else {
        warn!("No starboard channel configured; starred messages are not mirrored");
        return;
    };

    let channel = match http.get_channel(channel_id).await {
        Ok(MirrorOutcome::Applied(model)) => Channel::from(model),
        Ok(outcome) => {
            error!(channel_id = %channel_id, outcome = outcome.label(), "Configured starboard channel is not accessible");
            return;
        }
        Err(e) => {
            warn!(channel_id = %channel_id, error = %e, "Could not check starboard channel");
            return;
        }
    };

    let permissions = match http.current_user().await {
        Ok(user) => http.channel_permissions(channel_id, user.id).await,
        Err(e) => Err(e),
    };
    let permissions = match permissions {
        Ok(permissions) => permissions,
        Err(e) => {
            warn!(channel_id = %channel_id, error = %e, "Could not compute bot permissions");
            return;
        }
    };

    if let Err(e) = service.set_starboard_channel(&channel, permissions) {
        error!(channel_id = %channel_id, error = %e, "Configured starboard channel is unusable");
    }
}
