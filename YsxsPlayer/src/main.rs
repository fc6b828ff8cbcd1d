mod headless;
mod logging;

use headless::HeadlessPlayer;
use std::sync::Arc;
use tracing::{info, warn};
use ysxsalist::AlistClient;
use ysxsconfig::{get_config, Config};
use ysxsplaylist::{AlbumConfigExt, FileStorage, PlaybackStateStore, PlaylistOrchestrator};

/// Client configured from the `alist` section, logged in when credentials are set
async fn build_client(config: &Config) -> anyhow::Result<AlistClient> {
    let mut client = AlistClient::builder()
        .base_url(config.alist_url())
        .timeout(config.alist_timeout())
        .build()?;

    if let Some((username, password)) = config.alist_credentials() {
        match client.login(&username, &password, "").await {
            Ok(_) => info!("🔑 Logged in to {} as {}", client.base_url(), username),
            Err(e) => warn!("⚠️ Login failed, browsing as guest: {}", e),
        }
    }

    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========
    let config = get_config();
    logging::init_logging(&config);

    let options = config.album_options();
    info!("🎧 YsxsPlayer for album {} on {}", options.album_path, options.alist_url);

    let client = build_client(&config).await?;
    let store = PlaybackStateStore::new(Arc::new(FileStorage::new(config.records_dir()?)?));

    // ========== PHASE 2 : Chargement de l'album ==========
    let (player, player_state) = HeadlessPlayer::new();
    let mut orchestrator = PlaylistOrchestrator::new(
        options,
        Arc::new(client),
        store.clone(),
        Box::new(player),
    )
    .with_player_options(config.player_options());

    orchestrator.attach().await?;

    // ========== PHASE 3 : Résumé ==========
    let record = orchestrator
        .identity()
        .map(|identity| store.read(identity))
        .unwrap_or_default();
    let player = player_state
        .lock()
        .map_err(|_| anyhow::anyhow!("headless player state poisoned"))?
        .clone();

    let summary = serde_json::json!({
        "album": orchestrator.identity().map(|identity| identity.to_string()),
        "state": orchestrator.state().to_string(),
        "player": {
            "tracks": player.tracks,
            "current": player.current,
            "position": player.position,
        },
        "record": record,
        "audio": orchestrator.audio_list(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    orchestrator.detach();
    info!("✅ Done");
    Ok(())
}
