//! `charv qr` -- QR session initializer.

use chatharvest_core::client::MessagingClient;
use chatharvest_core::session::run_qr_login;
use chatharvest_infra::bridge::BridgeClient;
use chatharvest_infra::session::LocalSessionStore;

use crate::state::AppState;

pub async fn qr_login(state: &AppState) -> anyhow::Result<()> {
    let client = BridgeClient::new(state.config.clone());
    let store = LocalSessionStore::new(&state.config.session_dir);
    let qr_output = state.config.qr_output_path();

    let result = run_qr_login(&client, &store, &qr_output).await;

    if let Err(err) = client.stop().await {
        tracing::warn!(error = %err, "failed to stop client cleanly");
    }

    result?;

    println!();
    println!(
        "  {} Login captured; QR image data written to {}",
        console::style("✓").green(),
        console::style(qr_output.display()).cyan()
    );
    println!();

    Ok(())
}
