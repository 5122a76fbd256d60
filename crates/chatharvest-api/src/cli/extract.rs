//! `charv extract` -- group message extraction.

use chatharvest_core::extract::run_extract;
use chatharvest_infra::bridge::BridgeClient;
use chatharvest_infra::session::LocalSessionStore;
use chatharvest_types::analysis::Analysis;

use crate::state::AppState;

pub async fn extract(
    state: &AppState,
    group_id: &str,
    analysis_type: &str,
    criteria: Option<String>,
) -> anyhow::Result<()> {
    let analysis = Analysis::from_args(analysis_type, criteria)?;

    let client = BridgeClient::new(state.config.clone());
    let store = LocalSessionStore::new(&state.config.session_dir);
    let output_path = state.config.messages_output_path(group_id);

    let report = run_extract(&client, &store, group_id, &analysis, &output_path).await?;

    println!();
    println!(
        "  {} Messages saved for group {}",
        console::style("✓").green(),
        console::style(report.chat.display_name()).cyan()
    );
    println!(
        "  {} of {} fetched messages written to {}",
        report.written,
        report.fetched,
        output_path.display()
    );
    println!();

    Ok(())
}
