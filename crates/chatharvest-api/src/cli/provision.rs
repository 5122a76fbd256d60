//! `charv provision` -- browser provisioning check.

use crate::state::AppState;

pub async fn provision(state: &AppState) -> anyhow::Result<()> {
    let report = chatharvest_infra::browser::provision(&state.config.browser).await?;

    println!();
    println!(
        "  {} Browser provisioned and responding",
        console::style("✓").green()
    );
    println!(
        "  {} {}",
        console::style("executable:").dim(),
        report.executable.display()
    );
    println!(
        "  {} {}",
        console::style("version:").dim(),
        report.browser_version
    );
    if report.downloaded {
        println!(
            "  {} snapshot downloaded during this run",
            console::style("note:").dim()
        );
    }
    println!();

    Ok(())
}
