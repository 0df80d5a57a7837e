//! Controller loop

use super::{controller, kube_store};
use crate::config::OperatorConfig;
use crate::errors::{OperatorError, OperatorResult};
use crate::output;
use tracing::{info, warn};

/// Handle the run command
pub async fn handle_run_command(once: bool, config: &OperatorConfig) -> OperatorResult<()> {
    let store = kube_store(config).await?;
    let controller = controller(store, config);

    if once {
        let summary = controller.run_pass().await?;
        output::display_summary(&summary, &config.default_format)?;
        if summary.failed > 0 {
            return Err(OperatorError::PassFailed {
                failed: summary.failed,
                total: summary.total,
            });
        }
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    controller.run(config.resync_interval(), shutdown).await;
    info!("Controller stopped");
    Ok(())
}
