use anyhow::Result;

/// Resolves once the process receives SIGINT, SIGTERM or Ctrl-C.
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?; // Ctrl+C
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("shutdown: received SIGTERM"),
            _ = sigint.recv()  => tracing::info!("shutdown: received SIGINT"),
            _ = tokio::signal::ctrl_c() => tracing::info!("shutdown: received Ctrl-C"), // fallback
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown: received Ctrl-C");
        Ok(())
    }
}
