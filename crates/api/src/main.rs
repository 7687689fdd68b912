use anyhow::Context;

use jobscroll_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobscroll_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;
    let app = jobscroll_api::app::build_app(&settings).await?;

    let listener = tokio::net::TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
