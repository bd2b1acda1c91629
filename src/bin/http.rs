use git_smart_http::config::GitConfig;
use git_smart_http::http::HttpServer;
use git_smart_http::serve::AppCore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GitConfig::load()?;
    tracing::info!(
        project_root = %config.project_root.display(),
        git_path = %config.git_path.display(),
        upload_pack = config.upload_pack,
        receive_pack = config.receive_pack,
        "starting git smart http server"
    );

    let server = HttpServer::new(
        config.http.addr.clone(),
        config.http.port,
        AppCore::new(config),
    );
    server.run().await
}
