use std::net::{IpAddr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veg_store_backend::{
    AppState,
    config::Config,
    i18n::Translator,
    infrastructure::auth::JwtManager,
    lifecycle::Lifecycle,
    middleware::install_panic_hook,
    router::create_router,
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
    install_panic_hook();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Running in '{}' mode", config.mode);

    let translator = Translator::load_dir(&config.i18n_dir, &config.default_locale)
        .expect("Failed to load i18n messages");

    // 密钥加载失败无法提供服务
    let jwt = JwtManager::from_config(&config.jwt).expect("Failed to load JWT key pair");

    let state = AppState::new(config, translator, jwt);

    let mut lifecycle = Lifecycle::new();
    for component in state.components() {
        lifecycle.register(component);
    }
    lifecycle.start_all().expect("Failed to start components");

    let app = create_router(state.clone());

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}{}", addr, state.config.api_path());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    tracing::info!("Shutting down server...");
    lifecycle.stop_all();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
