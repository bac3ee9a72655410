use std::{net::SocketAddr, process, sync::Arc, time::Duration};

use blogd::{
    application::{error::AppError, posts::PostService, store::PostStore},
    config,
    domain::validate::PostDefaults,
    infra::{
        error::InfraError,
        http::{self, ApiRateLimiter, ApiState},
        store::FileStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let store: Arc<dyn PostStore> = Arc::new(FileStore::new(settings.store.data_file.clone()));
    let posts = Arc::new(PostService::new(
        store,
        PostDefaults {
            author: settings.posts.default_author.clone(),
            image: settings.posts.placeholder_image.clone(),
        },
    ));

    let rate_limiter = Arc::new(ApiRateLimiter::new(
        Duration::from_secs(settings.rate_limit.window_seconds.get().into()),
        settings.rate_limit.max_requests.get(),
    ));

    let state = ApiState {
        posts,
        api_key: settings.auth.api_key.as_str().into(),
        rate_limiter,
    };

    let router = http::build_router(state, &settings.cors);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "blogd::server",
        addr = %settings.server.addr,
        data_file = %settings.store.data_file.display(),
        "listening"
    );

    let drain = settings.server.graceful_shutdown;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        wait_for_shutdown_signal().await;
        info!(target = "blogd::server", "shutdown signal received, draining");
        // Keep answering health checks while load balancers notice the drain.
        tokio::time::sleep(drain).await;
    })
    .await
    .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let sigterm = signal(SignalKind::terminate());
        let sigint = signal(SignalKind::interrupt());
        match (sigterm, sigint) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
