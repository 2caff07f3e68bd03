use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use signet::ClientFactory;
use signet_axum::{pages::LogoutDelays, router, AppState, SiteConfig};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Serves the OAuth sign-in demonstration site
///
/// The authentication service is configured through the `SERVICE_ENDPOINT`
/// and `PROJECT_ID` environment variables, which are read on first use.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opts {
    /// The address to listen on
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// The origin browsers use to reach the site, if it differs from the
    /// `Host` header (for example, behind a proxy)
    #[arg(long, env = "PUBLIC_ORIGIN")]
    public_origin: Option<Url>,

    /// Seconds to wait before leaving the logout page after signing out
    #[arg(long, env = "LOGOUT_SUCCESS_DELAY", default_value_t = 1)]
    logout_success_delay: u64,

    /// Seconds to wait before leaving the logout page when signing out fails
    #[arg(long, env = "LOGOUT_ERROR_DELAY", default_value_t = 2)]
    logout_error_delay: u64,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();

    let site = SiteConfig {
        public_origin: opts.public_origin,
        logout_delays: LogoutDelays {
            success: Duration::from_secs(opts.logout_success_delay),
            error: Duration::from_secs(opts.logout_error_delay),
        },
    };

    let state = AppState::new(ClientFactory::from_env(), site)?;

    let listener = tokio::net::TcpListener::bind(opts.listen).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn shutdown_future_can_move_between_threads() {
        assert_send(&shutdown_signal());
    }
}
