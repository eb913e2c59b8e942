//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Env;

/// Install the global subscriber for the given environment.
///
/// `local` gets human-readable output at debug level, `dev` JSON at debug,
/// `prod` JSON at info. `RUST_LOG` overrides the level filter.
pub fn init(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(env).into());

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Local => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        Env::Dev | Env::Prod => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .init(),
    }
}

fn default_directives(env: Env) -> &'static str {
    match env {
        Env::Local | Env::Dev => "debug,hyper=info,sqlx=info,tower_http=debug",
        Env::Prod => "info",
    }
}
