use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Env;

/// Install the global tracing subscriber for `env`.
///
/// `local` logs human-readable text at debug, `dev` JSON at debug and `prod`
/// JSON at info. `RUST_LOG` overrides the level filter in every environment.
pub fn init(env: Env) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(env).into());

    let (text, json) = match env {
        Env::Local => (Some(tracing_subscriber::fmt::layer()), None),
        Env::Dev | Env::Prod => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()?;

    Ok(())
}

fn default_directives(env: Env) -> &'static str {
    match env {
        Env::Local | Env::Dev => "kv_gateway=debug,tower_http=debug",
        Env::Prod => "kv_gateway=info,tower_http=info",
    }
}
