/* Tracing setup shared by both binaries */

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/* Install a stderr subscriber. `RUST_LOG` wins over `default_directive`.
 *
 * stdout is reserved: the plugin writes its response there, and
 * `cobra-gen analyze` prints the IR there. */
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
