use std::process;

use healthcheck::probe::{build_client, check, Target, VERSION};
use healthcheck::telemetry::init_telemetry;
use healthcheck::Config;
use tracing::debug;

/// Prints the message on stdout and terminates with the given code.
macro_rules! exit_with {
    ($code:expr, $fmt:expr $(, $arg:expr)*) => {
        {
            println!($fmt $(, $arg)*);
            process::exit($code);
        }
    };
}

fn main() {
    let config = Config::from_env();

    if config.version {
        println!("{VERSION}");
        process::exit(0);
    }

    if let Err(err) = init_telemetry() {
        eprintln!("{err:#}");
    }
    debug!(?config, "starting health check");

    let target = Target::new(config.address.as_str(), config.port, config.tls);

    let client = match build_client(config.insecure) {
        Ok(client) => client,
        Err(err) => exit_with!(1, "Invalid client configuration: {}", err),
    };

    let request = match target.request() {
        Ok(request) => request,
        Err(err) => exit_with!(1, "Invalid request configuration: {}", err),
    };

    if let Err(err) = check(&client, request) {
        debug!(check_failure = err.is_check_failure(), "target is unhealthy");
        exit_with!(1, "Webapp ({}) is not reachable: {}", target, err);
    }

    if config.verbose {
        println!("Webapp ({target}) is accessible");
    }
    debug!("target is healthy");
    process::exit(0);
}

