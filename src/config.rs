use std::ffi::OsString;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "healthcheck",
    about = "Check that a webapp answers over HTTP(S)",
    long_about = None,
    disable_version_flag = true
)]
pub struct Config {
    /// webapp listen port
    #[arg(long, allow_hyphen_values = true, default_value_t = 8080, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// webapp listen address
    #[arg(long, allow_hyphen_values = true, default_value = "127.0.0.1")]
    pub address: String,

    /// ignore certificate errors
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true")]
    pub insecure: bool,

    /// emit additional information
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true")]
    pub verbose: bool,

    /// show the application version
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true")]
    pub version: bool,

    /// connect to webapp using TLS
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true")]
    pub tls: bool,
}

impl Config {
    /// Parses the process arguments, exiting with a usage message on error.
    pub fn from_env() -> Self {
        match Self::try_from_args(std::env::args_os()) {
            Ok(config) => config,
            Err(err) => err.exit(),
        }
    }

    /// Parses `args` (program name first), accepting both `-flag` and `--flag`.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// Rewrites single-dash long flags (`-port`) into the double-dash form clap
/// expects. Single-character flags such as `-h` are left alone, as is the
/// value following `-port`/`-address`, and nothing after a bare `--` is touched.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut flags_done = false;
    let mut value_next = false;

    for arg in args {
        if flags_done || std::mem::take(&mut value_next) {
            normalized.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("--") => {
                flags_done = true;
                normalized.push(arg);
            }
            Some(flag) if is_single_dash_long(flag) => {
                value_next = takes_separate_value(&flag[1..]);
                normalized.push(OsString::from(format!("-{flag}")));
            }
            Some(flag) => {
                value_next = flag.strip_prefix("--").is_some_and(takes_separate_value);
                normalized.push(arg);
            }
            None => normalized.push(arg),
        }
    }

    normalized
}

fn takes_separate_value(name: &str) -> bool {
    VALUE_FLAGS.contains(&name)
}

const VALUE_FLAGS: [&str; 2] = ["port", "address"];

fn is_single_dash_long(arg: &str) -> bool {
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    !name.starts_with('-')
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.split('=').next().is_some_and(|flag| flag.len() > 1)
}
