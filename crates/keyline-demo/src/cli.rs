#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Flags use the `--name=value` form. Each value-taking flag has a
//! `KEYLINE_DEMO_*` environment override; explicit flags win, and malformed
//! environment values are ignored.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
keyline demo: a password screen whose submit button follows the keyboard

USAGE:
    keyline-demo [OPTIONS]

OPTIONS:
    --screen=WxH          Screen size in points (default: 375x667)
    --safe-bottom=N       Bottom safe-area inset; >0 means a notched device (default: 0)
    --safe-top=N          Top safe-area inset (default: 20)
    --keyboard-height=N   Keyboard height in points (default: 216)
    --margin=N            Gap between button and keyboard (default: 16)
    --script=PATH         Replay host notifications from a JSONL file
    --jsonl               Print layout snapshots as JSONL
    --log-json            Emit logs as JSON on stderr
    --help, -h            Show this help message
    --version, -V         Show version

ENVIRONMENT VARIABLES:
    KEYLINE_DEMO_SCREEN           Override --screen
    KEYLINE_DEMO_SAFE_BOTTOM      Override --safe-bottom
    KEYLINE_DEMO_SAFE_TOP         Override --safe-top
    KEYLINE_DEMO_KEYBOARD_HEIGHT  Override --keyboard-height
    KEYLINE_DEMO_MARGIN           Override --margin
    KEYLINE_DEMO_SCRIPT           Override --script
    KEYLINE_DEMO_JSONL            Enable JSONL output (1/true)
    KEYLINE_REACTIVATION          Broker reactivation policy: resubscribe|keep
    KEYLINE_BROKER_LABEL          Broker name in logs
    KEYLINE_LOG                   Log filter (e.g. debug, keyline_runtime=trace)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Screen width in points.
    pub screen_width: f64,
    /// Screen height in points.
    pub screen_height: f64,
    /// Bottom safe-area inset.
    pub safe_bottom: f64,
    /// Top safe-area inset.
    pub safe_top: f64,
    /// Keyboard height in points.
    pub keyboard_height: f64,
    /// Gap between the button and what it rests on.
    pub margin: f64,
    /// JSONL host script to replay instead of the built-in session.
    pub script: Option<String>,
    /// Print snapshots as JSONL.
    pub jsonl: bool,
    /// Emit logs as JSON.
    pub log_json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Help => f.write_str("help requested"),
            Self::Version => f.write_str("version requested"),
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArg(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Default for Opts {
    fn default() -> Self {
        Self {
            screen_width: 375.0,
            screen_height: 667.0,
            safe_bottom: 0.0,
            safe_top: 20.0,
            keyboard_height: 216.0,
            margin: 16.0,
            script: None,
            jsonl: false,
            log_json: false,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("keyline-demo {VERSION}");
                process::exit(0);
            }
            Err(err @ ParseError::InvalidValue { .. }) => {
                eprintln!("{err}");
                process::exit(1);
            }
            Err(err @ ParseError::UnknownArg(_)) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    pub fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("KEYLINE_DEMO_SCREEN")
            && let Some((w, h)) = parse_size(&val)
        {
            opts.screen_width = w;
            opts.screen_height = h;
        }
        if let Some(val) = get_env("KEYLINE_DEMO_SAFE_BOTTOM")
            && let Some(n) = parse_points(&val)
        {
            opts.safe_bottom = n;
        }
        if let Some(val) = get_env("KEYLINE_DEMO_SAFE_TOP")
            && let Some(n) = parse_points(&val)
        {
            opts.safe_top = n;
        }
        if let Some(val) = get_env("KEYLINE_DEMO_KEYBOARD_HEIGHT")
            && let Some(n) = parse_points(&val)
        {
            opts.keyboard_height = n;
        }
        if let Some(val) = get_env("KEYLINE_DEMO_MARGIN")
            && let Some(n) = parse_points(&val)
        {
            opts.margin = n;
        }
        if let Some(val) = get_env("KEYLINE_DEMO_SCRIPT")
            && !val.trim().is_empty()
        {
            opts.script = Some(val);
        }
        if let Some(val) = get_env("KEYLINE_DEMO_JSONL") {
            opts.jsonl = val == "1" || val.eq_ignore_ascii_case("true");
        }

        for arg in args {
            let arg = arg.as_ref();
            let (flag, value) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (arg, None),
            };
            match (flag, value) {
                ("--help" | "-h", None) => return Err(ParseError::Help),
                ("--version" | "-V", None) => return Err(ParseError::Version),
                ("--jsonl", None) => opts.jsonl = true,
                ("--log-json", None) => opts.log_json = true,
                ("--screen", Some(v)) => {
                    let (w, h) = parse_size(v).ok_or_else(|| invalid("--screen", v))?;
                    opts.screen_width = w;
                    opts.screen_height = h;
                }
                ("--safe-bottom", Some(v)) => {
                    opts.safe_bottom = parse_points(v).ok_or_else(|| invalid("--safe-bottom", v))?;
                }
                ("--safe-top", Some(v)) => {
                    opts.safe_top = parse_points(v).ok_or_else(|| invalid("--safe-top", v))?;
                }
                ("--keyboard-height", Some(v)) => {
                    opts.keyboard_height =
                        parse_points(v).ok_or_else(|| invalid("--keyboard-height", v))?;
                }
                ("--margin", Some(v)) => {
                    opts.margin = parse_points(v).ok_or_else(|| invalid("--margin", v))?;
                }
                ("--script", Some(v)) if !v.is_empty() => opts.script = Some(v.to_owned()),
                ("--script", Some(v)) => return Err(invalid("--script", v)),
                _ => return Err(ParseError::UnknownArg(arg.to_owned())),
            }
        }

        Ok(opts)
    }
}

fn invalid(flag: &'static str, value: &str) -> ParseError {
    ParseError::InvalidValue {
        flag,
        value: value.to_owned(),
    }
}

/// Non-negative finite number of points.
fn parse_points(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}

/// `WxH` with both sides positive.
fn parse_size(value: &str) -> Option<(f64, f64)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w = parse_points(w).filter(|n| *n > 0.0)?;
    let h = parse_points(h).filter(|n| *n > 0.0)?;
    Some((w, h))
}
