#![forbid(unsafe_code)]

//! keyline demo binary entry point.

use std::path::Path;

use keyline_core::logging::{LOG_FILTER_ENV, init_json_logging};
use keyline_demo::cli::Opts;
use keyline_demo::session::{Session, StepReport, default_steps, load_script};
use keyline_runtime::BrokerConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_logging(json: bool) {
    if json {
        init_json_logging("warn");
        return;
    }
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_report(report: &StepReport, jsonl: bool) {
    if jsonl {
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "cannot encode snapshot"),
        }
        return;
    }
    let layout = &report.layout;
    println!(
        "{:<22} delivered={} button={} content_height={} keyboard={} listening={}",
        report.step,
        report.delivered,
        layout.button_frame(),
        layout.content_height,
        if layout.keyboard_visible { "up" } else { "down" },
        layout.listening,
    );
}

fn main() {
    let opts = Opts::parse();
    init_logging(opts.log_json);

    let parsed = BrokerConfig::from_env_with_diagnostics();
    for error in &parsed.errors {
        warn!(%error, "ignoring broker setting");
    }

    let steps = match &opts.script {
        Some(path) => match load_script(Path::new(path)) {
            Ok(steps) => steps,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => default_steps(opts.keyboard_height),
    };

    let session = Session::new(&opts, parsed.config);
    for step in &steps {
        print_report(&session.run_step(step), opts.jsonl);
    }
}
