use clap::Parser;
use navtree::cli::args::Cli;
use navtree::cli::commands::execute_command;
use navtree::cli::output;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// Per-call spans of the pure tree helpers; every move and drop opens several.
const CHATTY_TARGETS: [&str; 2] = ["navtree::domain::mutator", "navtree::domain::arena"];

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // tree helper spans only show at -ddd
    let show_chatty = filter == LevelFilter::TRACE;
    let module_filter = filter_fn(move |metadata| {
        show_chatty
            || !CHATTY_TARGETS
                .iter()
                .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    if filter > LevelFilter::WARN {
        tracing::info!("log level: {}", filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree::util::testing;
    use tracing::info;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        use clap::CommandFactory;
        Cli::command().debug_assert();
        info!("Debug mode: info");
    }
}
