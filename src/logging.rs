use log::LevelFilter;

use crate::stderr_buffer::BufferedStderr;

/// Install the global logger.
///
/// Warnings and errors are shown by default, everything down to debug with
/// `verbose`; `RUST_LOG` refines either. Output goes through the stderr
/// buffer so it is held back while the worksheet owns the terminal.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Pipe(Box::new(BufferedStderr::default())))
        .try_init();

    if let Err(e) = result {
        crate::buffered_eprintln!("Logger already initialized: {}", e);
    }
}
