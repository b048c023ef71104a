use {
    anyhow::{Context, Result},
    flexi_logger::{
        DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle, Record,
        WriteMode,
    },
    regex::Regex,
    std::{fmt::Write as FmtWrite, sync::OnceLock},
    textwrap::{termwidth, Options},
};

/// Keeps the async writer alive for the life of the process.
static LOGGER_HANDLE: OnceLock<LoggerHandle> = OnceLock::new();

/// Matches the final wrapped line so it can get the closing marker.
static LAST_LINE_MATCHER: OnceLock<Regex> = OnceLock::new();

/// Setup pretty console and file logging.
///
/// The level comes from RUST_LOG and defaults to `debug`. Everything is
/// written to `logs/`, and debug or more severe messages are duplicated to
/// stdout. Calling this more than once is harmless.
pub fn setup() -> Result<()> {
    if LOGGER_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = Logger::try_with_env_or_str("debug")
        .context("Invalid log specification")?
        .log_to_file(FileSpec::default().directory("logs"))
        .format(multiline_format)
        .duplicate_to_stdout(Duplicate::Debug)
        .write_mode(WriteMode::Async)
        .start()
        .context("Unable to start the logger")?;

    if LOGGER_HANDLE.set(handle).is_err() {
        log::debug!("Logger was already initialized");
    }
    log::info!("Adjust the log level by setting RUST_LOG");
    Ok(())
}

/// A multiline log format for flexi_logger.
///
/// Logs are automatically wrapped at terminal width and prefixed with unicode
/// so it's easy to tell where a big log statement begins and ends.
pub fn multiline_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let mut full_line = String::new();
    write!(
        full_line,
        "{} [{}] [{}:{}]\n{}",
        record.level(),
        now.now().format("%H:%M:%S%.6f"),
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
        record.args(),
    )
    .map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::Other, "unable to format log")
    })?;

    writeln!(w, "{}", wrap_block(&full_line, termwidth().min(74)))
}

/// Wrap text to the given width, marking the first, middle, and last lines.
fn wrap_block(text: &str, width: usize) -> String {
    let wrap_options = Options::new(width)
        .initial_indent("┏ ")
        .subsequent_indent("┃ ");
    let wrapped = textwrap::fill(text, wrap_options);

    let matcher = LAST_LINE_MATCHER.get_or_init(|| {
        Regex::new(r"(┃)(.*)$").expect("the last line pattern is valid")
    });
    matcher.replace(&wrapped, "┗$2").into_owned()
}
