//! textshield CLI - password-based text encryption
//!
//! Command-line frontend for encrypting and decrypting short text with
//! PBKDF2-HMAC-SHA256 key derivation and AES-256-GCM.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use textshield::config::{DEFAULT_ITERATIONS, DEFAULT_MIN_PASSWORD_LEN};
use textshield::error::{ErrorKind, Result};
use textshield::notice::{Notice, Notifier, WriterNotifier};
use textshield::password::{PasswordReader, ReaderPasswordReader, TerminalPasswordReader};
use textshield::text_ops::{self, TextSink, TextSource};
use textshield::{ErrorCategory, Shield, ShieldConfig, ShieldError};

#[derive(Parser)]
#[command(name = "textshield")]
#[command(version)]
#[command(about = "Password-based text encryption.", long_about = None)]
struct Cli {
    /// Read password from stdin instead of from terminal
    #[arg(long, global = true)]
    password_stdin: bool,

    /// Read password from a file instead of from terminal
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "password_stdin")]
    password_file: Option<PathBuf>,

    /// PBKDF2 iteration count; tokens only decrypt with the count that made them
    #[arg(long, global = true, env = "TEXTSHIELD_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Minimum password length (in characters) accepted for encryption
    #[arg(long, global = true, env = "TEXTSHIELD_MIN_PASSWORD_LEN", default_value_t = DEFAULT_MIN_PASSWORD_LEN)]
    min_password_len: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TEXTSHIELD_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text
    #[command(alias = "e")]
    Encrypt {
        #[command(flatten)]
        args: IoArgs,
    },

    /// Decrypt a token
    #[command(alias = "d")]
    Decrypt {
        #[command(flatten)]
        args: IoArgs,
    },
}

#[derive(clap::Args)]
struct IoArgs {
    /// Text to process, given directly on the command line
    #[arg(short, long, value_name = "TEXT", conflicts_with = "input")]
    text: Option<String>,

    /// Path to the file whose contents is to be processed (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to the file to write the result to (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl IoArgs {
    fn source(&self) -> TextSource {
        match (&self.text, &self.input) {
            (Some(text), _) => TextSource::Inline(text.clone()),
            (None, Some(path)) => TextSource::File(path.clone()),
            (None, None) => TextSource::Stdin,
        }
    }

    fn sink(&self) -> TextSink {
        match &self.output {
            Some(path) => TextSink::File(path.clone()),
            None => TextSink::Stdout,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let mut notifier = WriterNotifier::new(io::stderr());
    let (notice, failed) = match run(&cli) {
        Ok(notice) => (notice, false),
        Err(e) => {
            tracing::debug!(kind = ?e.kind, category = ?e.category, "operation failed");
            (Notice::from_error(&e), true)
        }
    };

    // Nowhere left to report a failure to write to stderr.
    let _ = notifier.notify(&notice);

    if failed {
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<Notice> {
    let config = ShieldConfig::default()
        .with_iterations(cli.iterations)
        .with_min_password_len(cli.min_password_len);
    config.validate()?;
    let shield = Shield::new(config);

    match &cli.command {
        Commands::Encrypt { args } => {
            let source = args.source();
            let mut reader = get_password_reader(cli, &source)?;
            text_ops::encrypt_text(&source, &args.sink(), &mut *reader, &shield)?;
            Ok(Notice::encrypted())
        }
        Commands::Decrypt { args } => {
            let source = args.source();
            let mut reader = get_password_reader(cli, &source)?;
            text_ops::decrypt_text(&source, &args.sink(), &mut *reader, &shield)?;
            Ok(Notice::decrypted())
        }
    }
}

fn get_password_reader(cli: &Cli, source: &TextSource) -> Result<Box<dyn PasswordReader>> {
    if let Some(path) = &cli.password_file {
        let file = File::open(path).map_err(|e| {
            ShieldError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::PasswordUnavailable,
                format!("failed to open password file {}", path.display()),
                e,
            )
        })?;
        return Ok(Box::new(ReaderPasswordReader::new(Box::new(file))));
    }
    if !cli.password_stdin {
        return Ok(Box::new(TerminalPasswordReader));
    }
    if matches!(source, TextSource::Stdin) {
        return Err(ShieldError::new(
            ErrorCategory::User,
            "cannot read both text and password from stdin; pass --text or --input",
        ));
    }
    Ok(Box::new(ReaderPasswordReader::new(Box::new(io::stdin()))))
}

fn setup_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to set up logging: {}", e);
    }
}
