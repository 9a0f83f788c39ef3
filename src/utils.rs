use std::io::{self, BufRead, Write};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global tracing subscriber; `RUST_LOG` overrides `default_filter`
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    // A subscriber may already be installed (tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Print `message` and read one trimmed line of input
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> io::Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt user for yes/no input
pub fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> io::Result<bool> {
    let answer = prompt_line(input, output, message)?;
    Ok(answer.to_lowercase().starts_with('y'))
}
