use std::path::Path;

/// Initializes a tracing subscriber writing to stderr, filtered by `RUST_LOG`.
pub fn subscriber() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads a `.env` file from the current directory, if any.
///
/// Variables already present in the environment take precedence.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

/// Loads the given `.env` file, ignoring a missing file.
pub fn load_dotenv_from(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => trace!(?path, "loaded dotenv file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(?path, %err, "failed to load dotenv file"),
    }
}
