//! The `eyre` report printed when `ens-admin` exits with an error.

use crate::errors::dedup_chain;
use eyre::EyreHandler;
use std::{error::Error, fmt};

/// Environment variable switching to the verbose `color-eyre` report.
pub const DEBUG_ENV: &str = "ENS_ADMIN_DEBUG";

/// Prints the error that aborted a procedure, followed by its distinct causes.
///
/// ```text
/// Error: "token.eth" is partially configured: ...
///
/// Caused by:
///   0: resolver assignment was rejected
///   1: execution reverted: not authorised
/// ```
#[derive(Default)]
pub struct Handler {
    verbose: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    /// A handler delegating to `verbose` for `{:?}` output, when set.
    pub fn new(verbose: Option<Box<dyn EyreHandler>>) -> Self {
        Self { verbose }
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&dedup_chain(error).join("; "))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let chain = dedup_chain(error);
        let Some((head, causes)) = chain.split_first() else { return Ok(()) };
        write!(f, "{head}")?;
        if !causes.is_empty() {
            write!(f, "\n\nCaused by:")?;
            for (n, cause) in causes.iter().enumerate() {
                write!(f, "\n  {n}: {cause}")?;
            }
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(verbose) = &mut self.verbose {
            verbose.track_caller(location);
        }
    }
}

/// Installs the [`eyre`] report and panic hooks.
///
/// The plain [`Handler`] is used unless `ENS_ADMIN_DEBUG` is set, in which case reports carry
/// the `color-eyre` span trace and backtrace.
pub fn install() {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    panic_hook.install();
    let eyre_hook = eyre_hook.into_eyre_hook();
    let verbose = std::env::var_os(DEBUG_ENV).is_some();
    let installed = eyre::set_hook(Box::new(move |error| {
        Box::new(Handler::new(verbose.then(|| eyre_hook(error))))
    }));
    if let Err(err) = installed {
        debug!(%err, "eyre hook already installed");
    }
}
