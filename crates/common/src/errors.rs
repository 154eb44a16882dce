//! Error chain rendering.
//!
//! RPC, signer and contract errors often repeat their cause in their own message. The helpers
//! here drop those repeats so an aborted procedure reports each cause once.

use std::error::Error;

/// Returns the messages of `error` and its sources, outermost first, without repeats.
///
/// A cause is dropped when the message right before it already contains it.
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    let mut cause = Some(error);
    while let Some(error) = cause {
        let message = error.to_string().trim().to_string();
        if !messages.last().is_some_and(|last| last.contains(&message)) {
            messages.push(message);
        }
        cause = error.source();
    }
    messages
}

/// Joins [`dedup_chain`] on a single line, for log fields.
pub fn display_chain(error: &(dyn Error + 'static)) -> String {
    dedup_chain(error).join("; ")
}
