//! Subscribe executor: a long-lived streaming exchange.
//!
//! Lifecycle: open the channel, send the subscribe request, await the
//! initial sync, then print each update batch as it arrives until the
//! stream ends. The channel is closed on every exit path — success, error,
//! or Ctrl-C.

use std::io::Write;

use gnmi_proto::{SubscribeRequest, SubscribeResponse, split_path};

use crate::client::{Gnmi, SubscribeSession};
use crate::error::CliError;

/// Stream live changes for the given paths, printing each update as
/// `path = value` in arrival order, with no buffering or deduplication.
///
/// # Errors
///
/// Returns an error on a device Error response (message surfaced
/// verbatim), a failed initial sync, or any transport failure other than
/// clean end-of-stream.
pub async fn run<C: Gnmi, W: Write>(
    client: C,
    out: &mut W,
    paths: &[String],
) -> Result<(), CliError> {
    let split: Vec<Vec<String>> = paths.iter().map(|p| split_path(p)).collect();
    let request = SubscribeRequest::from_paths(&split)?;

    let mut session = client.subscribe(request).await?;
    let outcome = tokio::select! {
        result = stream_updates(&mut session, out) => result,
        _ = tokio::signal::ctrl_c() => Ok(()),
    };
    // Tear the channel down whichever way the loop ended.
    let closed = session.close().await;
    outcome.and(closed)
}

async fn stream_updates<S: SubscribeSession, W: Write>(
    session: &mut S,
    out: &mut W,
) -> Result<(), CliError> {
    loop {
        match session.recv().await? {
            None => return Ok(()),
            Some(SubscribeResponse::Error { error }) => {
                return Err(CliError::Device {
                    code: error.code,
                    message: error.message,
                });
            }
            Some(SubscribeResponse::SyncResponse { sync_response }) => {
                if !sync_response {
                    return Err(CliError::Protocol("initial sync failed".into()));
                }
            }
            Some(SubscribeResponse::Update { update }) => {
                for u in &update.update {
                    writeln!(out, "{} = {}", u.path, u.display_value())?;
                }
            }
        }
    }
}
