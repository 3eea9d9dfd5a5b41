//! Get executor: one request/response exchange.

use std::io::Write;

use gnmi_proto::{GetRequest, split_path};

use crate::client::Gnmi;
use crate::error::CliError;

/// Read the given paths once and print every returned update as the path
/// (slash-joined) followed by the decoded value text.
///
/// # Errors
///
/// Returns an error if a path is malformed or the exchange fails; transport
/// and decode errors are surfaced unmodified, with no retry.
pub async fn run<C: Gnmi, W: Write>(
    client: &mut C,
    out: &mut W,
    paths: &[String],
) -> Result<(), CliError> {
    let split: Vec<Vec<String>> = paths.iter().map(|p| split_path(p)).collect();
    let request = GetRequest::from_paths(&split)?;
    let response = client.get(request).await?;
    for notification in &response.notification {
        for update in &notification.update {
            writeln!(out, "{}:", update.path)?;
            writeln!(out, "{}", update.display_value())?;
        }
    }
    Ok(())
}
