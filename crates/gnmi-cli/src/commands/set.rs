//! Set executor: one aggregate mutation exchange.

use std::fs;

use gnmi_proto::{Path, SetRequest, Update, status_codes};

use crate::client::Gnmi;
use crate::error::CliError;

/// Send the queued mutations as a single Set exchange.
///
/// Success is silent. A non-OK status in the response becomes an error
/// carrying the server-supplied message. Per-item response results are not
/// inspected.
///
/// # Errors
///
/// Returns an error if a path is malformed, the exchange fails, or the
/// device reports a non-OK status.
pub async fn run<C: Gnmi>(
    client: &mut C,
    operations: &[crate::ops::Operation],
) -> Result<(), CliError> {
    let request = build_request(operations)?;
    let response = client.set(request).await?;
    match response.message {
        Some(status) if status.code != status_codes::OK => Err(CliError::Device {
            code: status.code,
            message: status.message,
        }),
        _ => Ok(()),
    }
}

/// Assemble the aggregate request, preserving encounter order within each
/// of the delete/update/replace lists.
fn build_request(operations: &[crate::ops::Operation]) -> Result<SetRequest, CliError> {
    use crate::ops::OpKind;

    let mut request = SetRequest::default();
    for op in operations {
        let path = Path::parse(&op.path)?;
        let payload = || resolve_payload(op.value.as_deref().unwrap_or_default());
        match op.kind {
            OpKind::Delete => request.delete.push(path),
            OpKind::Update => request.update.push(Update::json(path, payload())),
            OpKind::Replace => request.replace.push(Update::json(path, payload())),
        }
    }
    Ok(request)
}

/// Resolve a value token to payload bytes.
///
/// A token naming a readable file yields the file's contents; any other
/// token is taken literally. This never fails — an unreadable path is just
/// a literal value.
fn resolve_payload(token: &str) -> Vec<u8> {
    fs::read(token).unwrap_or_else(|_| token.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::commands::mock::MockClient;
    use crate::ops::{OpKind, Operation};
    use gnmi_proto::{SetResponse, Status, TypedValue};

    fn op(kind: OpKind, path: &str, value: Option<&str>) -> Operation {
        Operation {
            kind,
            path: path.into(),
            value: value.map(Into::into),
        }
    }

    #[test]
    fn literal_token_is_the_payload() {
        assert_eq!(resolve_payload(r#"{"k":1}"#), br#"{"k":1}"#.to_vec());
        assert_eq!(resolve_payload("/no/such/file"), b"/no/such/file".to_vec());
    }

    #[test]
    fn readable_file_contents_are_the_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"mtu":9000}"#).unwrap();
        let token = file.path().to_str().unwrap();
        assert_eq!(resolve_payload(token), br#"{"mtu":9000}"#.to_vec());
    }

    #[test]
    fn build_request_routes_kinds_in_encounter_order() {
        let request = build_request(&[
            op(OpKind::Update, "/a", Some("1")),
            op(OpKind::Delete, "/b", None),
            op(OpKind::Update, "/c", Some("2")),
            op(OpKind::Replace, "/d", Some("3")),
        ])
        .unwrap();

        assert_eq!(request.update.len(), 2);
        assert_eq!(request.update[0].path.to_string(), "a");
        assert_eq!(request.update[1].path.to_string(), "c");
        assert_eq!(request.delete.len(), 1);
        assert_eq!(request.delete[0].to_string(), "b");
        assert_eq!(request.replace.len(), 1);
        assert_eq!(request.replace[0].path.to_string(), "d");
    }

    #[test]
    fn build_request_dual_encodes_paths() {
        let request = build_request(&[op(OpKind::Delete, "/a/b[k=v]", None)]).unwrap();
        let path = &request.delete[0];
        assert_eq!(path.element, vec!["a".to_string(), "b[k=v]".to_string()]);
        assert_eq!(path.elem[1].name, "b");
    }

    #[test]
    fn build_request_surfaces_path_errors() {
        let err = build_request(&[op(OpKind::Delete, "/a[broken", None)]).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[tokio::test]
    async fn update_sends_json_payload() {
        let mut client = MockClient::default();

        run(&mut client, &[op(OpKind::Update, "/a/b", Some(r#"{"k":1}"#))])
            .await
            .unwrap();

        let sent = &client.set_requests[0];
        assert_eq!(sent.update.len(), 1);
        assert_eq!(
            sent.update[0].val,
            Some(TypedValue::JsonIetf(r#"{"k":1}"#.into()))
        );
    }

    #[tokio::test]
    async fn ok_status_is_silent_success() {
        let mut client = MockClient {
            set_response: Some(SetResponse {
                message: Some(Status {
                    code: status_codes::OK,
                    message: String::new(),
                }),
            }),
            ..MockClient::default()
        };

        run(&mut client, &[op(OpKind::Delete, "/a", None)]).await.unwrap();
    }

    #[tokio::test]
    async fn missing_status_is_success() {
        let mut client = MockClient::default();
        run(&mut client, &[op(OpKind::Delete, "/a", None)]).await.unwrap();
    }

    #[tokio::test]
    async fn non_ok_status_carries_server_message() {
        let mut client = MockClient {
            set_response: Some(SetResponse {
                message: Some(Status {
                    code: status_codes::NOT_FOUND,
                    message: "no such path".into(),
                }),
            }),
            ..MockClient::default()
        };

        let err = run(&mut client, &[op(OpKind::Delete, "/a", None)])
            .await
            .unwrap_err();

        match err {
            CliError::Device { code, message } => {
                assert_eq!(code, status_codes::NOT_FOUND);
                assert_eq!(message, "no such path");
            }
            other => panic!("expected device error, got {other:?}"),
        }
    }
}
