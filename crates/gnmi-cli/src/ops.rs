//! Operation queue parsing.
//!
//! Turns the flat token sequence following the flags into a single intent:
//! either a read (`get`/`subscribe`, which consume every remaining token as
//! a path), or an ordered queue of mutations for one Set exchange. Grammar
//! violations fail with [`CliError::Usage`] before anything is dialed.

use crate::error::CliError;

/// Kind of a queued mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Merge the value into existing state.
    Update,
    /// Replace the subtree with the value.
    Replace,
    /// Remove the subtree.
    Delete,
}

/// One queued mutation. `value` is present iff the kind is not
/// [`OpKind::Delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Mutation kind.
    pub kind: OpKind,
    /// Raw path token.
    pub path: String,
    /// Raw value token (a JSON string or a file path).
    pub value: Option<String>,
}

/// What one invocation intends to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// One-shot read of the given path tokens.
    Get(Vec<String>),
    /// Streaming subscription to the given path tokens.
    Subscribe(Vec<String>),
    /// One Set exchange built from the queued mutations.
    Set(Vec<Operation>),
}

/// Parse the token sequence left to right.
///
/// `get` and `subscribe` terminate parsing immediately and are rejected if
/// any mutation is already queued; `capabilities` is always rejected (the
/// operation is unsupported by design); mutation keywords consume their
/// path (and value) tokens; anything else is an unknown operation.
pub fn parse_operations(args: &[String]) -> Result<Intent, CliError> {
    let mut ops: Vec<Operation> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let token = args[i].as_str();
        match token {
            "capabilities" | "get" | "subscribe" if !ops.is_empty() => {
                return Err(CliError::Usage(format!(
                    "'{token}' not allowed after 'update|replace|delete'"
                )));
            }
            "capabilities" => {
                return Err(CliError::Usage("'capabilities' not supported".into()));
            }
            "get" => return Ok(Intent::Get(args[i + 1..].to_vec())),
            "subscribe" => return Ok(Intent::Subscribe(args[i + 1..].to_vec())),
            "update" | "replace" | "delete" => {
                let kind = match token {
                    "update" => OpKind::Update,
                    "replace" => OpKind::Replace,
                    _ => OpKind::Delete,
                };
                i += 1;
                let Some(path) = args.get(i) else {
                    return Err(CliError::Usage("missing path".into()));
                };
                let value = if kind == OpKind::Delete {
                    None
                } else {
                    i += 1;
                    let Some(value) = args.get(i) else {
                        return Err(CliError::Usage("missing JSON".into()));
                    };
                    Some(value.clone())
                };
                ops.push(Operation {
                    kind,
                    path: path.clone(),
                    value,
                });
            }
            _ => {
                return Err(CliError::Usage(format!("unknown operation {token:?}")));
            }
        }
        i += 1;
    }
    if ops.is_empty() {
        return Err(CliError::Usage("no operations specified".into()));
    }
    Ok(Intent::Set(ops))
}
