//! Hierarchical configuration paths.
//!
//! A [`Path`] identifies a node in the device's configuration or state tree.
//! Paths carry a dual encoding for backward wire compatibility: the legacy
//! flat element list (`element`) and the structured element list (`elem`)
//! are both populated at construction time.
//!
//! Path strings use the conventional element syntax, where an element is a
//! name optionally followed by key selectors:
//!
//! ```text
//! /interfaces/interface[name=Ethernet1]/state/counters
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtoError;

/// A single structured path element: a name plus optional keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElem {
    /// Element name.
    pub name: String,
    /// Key selectors, e.g. `interface[name=Ethernet1]`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub key: BTreeMap<String, String>,
}

impl fmt::Display for PathElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (k, v) in &self.key {
            write!(f, "[{k}={v}]")?;
        }
        Ok(())
    }
}

/// A path into the configuration tree, dual-encoded for compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Legacy flat element list (pre-v0.4 wire format).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub element: Vec<String>,
    /// Structured element list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elem: Vec<PathElem>,
}

impl Path {
    /// Build a path from raw element strings, populating both encodings.
    ///
    /// Each element may carry `name[key=value]` selectors. An empty element
    /// list or a malformed element fails with [`ProtoError::InvalidPath`].
    pub fn from_elements(elements: &[String]) -> Result<Self, ProtoError> {
        if elements.is_empty() {
            return Err(ProtoError::InvalidPath("empty path".into()));
        }
        let elem = elements
            .iter()
            .map(|e| parse_element(e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            element: elements.to_vec(),
            elem,
        })
    }

    /// Parse a slash-separated path string.
    pub fn parse(s: &str) -> Result<Self, ProtoError> {
        Self::from_elements(&split_path(s))
    }
}

impl fmt::Display for Path {
    /// Renders the path slash-joined, without a leading slash.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The structured list is authoritative; the flat list is only kept
        // for old devices.
        for (i, elem) in self.elem.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{elem}")?;
        }
        Ok(())
    }
}

/// Split a path string on `/`, ignoring separators inside key selectors.
///
/// Empty segments (leading/trailing/doubled slashes) are dropped, so
/// `/a/b` and `a/b` split identically.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '/' if depth == 0 => {
                if !current.is_empty() {
                    elements.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        elements.push(current);
    }
    elements
}

/// Parse one `name[key=value]...` element into its structured form.
fn parse_element(element: &str) -> Result<PathElem, ProtoError> {
    let (name, mut rest) = match element.find('[') {
        Some(idx) => element.split_at(idx),
        None => (element, ""),
    };
    if name.is_empty() {
        return Err(ProtoError::InvalidPath(format!(
            "element {element:?} has no name"
        )));
    }

    let mut key = BTreeMap::new();
    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('[') else {
            return Err(ProtoError::InvalidPath(format!(
                "unexpected text after keys in {element:?}"
            )));
        };
        let Some(end) = body.find(']') else {
            return Err(ProtoError::InvalidPath(format!(
                "unterminated key in {element:?}"
            )));
        };
        let pair = &body[..end];
        let Some((k, v)) = pair.split_once('=') else {
            return Err(ProtoError::InvalidPath(format!(
                "key {pair:?} in {element:?} is missing '='"
            )));
        };
        if k.is_empty() {
            return Err(ProtoError::InvalidPath(format!(
                "empty key name in {element:?}"
            )));
        }
        key.insert(k.to_string(), v.to_string());
        rest = &body[end + 1..];
    }

    Ok(PathElem {
        name: name.to_string(),
        key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(elements: &[&str]) -> Vec<String> {
        elements.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn split_plain_path() {
        assert_eq!(split_path("/a/b/c"), owned(&["a", "b", "c"]));
        assert_eq!(split_path("a/b/c"), owned(&["a", "b", "c"]));
        assert_eq!(split_path("/a/b/"), owned(&["a", "b"]));
    }

    #[test]
    fn split_keeps_slashes_inside_keys() {
        assert_eq!(
            split_path("/interfaces/interface[name=Ethernet1/2]/state"),
            owned(&["interfaces", "interface[name=Ethernet1/2]", "state"])
        );
    }

    #[test]
    fn split_empty_string() {
        assert!(split_path("").is_empty());
        assert!(split_path("/").is_empty());
    }

    #[test]
    fn from_elements_populates_both_encodings() {
        let path = Path::from_elements(&owned(&["a", "b"])).unwrap();
        assert_eq!(path.element, owned(&["a", "b"]));
        assert_eq!(path.elem.len(), 2);
        assert_eq!(path.elem[0].name, "a");
        assert!(path.elem[0].key.is_empty());
    }

    #[test]
    fn from_elements_parses_keys() {
        let path = Path::from_elements(&owned(&["interface[name=Ethernet1][unit=0]"])).unwrap();
        assert_eq!(path.elem[0].name, "interface");
        assert_eq!(path.elem[0].key.get("name").map(String::as_str), Some("Ethernet1"));
        assert_eq!(path.elem[0].key.get("unit").map(String::as_str), Some("0"));
    }

    #[test]
    fn from_elements_rejects_empty_list() {
        assert!(matches!(
            Path::from_elements(&[]),
            Err(ProtoError::InvalidPath(_))
        ));
    }

    #[test]
    fn from_elements_rejects_malformed_keys() {
        for bad in ["[name=x]", "intf[name=x", "intf[namex]", "intf[=x]"] {
            let err = Path::from_elements(&owned(&[bad])).unwrap_err();
            assert!(matches!(err, ProtoError::InvalidPath(_)), "{bad}");
        }
    }

    #[test]
    fn display_is_slash_joined() {
        let path = Path::parse("/a/b[k=v]/c").unwrap();
        assert_eq!(path.to_string(), "a/b[k=v]/c");
    }

    #[test]
    fn serde_round_trip() {
        let path = Path::parse("/interfaces/interface[name=Ethernet1]").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert!(json.contains("Ethernet1"));
        let parsed: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(path, parsed);
    }
}
