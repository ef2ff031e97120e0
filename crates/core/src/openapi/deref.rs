//! Internal `$ref` resolution.
//!
//! Produces a copy of the document in which every internal JSON pointer
//! (`#/components/schemas/...`) is replaced by the object it points at.
//! External references are left untouched.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

pub fn dereference(root: &Value) -> Result<Value> {
    let mut stack = Vec::new();
    resolve(root, root, &mut stack)
}

fn resolve(node: &Value, root: &Value, stack: &mut Vec<String>) -> Result<Value> {
    if let Some(pointer) = ref_target(node) {
        if !pointer.starts_with("#/") {
            return Ok(node.clone());
        }
        if stack.iter().any(|seen| seen == pointer) {
            return Err(Error::SpecDereferenceFailed {
                pointer: pointer.to_string(),
                reason: "circular reference".to_string(),
            });
        }
        let target = lookup(root, pointer).ok_or_else(|| Error::SpecDereferenceFailed {
            pointer: pointer.to_string(),
            reason: "target not found".to_string(),
        })?;
        stack.push(pointer.to_string());
        let resolved = resolve(target, root, stack)?;
        stack.pop();
        return Ok(resolved);
    }

    match node {
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, value) in map {
                out.insert(key.clone(), resolve(value, root, stack)?);
            }
            Ok(Value::Mapping(out))
        }
        Value::Sequence(seq) => {
            let items = seq
                .iter()
                .map(|item| resolve(item, root, stack))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Sequence(items))
        }
        other => Ok(other.clone()),
    }
}

/// A mapping whose `$ref` entry is a string is a reference node; the whole
/// node is replaced by its target.
fn ref_target(node: &Value) -> Option<&str> {
    node.get("$ref").and_then(Value::as_str)
}

fn lookup<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = root;
    for token in pointer.trim_start_matches("#/").split('/') {
        // RFC 6901 escaping, in this order.
        let token = token.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Mapping(_) => current.get(token.as_str())?,
            Value::Sequence(seq) => seq.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
