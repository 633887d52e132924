use serde_json_bytes::Value;

use crate::json_ext::ValueExt;
use crate::store::NodeStore;
use crate::ResolveError;

pub(crate) const FILE_NODE_TYPE: &str = "File";

/// Resolves relative file path(s) stored on `source` into the file
/// entity/entities they point at.
///
/// The same null and already-materialized guards as by-reference
/// resolution apply. Paths resolve against the directory of the nearest
/// ancestor file entity of the source; matching runs as an in-memory scan
/// over one listing of all file entities, never one call per path. Lists
/// resolve element-wise, nested lists included, and an element with no
/// match resolves to null.
#[tracing::instrument(skip_all, level = "trace")]
pub async fn file_by_path(
    store: &dyn NodeStore,
    source: &Value,
    field_name: &str,
    from: Option<&str>,
) -> Result<Value, ResolveError> {
    let source_field = from.unwrap_or(field_name);
    let raw = match source.get_path(source_field) {
        Some(value) if !value.is_null() => value,
        _ => return Ok(Value::Null),
    };
    if raw.is_materialized() {
        return Ok(raw.clone());
    }

    let ancestor = store
        .find_root_node_ancestor(source, &is_file_node)
        .await?;
    let dir = match ancestor.as_ref().and_then(|file| file.get_path("dir")).and_then(Value::as_str) {
        Some(dir) => dir.to_string(),
        None => {
            failfast_debug!("no ancestor file entity found for '{}'", source_field);
            return Ok(Value::Null);
        }
    };

    let files = store.get_all_nodes(FILE_NODE_TYPE).await?;
    Ok(resolve_paths(raw, &dir, &files))
}

fn is_file_node(node: &Value) -> bool {
    node.get_path("internal.type").and_then(Value::as_str) == Some(FILE_NODE_TYPE)
}

fn resolve_paths(raw: &Value, dir: &str, files: &[Value]) -> Value {
    match raw {
        Value::Array(values) => Value::Array(
            values
                .iter()
                .map(|value| resolve_paths(value, dir, files))
                .collect(),
        ),
        Value::String(relative) => {
            let absolute = join_and_normalize(dir, relative.as_str());
            files
                .iter()
                .find(|file| {
                    file.get_path("absolutePath").and_then(Value::as_str)
                        == Some(absolute.as_str())
                })
                .cloned()
                .unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

/// Joins `relative` onto `base` and normalizes `.`/`..` segments into a
/// forward-slash absolute path.
fn join_and_normalize(base: &str, relative: &str) -> String {
    let joined = if relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("{}/{}", base, relative)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}
