//! Key path lookup inside nested gate trees
//!
//! A path is a sequence of segments separated by `.` or `/`
//! (`workspaces.preprocess-enabled`, `atoms/filters`). Segments are opaque
//! strings; a numeric segment also indexes into arrays. Absence is a normal
//! outcome and never an error.

use serde_json::Value;

use crate::Gates;

/// Split a path into its non-empty segments
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['.', '/']).filter(|segment| !segment.is_empty())
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Look up `path` inside a gates mapping
///
/// Returns `None` when any segment is missing, when an intermediate node is
/// a scalar, or when the path has no segments at all.
pub fn resolve_in<'a>(gates: &'a Gates, path: &str) -> Option<&'a Value> {
    let mut segments = segments(path);
    let first = gates.get(segments.next()?)?;
    segments.try_fold(first, step)
}

/// Owned lookup with a fallback used only when the path is absent
///
/// A present `null` is returned as-is; the default does not replace it.
pub fn resolve_or(gates: &Gates, path: &str, default: Option<Value>) -> Option<Value> {
    resolve_in(gates, path).cloned().or(default)
}
