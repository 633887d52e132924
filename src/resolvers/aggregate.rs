use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::TimeZone;
use chrono::Utc;
use serde::Serialize;
use serde_json_bytes::Value;

use crate::json_ext::ValueExt;
use crate::resolvers::paginate;
use crate::resolvers::Page;
use crate::resolvers::PaginationArgs;

/// A paginated bucket of entities sharing one normalized key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBucket {
    #[serde(flatten)]
    pub page: Page,
    /// The field the result set was grouped on.
    pub field: String,
    /// This bucket's key, in its canonical string form.
    pub field_value: String,
}

/// The distinct sorted set of values of `field` across `nodes`.
///
/// Array values contribute each of their elements; nulls contribute
/// nothing. Every value is reduced to its canonical key string before
/// deduplication, so values of different underlying types that normalize
/// to equal strings count as one.
pub fn distinct(nodes: &[Value], field: &str) -> Vec<String> {
    let mut values = BTreeSet::new();
    for node in nodes {
        for element in field_elements(node, field) {
            values.insert(group_key(element));
        }
    }
    values.into_iter().collect()
}

/// Partitions `nodes` into buckets keyed by the value of `field`.
///
/// An array value assigns the entity to one bucket per element, appending
/// it again when the array repeats an element; nulls are dropped. Buckets
/// come out in ascending lexicographic key order, preserve the incoming
/// entity order, and are each paginated independently with the same
/// `args`.
pub fn group(nodes: &[Value], field: &str, args: &PaginationArgs) -> Vec<GroupBucket> {
    let mut buckets: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for node in nodes {
        for element in field_elements(node, field) {
            buckets
                .entry(group_key(element))
                .or_default()
                .push(node.clone());
        }
    }

    buckets
        .into_iter()
        .map(|(field_value, grouped)| GroupBucket {
            page: paginate(Some(grouped), args),
            field: field.to_string(),
            field_value,
        })
        .collect()
}

/// The non-null scalar elements contributed by `field` on `node`: the
/// elements of an array value, the value itself otherwise.
fn field_elements<'a>(node: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> {
    let elements = match node.get_path(field) {
        Some(Value::Array(elements)) => elements.as_slice(),
        Some(value) => std::slice::from_ref(value),
        None => &[],
    };
    elements.iter().filter(|element| !element.is_null())
}

/// The canonical key string of an aggregation value.
///
/// Time-like strings collapse to one UTC ISO-8601 form so equal instants
/// share a bucket whatever their source encoding; any collision that
/// produces is accepted as semantic equivalence.
pub(crate) fn group_key(value: &Value) -> String {
    match value {
        Value::String(value) => normalize_temporal(value.as_str())
            .unwrap_or_else(|| value.as_str().to_string()),
        Value::Number(value) => value.to_string(),
        Value::Bool(value) => value.to_string(),
        Value::Null => "null".to_string(),
        value => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn normalize_temporal(value: &str) -> Option<String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(canonical(instant.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(canonical(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?)));
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(canonical(Utc.from_utc_datetime(&stamp)));
    }
    None
}

fn canonical(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
