use serde::Serialize;
use serde_json_bytes::Value;

/// A skip/limit window over an already fetched result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationArgs {
    pub skip: usize,
    pub limit: Option<usize>,
}

/// One page item with its adjacent entities linked in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEdge {
    pub node: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Value>,
}

/// Navigation metadata of a [`Page`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub item_count: usize,
    pub page_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

/// A shaped result set: the windowed entities plus counts and navigation
/// metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub total_count: usize,
    pub edges: Vec<PageEdge>,
    pub nodes: Vec<Value>,
    pub page_info: PageInfo,
}

/// Windows `results` into a [`Page`].
///
/// The page arithmetic reproduces the shape long relied on by callers and
/// must not be cleaned up: a limit of zero falls through to the unlimited
/// branch of the page counters while still clamping the window, and an
/// absent limit never reports a next page. The counter terms are computed
/// in floating point so that a skip beyond the end of the result set
/// rounds exactly as the original arithmetic did.
pub fn paginate(results: Option<Vec<Value>>, args: &PaginationArgs) -> Page {
    let results = results.unwrap_or_default();
    let PaginationArgs { skip, limit } = *args;
    let count = results.len();

    let start = skip.min(count);
    let end = match limit {
        Some(limit) => skip.saturating_add(limit).min(count),
        None => count,
    };
    let nodes = results[start..end].to_vec();

    let (page_count, current_page) = match limit {
        Some(limit) if limit > 0 => {
            let limit = limit as f64;
            let skipped_pages = (skip as f64 / limit).ceil();
            let remaining_pages = ((count as f64 - skip as f64) / limit).ceil();
            (
                (skipped_pages + remaining_pages) as i64,
                skipped_pages as i64 + 1,
            )
        }
        _ if skip > 0 => (2, 2),
        _ => (1, 1),
    };
    let has_previous_page = current_page > 1;
    let has_next_page = match limit {
        Some(limit) => skip + limit < count,
        None => false,
    };

    let edges = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| PageEdge {
            node: node.clone(),
            previous: if i > 0 { Some(nodes[i - 1].clone()) } else { None },
            next: nodes.get(i + 1).cloned(),
        })
        .collect();

    let item_count = nodes.len();
    Page {
        total_count: count,
        edges,
        nodes,
        page_info: PageInfo {
            current_page,
            has_previous_page,
            has_next_page,
            item_count,
            page_count,
            per_page: limit,
        },
    }
}
