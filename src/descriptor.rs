//! Parsing of the full engine descriptor the store reports for a table,
//! e.g. `ReplacingMergeTree(eventTime) ORDER BY (key) TTL eventTime + 3`.
//! Only the structured parts the diff layer compares are extracted; the
//! raw descriptor stays available on the snapshot for everything else.

/// Zookeeper path parameter the server injects into replicated engines.
const REPLICATED_PATH_PARAM: &str = "'/clickhouse/tables/{uuid}/{shard}'";
const REPLICATED_REPLICA_PARAM: &str = "'{replica}'";

/// Parameters of the engine constructor at the head of the descriptor.
/// A bare engine without parentheses yields an empty list. Placeholder
/// parameters the server injects for replicated engines are dropped, so
/// they never show up as drift against a desired spec.
pub fn engine_params(engine_full: &str) -> Vec<String> {
    let name_end = engine_full
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(engine_full.len());
    if name_end == 0 {
        return Vec::new();
    }
    let Some(group) = parenthesized_group(&engine_full[name_end..]) else {
        return Vec::new();
    };
    split_top_level(group)
        .into_iter()
        .filter(|p| p != REPLICATED_PATH_PARAM && p != REPLICATED_REPLICA_PARAM)
        .collect()
}

/// Columns of the `ORDER BY` clause. Both the parenthesized form and the
/// single bare-column form appear in live descriptors.
pub fn order_by(engine_full: &str) -> Vec<String> {
    let Some(clause) = engine_full.find("ORDER BY") else {
        return Vec::new();
    };
    let rest = engine_full[clause + "ORDER BY".len()..].trim_start();
    if rest.starts_with('(') {
        return parenthesized_group(rest).map(split_top_level).unwrap_or_default();
    }
    match rest.split_whitespace().next() {
        Some(column) => vec![column.to_string()],
        None => Vec::new(),
    }
}

/// Whether the descriptor carries any TTL clause. The store exposes no
/// structured flag for this, so the keyword is searched in the raw text;
/// a false positive only costs a redundant TTL removal on update.
pub fn has_ttl(engine_full: &str) -> bool {
    engine_full.contains("TTL")
}

/// Content of the parenthesized group opening at the start of `s`,
/// respecting nesting. `None` when `s` does not open a group or the
/// group never closes.
fn parenthesized_group(s: &str) -> Option<&str> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas at nesting depth zero, trimming each piece and
/// dropping empties.
fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::bare_engine("MergeTree ORDER BY id SETTINGS index_granularity = 8192", vec![])]
    #[case::empty_parens("MergeTree() ORDER BY id", vec![])]
    #[case::single_param("ReplacingMergeTree(eventTime) ORDER BY key", vec!["eventTime"])]
    #[case::multiple_params("SummingMergeTree(val, cnt) ORDER BY key", vec!["val", "cnt"])]
    #[case::nested_call("ReplacingMergeTree(toStartOfHour(eventTime)) ORDER BY key", vec!["toStartOfHour(eventTime)"])]
    fn extracts_engine_params(#[case] engine_full: &str, #[case] expected: Vec<&str>) {
        assert_eq!(engine_params(engine_full), expected);
    }

    #[test]
    fn drops_replicated_placeholders() {
        let engine_full = "ReplicatedReplacingMergeTree('/clickhouse/tables/{uuid}/{shard}', '{replica}', eventTime) ORDER BY key";
        assert_eq!(engine_params(engine_full), vec!["eventTime"]);
    }

    #[test]
    fn replicated_without_own_params_is_empty() {
        let engine_full = "ReplicatedMergeTree('/clickhouse/tables/{uuid}/{shard}', '{replica}') ORDER BY id";
        assert_eq!(engine_params(engine_full), Vec::<String>::new());
    }

    #[rstest]
    #[case::parenthesized("MergeTree ORDER BY (a, b) SETTINGS x = 1", vec!["a", "b"])]
    #[case::single_bare("MergeTree ORDER BY ts TTL ts + INTERVAL 1 DAY", vec!["ts"])]
    #[case::single_parenthesized("MergeTree ORDER BY (id)", vec!["id"])]
    #[case::function_key("MergeTree ORDER BY (key, toStartOfHour(ts))", vec!["key", "toStartOfHour(ts)"])]
    #[case::keyless("MergeTree ORDER BY tuple()", vec!["tuple()"])]
    #[case::absent("Memory", vec![])]
    fn extracts_order_by(#[case] engine_full: &str, #[case] expected: Vec<&str>) {
        assert_eq!(order_by(engine_full), expected);
    }

    #[test]
    fn detects_ttl_clause() {
        assert!(has_ttl("MergeTree ORDER BY id TTL ts + INTERVAL 3 DAY DELETE"));
        assert!(!has_ttl("MergeTree ORDER BY id SETTINGS index_granularity = 8192"));
    }
}
