use serde::Deserialize;

/// Options for route analysis.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    /// Order the serialized route points by timestamp instead of storage
    /// order (default: false). Points without a timestamp come first; the
    /// sort is stable. Stored routes are never reordered.
    #[serde(default)]
    pub sort_by_timestamp: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts: AnalyzeOptions = serde_json::from_str("{}").unwrap();
        assert!(!opts.sort_by_timestamp);
    }

    #[test]
    fn test_camel_case_field() {
        let opts: AnalyzeOptions =
            serde_json::from_str(r#"{"sortByTimestamp": true}"#).unwrap();
        assert!(opts.sort_by_timestamp);
    }
}
