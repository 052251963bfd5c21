//! Speculation-rules hint documents.

use serde::Serialize;

#[derive(Debug, Serialize)]
struct SpeculationRules<'a> {
    prefetch: [PrefetchRule<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PrefetchRule<'a> {
    source: &'static str,
    urls: &'a [String],
}

/// Render a list-source prefetch rule for `urls`.
pub fn speculation_rules(urls: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SpeculationRules {
        prefetch: [PrefetchRule {
            source: "list",
            urls,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_shape() {
        let rules = speculation_rules(&["/about".to_string(), "/gallery".to_string()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rules).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "prefetch": [{ "source": "list", "urls": ["/about", "/gallery"] }]
            })
        );
    }
}
