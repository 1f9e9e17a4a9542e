use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog of tools the backend can offer the assistant.
///
/// Tool definitions are provider-shaped JSON; the client only needs the
/// client names to populate a tool picker, so definitions stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCatalog {
    /// Names of the tool clients currently configured
    pub available_clients: Vec<String>,
    /// Tool definitions per client, untyped
    #[serde(default)]
    pub tools: BTreeMap<String, serde_json::Value>,
}

impl ToolCatalog {
    /// Whether any tool client is available.
    pub fn is_empty(&self) -> bool {
        self.available_clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_catalog() {
        let json = r#"{
            "available_clients": ["supabase"],
            "tools": {
                "supabase": [
                    {"type": "function", "function": {"name": "supabase_list_tables"}}
                ]
            }
        }"#;

        let catalog: ToolCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.available_clients, vec!["supabase"]);
        assert!(!catalog.is_empty());
        assert_eq!(
            catalog.tools["supabase"][0]["function"]["name"],
            "supabase_list_tables"
        );
    }

    #[test]
    fn test_parse_empty_catalog() {
        let json = r#"{"available_clients": [], "tools": {}}"#;
        let catalog: ToolCatalog = serde_json::from_str(json).unwrap();
        assert!(catalog.is_empty());
    }
}
