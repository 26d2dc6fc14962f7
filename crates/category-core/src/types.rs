use serde::{Deserialize, Serialize};

/// Longest accepted category name, counted in characters.
pub const MAX_NAME_LEN: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A nested create request: a name plus an optional list of child specs.
///
/// `name` stays optional here so a missing name surfaces as a validation
/// error on the `name` field instead of a body decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategorySpec>>,
}

impl CategorySpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: None,
        }
    }

    pub fn with_children(mut self, children: Vec<CategorySpec>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn children(&self) -> &[CategorySpec] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Number of nodes in this spec tree, root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(CategorySpec::node_count)
            .sum::<usize>()
    }
}

/// A category together with its direct kids, ancestor chain and siblings.
///
/// Empty relations are left out of the serialized form entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDetail {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub siblings: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_count_includes_every_level() {
        let spec = CategorySpec::named("A").with_children(vec![
            CategorySpec::named("B").with_children(vec![
                CategorySpec::named("B1"),
                CategorySpec::named("B2"),
            ]),
            CategorySpec::named("C"),
        ]);

        assert_eq!(spec.node_count(), 5);
        assert_eq!(CategorySpec::named("solo").node_count(), 1);
    }

    #[test]
    fn spec_decodes_without_children_or_name() {
        let spec: CategorySpec = serde_json::from_str(r#"{"name": "A"}"#).unwrap();
        assert_eq!(spec.name.as_deref(), Some("A"));
        assert!(spec.children().is_empty());

        let spec: CategorySpec = serde_json::from_str("{}").unwrap();
        assert!(spec.name.is_none());
    }

    #[test]
    fn detail_omits_empty_relations() {
        let detail = CategoryDetail {
            id: 1,
            name: "A".to_string(),
            children: vec![Category {
                id: 2,
                name: "B".to_string(),
            }],
            parents: Vec::new(),
            siblings: Vec::new(),
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["children"][0]["name"], "B");
        assert!(value.get("parents").is_none());
        assert!(value.get("siblings").is_none());
    }
}
