use std::collections::BTreeMap;

/// Required node selector labels a pod must carry to be archived.
///
/// A pod matches when its `spec.nodeSelector` contains every configured key with
/// exactly the configured value. Extra labels on the pod are ignored and an empty
/// filter matches every pod.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSelectorFilter {
    required: BTreeMap<String, String>,
}

impl NodeSelectorFilter {
    pub fn new(required: BTreeMap<String, String>) -> Self {
        Self { required }
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub fn matches(&self, node_selector: Option<&BTreeMap<String, String>>) -> bool {
        self.required.iter().all(|(key, value)| {
            node_selector
                .and_then(|selector| selector.get(key))
                .is_some_and(|actual| actual == value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = NodeSelectorFilter::default();

        assert!(filter.is_empty());
        assert!(filter.matches(None));
        assert!(filter.matches(Some(&labels(&[("zone", "us-west")]))));
    }

    #[test]
    fn matching_value_is_required() {
        let filter = NodeSelectorFilter::new(labels(&[("zone", "us-east")]));

        assert!(filter.matches(Some(&labels(&[("zone", "us-east"), ("disk", "ssd")]))));
        assert!(!filter.matches(Some(&labels(&[("zone", "us-west")]))));
    }

    #[test]
    fn missing_key_does_not_match() {
        let filter = NodeSelectorFilter::new(labels(&[("zone", "us-east"), ("disk", "ssd")]));

        assert!(!filter.matches(None));
        assert!(!filter.matches(Some(&labels(&[("zone", "us-east")]))));
    }
}
