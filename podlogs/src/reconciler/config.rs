use podlogs_config::shared::ControllerConfig;

use crate::error::PodLogsResult;
use crate::selector::NodeSelectorFilter;

/// Settings fixed for the lifetime of a [`crate::reconciler::Reconciler`].
#[derive(Debug, Clone, Default)]
pub struct ReconcilerConfig {
    /// Pods not matching this filter are left alone.
    pub node_selector: NodeSelectorFilter,
    /// Whether pods are deleted once every artifact is stored.
    pub delete_after_capture: bool,
}

impl ReconcilerConfig {
    pub fn from_controller_config(config: &ControllerConfig) -> PodLogsResult<Self> {
        Ok(Self {
            node_selector: NodeSelectorFilter::new(config.node_selector_map()?),
            delete_after_capture: config.delete,
        })
    }
}
