//! Views over the filtered resource instances
//!
//! The filter produces one `ResourceInstanceSummary` per selected instance. The
//! views here decide what to warn about, what to hand to the Azure move API and
//! which IDs to correct in the Terraform state.

use crate::azure_id::is_url_shaped;
use crate::classification::{
    is_blocking_movement, is_not_needing_movement, is_not_supported_in_azure, is_only_moved_in_tf,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A selected instance together with the ID it will have after the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInstanceSummary {
    pub azure_id: String,
    /// Equal to `azure_id` when the move leaves the ID alone.
    pub future_azure_id: String,
    pub terraform_id: String,
    pub resource_type: String,
}

/// Ordered summaries in state traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceInstanceSummaries(Vec<ResourceInstanceSummary>);

impl ResourceInstanceSummaries {
    pub fn new(summaries: Vec<ResourceInstanceSummary>) -> Self {
        Self(summaries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceInstanceSummary> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ResourceInstanceSummary> {
        self.0
    }

    /// Terraform addresses of instances Azure cannot move.
    pub fn not_supported(&self) -> Vec<String> {
        self.terraform_ids_where(is_not_supported_in_azure)
    }

    /// Terraform addresses of instances whose ID does not change.
    pub fn no_movement_needed(&self) -> Vec<String> {
        self.terraform_ids_where(is_not_needing_movement)
    }

    /// Terraform addresses and Azure IDs of instances that block the move.
    pub fn blocking_movement(&self) -> (Vec<String>, Vec<String>) {
        self.0
            .iter()
            .filter(|r| is_blocking_movement(&r.resource_type))
            .map(|r| (r.terraform_id.clone(), r.azure_id.clone()))
            .unzip()
    }

    /// Distinct Azure IDs to submit to the move API, in first-seen order.
    ///
    /// Several Terraform resources can share one Azure ID, and URL-shaped IDs
    /// never identify a movable resource.
    pub fn movable_on_azure(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .filter(|r| {
                let t = r.resource_type.as_str();
                !is_not_supported_in_azure(t)
                    && !is_only_moved_in_tf(t)
                    && !is_blocking_movement(t)
                    && !is_not_needing_movement(t)
            })
            .filter(|r| !is_url_shaped(&r.azure_id))
            .filter(|r| seen.insert(r.azure_id.as_str()))
            .map(|r| r.azure_id.clone())
            .collect()
    }

    /// Terraform address to future Azure ID, for every instance whose state
    /// entry must be rewritten.
    pub fn to_correct_in_tf_state(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|r| {
                let t = r.resource_type.as_str();
                !is_not_supported_in_azure(t)
                    && !is_blocking_movement(t)
                    && !is_not_needing_movement(t)
            })
            .map(|r| (r.terraform_id.clone(), r.future_azure_id.clone()))
            .collect()
    }

    fn terraform_ids_where(&self, predicate: fn(&str) -> bool) -> Vec<String> {
        self.0
            .iter()
            .filter(|r| predicate(&r.resource_type))
            .map(|r| r.terraform_id.clone())
            .collect()
    }
}

impl From<Vec<ResourceInstanceSummary>> for ResourceInstanceSummaries {
    fn from(summaries: Vec<ResourceInstanceSummary>) -> Self {
        Self(summaries)
    }
}

impl<'a> IntoIterator for &'a ResourceInstanceSummaries {
    type Item = &'a ResourceInstanceSummary;
    type IntoIter = std::slice::Iter<'a, ResourceInstanceSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
