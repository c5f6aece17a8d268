//! Resource View Model
//!
//! Adapts one `Representor` into index-addressable lists (attributes,
//! embedded resources, transitions) and runs the two user actions a
//! resource supports: reload and follow-transition.
//!
//! # Ordering
//!
//! - Attributes are listed by key.
//! - Embedded resources are grouped by relation, relations by name, each
//!   group in document order.
//! - Transitions are listed by relation name, with `self` left out.
//!
//! Indices are only meaningful for the snapshot they were read from. After
//! a reload or a refreshing transition, re-read the counts.

use super::title::{infer_title, TITLE_KEYS};
use super::transition::TransitionViewModel;
use crate::hyperdrive::{
    display_value, HyperdriveError, Representor, Transition, TransitionInput, Transport,
    SELF_RELATION,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Outcome of following a transition
#[derive(Debug)]
pub enum ResourceViewModelResult {
    /// The transition led to a different resource
    Success(ResourceViewModel),
    /// The transition returned the same resource; this view model now holds it
    Refresh,
    Failure(HyperdriveError),
}

/// View model over a single hypermedia resource
pub struct ResourceViewModel {
    client: Arc<dyn Transport>,
    representor: Representor,
}

impl fmt::Debug for ResourceViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceViewModel")
            .field("representor", &self.representor)
            .finish_non_exhaustive()
    }
}

impl ResourceViewModel {
    pub fn new(client: Arc<dyn Transport>, representor: Representor) -> Self {
        Self {
            client,
            representor,
        }
    }

    pub fn client(&self) -> &Arc<dyn Transport> {
        &self.client
    }

    /// Current snapshot
    pub fn representor(&self) -> &Representor {
        &self.representor
    }

    /// The single mutation point for the snapshot
    fn replace_representor(&mut self, representor: Representor) {
        self.representor = representor;
    }

    // =========================================================================
    // Reload
    // =========================================================================

    pub fn can_reload(&self) -> bool {
        self.representor.transitions.contains_key(SELF_RELATION)
    }

    /// Re-fetch the resource from its `self` link.
    ///
    /// On success the snapshot is replaced before `completion` runs; on
    /// failure it is left untouched. Without a `self` link nothing is
    /// requested and `completion` is never called, so check
    /// [`can_reload`](Self::can_reload) first.
    ///
    /// Taking `&mut self` means a second reload or transition on the same
    /// view model cannot start until this one has finished.
    pub async fn reload<F>(&mut self, completion: F)
    where
        F: FnOnce(Result<Representor, HyperdriveError>),
    {
        let Some(uri) = self.representor.self_uri().map(String::from) else {
            tracing::debug!("reload skipped: resource has no self transition");
            return;
        };

        let result = self.client.request_uri(&uri).await;
        match &result {
            Ok(representor) => self.replace_representor(representor.clone()),
            Err(e) => tracing::warn!("Failed to reload {}: {}", uri, e),
        }

        completion(result);
    }

    // =========================================================================
    // Title
    // =========================================================================

    pub fn title(&self) -> Option<&str> {
        infer_title(&self.representor.attributes, TITLE_KEYS)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn attribute(&self, index: usize) -> Option<(&String, &Value)> {
        self.representor.attributes.iter().nth(index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.representor.attributes.len()
    }

    pub fn title_for_attribute(&self, index: usize) -> Option<&str> {
        self.attribute(index).map(|(key, _)| key.as_str())
    }

    pub fn value_for_attribute(&self, index: usize) -> Option<String> {
        self.attribute(index).map(|(_, value)| display_value(value))
    }

    // =========================================================================
    // Embedded Resources
    // =========================================================================

    fn embedded_resources(&self) -> impl Iterator<Item = (&str, &Representor)> {
        self.representor
            .representors
            .iter()
            .flat_map(|(relation, children)| children.iter().map(move |c| (relation.as_str(), c)))
    }

    fn embedded_resource(&self, index: usize) -> Option<(&str, &Representor)> {
        self.embedded_resources().nth(index)
    }

    pub fn number_of_embedded_resources(&self) -> usize {
        self.representor.representors.values().map(Vec::len).sum()
    }

    pub fn title_for_embedded_resource(&self, index: usize) -> Option<&str> {
        self.embedded_resource(index)
            .and_then(|(_, r)| infer_title(&r.attributes, TITLE_KEYS))
    }

    pub fn relation_for_embedded_resource(&self, index: usize) -> Option<&str> {
        self.embedded_resource(index).map(|(relation, _)| relation)
    }

    /// A new, independent view model over the embedded resource, sharing the client
    pub fn view_model_for_embedded_resource(&self, index: usize) -> Option<ResourceViewModel> {
        self.embedded_resource(index)
            .map(|(_, r)| ResourceViewModel::new(self.client.clone(), r.clone()))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn transitions(&self) -> impl Iterator<Item = (&str, &Transition)> {
        self.representor
            .transitions
            .iter()
            .filter(|(relation, _)| relation.as_str() != SELF_RELATION)
            .map(|(relation, transition)| (relation.as_str(), transition))
    }

    fn transition(&self, index: usize) -> Option<(&str, &Transition)> {
        self.transitions().nth(index)
    }

    pub fn number_of_transitions(&self) -> usize {
        self.transitions().count()
    }

    /// The transition's relation name
    pub fn title_for_transition(&self, index: usize) -> Option<&str> {
        self.transition(index).map(|(relation, _)| relation)
    }

    pub fn transition_for_index(&self, index: usize) -> Option<&Transition> {
        self.transition(index).map(|(_, transition)| transition)
    }

    /// A form view model when the transition needs user input.
    ///
    /// `None` means the transition can be performed directly.
    pub fn view_model_for_transition(&self, index: usize) -> Option<TransitionViewModel> {
        let (_, transition) = self.transition(index)?;
        if transition.requires_input() {
            Some(TransitionViewModel::new(
                self.client.clone(),
                transition.clone(),
            ))
        } else {
            None
        }
    }

    /// Follow the transition at `index` using its default inputs
    pub async fn perform_transition<F>(&mut self, index: usize, completion: F)
    where
        F: FnOnce(ResourceViewModelResult),
    {
        self.perform_transition_with_input(index, TransitionInput::default(), completion)
            .await
    }

    /// Follow the transition at `index` with user supplied input.
    ///
    /// When both the current and the returned resource have a `self` link
    /// and the URIs match, the snapshot is replaced in place and completion
    /// gets `Refresh`. Any other success yields a new view model and leaves
    /// this one untouched. Failures never change state.
    pub async fn perform_transition_with_input<F>(
        &mut self,
        index: usize,
        input: TransitionInput,
        completion: F,
    ) where
        F: FnOnce(ResourceViewModelResult),
    {
        let Some((relation, transition)) = self.transition(index) else {
            completion(ResourceViewModelResult::Failure(
                HyperdriveError::NoSuchTransition(index),
            ));
            return;
        };
        let relation = relation.to_string();
        let transition = transition.clone();

        tracing::debug!("performing {} {} ({})", transition.method, transition.uri, relation);

        match self.client.request(&transition, &input).await {
            Ok(representor) => {
                let same_resource = match (self.representor.self_uri(), representor.self_uri()) {
                    (Some(old), Some(new)) => old == new,
                    _ => false,
                };

                if same_resource {
                    self.replace_representor(representor);
                    completion(ResourceViewModelResult::Refresh);
                } else {
                    completion(ResourceViewModelResult::Success(ResourceViewModel::new(
                        self.client.clone(),
                        representor,
                    )));
                }
            }
            Err(e) => {
                tracing::warn!("Transition {} failed: {}", relation, e);
                completion(ResourceViewModelResult::Failure(e));
            }
        }
    }
}
