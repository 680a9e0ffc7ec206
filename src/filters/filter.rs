//! The base dispatch step shared by all lineout filters: activation gating
//! and synchronous delivery to a registered consumer.

use crate::data::DataBundle;
use crate::lineout::{LineoutData, LineoutError};
use std::collections::BTreeMap;

/// Mapping of ROI / channel identifier to the reduced lineout.
pub type LineoutMap = BTreeMap<String, LineoutData>;

/// Downstream consumer, invoked synchronously on every successful
/// extraction. The consumer takes ownership of the delivered map.
pub type TargetSlot = Box<dyn FnMut(LineoutMap)>;

/// Activation flag and consumer binding shared by every filter.
///
/// A filter starts inactive; toggling the flag has no side effect beyond
/// gating extraction. Exactly one consumer can be bound at a time;
/// registering a new one replaces the previous binding.
#[derive(Default)]
pub struct FilterBase {
    active: bool,
    target_slot: Option<TargetSlot>,
}

impl FilterBase {
    pub fn new() -> Self {
        FilterBase::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Binds the downstream consumer, replacing any prior binding.
    pub fn register_target_slot(&mut self, slot: TargetSlot) {
        self.target_slot = Some(slot);
    }

    fn send(&mut self, map: LineoutMap) {
        if let Some(slot) = self.target_slot.as_mut() {
            slot(map);
        }
    }
}

/// An activation-gated pipeline stage that turns labeled data bundles into
/// named lineouts.
///
/// Concrete filters implement [`Filter::extract`]; the provided
/// [`Filter::filter_data`] runs it only while the filter is active and
/// forwards non-`None` results to the bound consumer. Extraction is strictly
/// sequential per filter instance; instances share no mutable state.
pub trait Filter {
    fn base(&self) -> &FilterBase;

    fn base_mut(&mut self) -> &mut FilterBase;

    /// The extraction step. Returning `Ok(None)` suppresses delivery for
    /// this bundle; a [`LineoutError`] halts the extraction at the point of
    /// malformed lineout assembly.
    fn extract(&mut self, data: &DataBundle) -> Result<Option<LineoutMap>, LineoutError>;

    /// Toggles the filter between its inactive and active states.
    fn set_active(&mut self, active: bool) {
        self.base_mut().set_active(active);
    }

    fn is_active(&self) -> bool {
        self.base().is_active()
    }

    /// Binds the consumer that receives extraction results.
    fn register_target_slot(&mut self, slot: TargetSlot) {
        self.base_mut().register_target_slot(slot);
    }

    /// Runs the extraction step on an incoming bundle and synchronously
    /// delivers the result. A no-op while the filter is inactive.
    fn filter_data(&mut self, data: &DataBundle) -> Result<(), LineoutError> {
        if !self.base().is_active() {
            return Ok(());
        }
        if let Some(map) = self.extract(data)? {
            self.base_mut().send(map);
        }
        Ok(())
    }
}
