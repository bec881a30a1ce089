//! Which field group is shown and which inputs are required.

use std::any::{Any, TypeId};
use std::collections::BTreeSet;

use scribe_states::{Compute, ComputeDeps, Dep, State, Updater, state_assign_impl};

use crate::{ContentType, FieldId, FormInput};

/// Derived from the selected content type in [`FormInput`].
///
/// Exactly the selected type's group is visible and exactly its required fields are
/// required; every other field is hidden and optional, so hidden inputs never block
/// a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldVisibilityCompute {
    visible_group: Option<ContentType>,
    required: BTreeSet<FieldId>,
}

impl FieldVisibilityCompute {
    pub fn for_type(content_type: Option<ContentType>) -> Self {
        Self {
            visible_group: content_type,
            required: content_type
                .map(|ct| ct.required_fields().iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    pub fn visible_group(&self) -> Option<ContentType> {
        self.visible_group
    }

    pub fn is_visible(&self, field: FieldId) -> bool {
        self.visible_group == Some(field.content_type())
    }

    pub fn is_required(&self, field: FieldId) -> bool {
        self.required.contains(&field)
    }

    pub fn required(&self) -> &BTreeSet<FieldId> {
        &self.required
    }

    /// Visible fields in display order.
    pub fn visible_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.visible_group.into_iter().flat_map(ContentType::fields)
    }
}

impl Compute for FieldVisibilityCompute {
    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [TypeId; 1] = [TypeId::of::<FormInput>()];
        (&STATE_IDS, &[])
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let selected = deps.get_state_ref::<FormInput>().content_type;
        if self.visible_group == selected && self.required.len() == required_len(selected) {
            return;
        }

        log::debug!("Field visibility switched to {selected:?}");
        updater.set(Self::for_type(selected));
    }
}

fn required_len(content_type: Option<ContentType>) -> usize {
    content_type.map_or(0, |ct| ct.required_fields().len())
}

impl State for FieldVisibilityCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
