//! Live form values edited by the UI.

use std::any::Any;
use std::collections::BTreeMap;

use scribe_states::{State, state_assign_impl};

use crate::{ContentType, FieldId};

/// Tone choices offered by the form. The stored value is the lowercase name.
pub const TONES: [&str; 6] = [
    "professional",
    "friendly",
    "formal",
    "casual",
    "persuasive",
    "enthusiastic",
];

/// Current form values.
///
/// Type-specific values survive switching types, but only those of the
/// selected type are read when building the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub content_type: Option<ContentType>,
    pub tone: String,
    pub points: String,
    values: BTreeMap<FieldId, String>,
}

impl FormInput {
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type: Some(content_type),
            ..Self::default()
        }
    }

    /// Raw (untrimmed) value of a type-specific input, empty when never set.
    pub fn value(&self, field: FieldId) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn value_mut(&mut self, field: FieldId) -> &mut String {
        self.values.entry(field).or_default()
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_points(mut self, points: impl Into<String>) -> Self {
        self.points = points.into();
        self
    }
}

impl State for FormInput {
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
