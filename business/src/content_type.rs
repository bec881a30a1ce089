//! Content types and the per-type field table.
//!
//! [`ContentType::required_fields`] is read both by the visibility compute and by the
//! payload builder, so what the form marks as required is exactly what gets validated.

use serde::{Deserialize, Serialize};

/// Category of text to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Email,
    Essay,
    Story,
    Speech,
}

/// Type-specific form inputs. Each one belongs to exactly one [`ContentType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Goal,
    Recipient,
    Topic,
    EssayLength,
    Genre,
    Setting,
    Characters,
    StoryLength,
    Occasion,
    Audience,
    SpeechDuration,
}

struct FieldTable {
    required: &'static [FieldId],
    optional_numbers: &'static [FieldId],
}

const EMAIL: FieldTable = FieldTable {
    required: &[FieldId::Goal, FieldId::Recipient],
    optional_numbers: &[],
};

const ESSAY: FieldTable = FieldTable {
    required: &[FieldId::Topic],
    optional_numbers: &[FieldId::EssayLength],
};

const STORY: FieldTable = FieldTable {
    required: &[FieldId::Genre, FieldId::Setting, FieldId::Characters],
    optional_numbers: &[FieldId::StoryLength],
};

const SPEECH: FieldTable = FieldTable {
    required: &[FieldId::Occasion, FieldId::Audience],
    optional_numbers: &[FieldId::SpeechDuration],
};

impl ContentType {
    pub const ALL: [Self; 4] = [Self::Email, Self::Essay, Self::Story, Self::Speech];

    /// Wire name, as sent in the payload's `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Essay => "essay",
            Self::Story => "story",
            Self::Speech => "speech",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Essay => "Essay",
            Self::Story => "Story",
            Self::Speech => "Speech",
        }
    }

    fn table(self) -> &'static FieldTable {
        match self {
            Self::Email => &EMAIL,
            Self::Essay => &ESSAY,
            Self::Story => &STORY,
            Self::Speech => &SPEECH,
        }
    }

    /// Fields that must be non-empty (after trimming) for this type.
    pub fn required_fields(self) -> &'static [FieldId] {
        self.table().required
    }

    /// Optional integer fields for this type.
    pub fn numeric_fields(self) -> &'static [FieldId] {
        self.table().optional_numbers
    }

    /// Every field of this type's group, in display order.
    pub fn fields(self) -> impl Iterator<Item = FieldId> {
        let table = self.table();
        table
            .required
            .iter()
            .chain(table.optional_numbers)
            .copied()
    }
}

impl FieldId {
    pub const ALL: [Self; 11] = [
        Self::Goal,
        Self::Recipient,
        Self::Topic,
        Self::EssayLength,
        Self::Genre,
        Self::Setting,
        Self::Characters,
        Self::StoryLength,
        Self::Occasion,
        Self::Audience,
        Self::SpeechDuration,
    ];

    /// Stable form name of the input, used in validation messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Recipient => "recipient",
            Self::Topic => "topic",
            Self::EssayLength => "essay-length",
            Self::Genre => "genre",
            Self::Setting => "setting",
            Self::Characters => "characters",
            Self::StoryLength => "story-length",
            Self::Occasion => "occasion",
            Self::Audience => "audience",
            Self::SpeechDuration => "speech-duration",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Goal => "Goal",
            Self::Recipient => "Recipient",
            Self::Topic => "Topic",
            Self::EssayLength => "Length (words)",
            Self::Genre => "Genre",
            Self::Setting => "Setting",
            Self::Characters => "Characters",
            Self::StoryLength => "Length (words)",
            Self::Occasion => "Occasion",
            Self::Audience => "Audience",
            Self::SpeechDuration => "Duration (minutes)",
        }
    }

    pub fn content_type(self) -> ContentType {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.fields().any(|field| field == self))
            .unwrap_or(ContentType::Email)
    }

    pub fn is_numeric(self) -> bool {
        self.content_type().numeric_fields().contains(&self)
    }
}
