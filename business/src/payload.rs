//! Validated request body for `POST /api/generate`.

use serde::Serialize;

use crate::{ContentType, FieldId, FormInput};

/// JSON body of a generation request.
///
/// Serializes flat: `{"type": "essay", "topic": ..., "length_words": 500, "tone": ..., "points": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub details: ContentDetails,
    pub tone: String,
    pub points: String,
}

impl GenerateRequest {
    pub fn content_type(&self) -> ContentType {
        self.details.content_type()
    }
}

/// Type-specific part of the payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentDetails {
    Email {
        goal: String,
        recipient: String,
    },
    Essay {
        topic: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        length_words: Option<u32>,
    },
    Story {
        genre: String,
        setting: String,
        characters: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        length_words: Option<u32>,
    },
    Speech {
        occasion: String,
        audience: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_minutes: Option<u32>,
    },
}

impl ContentDetails {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Email { .. } => ContentType::Email,
            Self::Essay { .. } => ContentType::Essay,
            Self::Story { .. } => ContentType::Story,
            Self::Speech { .. } => ContentType::Speech,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Form names of every empty required input, in form order.
    #[error("Please fill in the required fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{} ({}) must be a whole number, got {value:?}", .field.label(), .field.name())]
    NotANumber { field: FieldId, value: String },
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::Missing(fields) => fields,
            Self::NotANumber { .. } => &[],
        }
    }
}

/// Validate the form and build the payload for its selected type.
///
/// Text values are trimmed before the emptiness check and before they are sent.
/// Every missing field is reported at once.
pub fn build_payload(form: &FormInput) -> Result<GenerateRequest, ValidationError> {
    let mut missing = Vec::new();

    if form.content_type.is_none() {
        missing.push("type");
    }
    let tone = form.tone.trim();
    if tone.is_empty() {
        missing.push("tone");
    }
    let points = form.points.trim();
    if points.is_empty() {
        missing.push("points");
    }
    if let Some(content_type) = form.content_type {
        missing.extend(
            content_type
                .required_fields()
                .iter()
                .filter(|field| form.value(**field).trim().is_empty())
                .map(|field| field.name()),
        );
    }

    let Some(content_type) = form.content_type.filter(|_| missing.is_empty()) else {
        return Err(ValidationError::Missing(missing));
    };

    let text = |field: FieldId| form.value(field).trim().to_owned();
    let details = match content_type {
        ContentType::Email => ContentDetails::Email {
            goal: text(FieldId::Goal),
            recipient: text(FieldId::Recipient),
        },
        ContentType::Essay => ContentDetails::Essay {
            topic: text(FieldId::Topic),
            length_words: optional_number(form, FieldId::EssayLength)?,
        },
        ContentType::Story => ContentDetails::Story {
            genre: text(FieldId::Genre),
            setting: text(FieldId::Setting),
            characters: text(FieldId::Characters),
            length_words: optional_number(form, FieldId::StoryLength)?,
        },
        ContentType::Speech => ContentDetails::Speech {
            occasion: text(FieldId::Occasion),
            audience: text(FieldId::Audience),
            duration_minutes: optional_number(form, FieldId::SpeechDuration)?,
        },
    };

    Ok(GenerateRequest {
        details,
        tone: tone.to_owned(),
        points: points.to_owned(),
    })
}

fn optional_number(form: &FormInput, field: FieldId) -> Result<Option<u32>, ValidationError> {
    let raw = form.value(field).trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_owned(),
        })
}
