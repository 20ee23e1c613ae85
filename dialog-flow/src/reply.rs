use serde::{Deserialize, Serialize};

/// Media attached to an outbound reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub content_url: String,
    pub content_type: String,
    pub name: String,
}

/// One outbound message. A turn produces an ordered list of these.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Answers the channel may offer as buttons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn attachment(attachment: Attachment) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::default()
        }
    }

    pub fn choice(text: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            text: Some(text.into()),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }
}
