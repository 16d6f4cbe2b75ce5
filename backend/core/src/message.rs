use serde::{Deserialize, Serialize};

/// A chat message as seen by the command processor, independent of the chat platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Platform message identity, used for deduplication.
    pub id: String,
    pub channel_id: String,
    /// Display tag of the author (e.g. `driver#0420`), recorded as the driver.
    pub author: String,
    pub author_is_bot: bool,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A file attached to a chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
    /// MIME type declared by the platform, if any.
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false)
    }
}

impl IncomingMessage {
    /// First attachment whose declared content type is `image/*`.
    pub fn first_image(&self) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.is_image())
    }
}
