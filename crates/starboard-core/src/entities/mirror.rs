//! Mirrored post content and the outcome of mirror-destination operations

/// One field of an embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    /// Create an inline field
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }
}

/// Rich embed attached to a mirrored post
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl Embed {
    /// Look up a field value by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Rendered representation of a starred message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPost {
    /// Plain content line, e.g. `⭐ 4`
    pub content: String,
    pub embed: Embed,
}

/// Result of a create/edit/delete against the mirror destination
///
/// `NotFound` and `Forbidden` are recoverable: the caller logs them and keeps
/// going. Anything fatal is reported as an `Err` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome<T> {
    /// The operation took effect
    Applied(T),
    /// The post (or the destination channel) does not exist
    NotFound,
    /// The bot lacks permission in the destination
    Forbidden,
}

impl<T> MirrorOutcome<T> {
    /// Check if the operation took effect
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Get the applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NotFound | Self::Forbidden => None,
        }
    }

    /// Name for logging
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
        }
    }
}
