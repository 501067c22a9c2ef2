/// Convenience result type used across adcanvas.
pub type AdResult<T> = Result<T, AdError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum AdError {
    /// Template geometry or fields required by an enabled layer are missing or invalid.
    ///
    /// Raised before anything is drawn.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An image reference could not be fetched or decoded.
    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),

    /// Surface-level failure while issuing a draw call (bad color string, missing font, ...).
    #[error("draw error: {0}")]
    Draw(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdError {
    /// Build an [`AdError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build an [`AdError::Draw`] value.
    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }

    /// Build an [`AdError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// What went wrong while resolving an image reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageLoadErrorKind {
    /// The bytes behind the reference could not be obtained.
    Fetch,
    /// The bytes were obtained but are not a decodable image.
    Decode,
    /// The reference form is not handled by the loader in use.
    Unsupported,
}

/// Failure to turn an [`crate::ImageRef`] into a [`crate::DecodedImage`].
///
/// The draw pipeline treats this error as recoverable: the affected layer is skipped and the
/// remaining layers are still drawn.
#[derive(thiserror::Error, Debug)]
#[error("image load error ({kind:?}) for '{reference}': {message}")]
pub struct ImageLoadError {
    /// Short, human-readable label of the failing reference.
    pub reference: String,
    /// Failure category.
    pub kind: ImageLoadErrorKind,
    /// Underlying reason.
    pub message: String,
}

impl ImageLoadError {
    /// Build an error of kind [`ImageLoadErrorKind::Fetch`].
    pub fn fetch(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ImageLoadErrorKind::Fetch, reference, message)
    }

    /// Build an error of kind [`ImageLoadErrorKind::Decode`].
    pub fn decode(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ImageLoadErrorKind::Decode, reference, message)
    }

    /// Build an error of kind [`ImageLoadErrorKind::Unsupported`].
    pub fn unsupported(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ImageLoadErrorKind::Unsupported, reference, message)
    }

    fn new(
        kind: ImageLoadErrorKind,
        reference: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
