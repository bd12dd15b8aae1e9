use image::DynamicImage;

/// A named visualization produced by the model for the current batch.
#[derive(new, Debug, Clone)]
pub struct Visual {
    /// Name under which the images are reported.
    pub name: String,

    /// The image payload.
    pub payload: VisualPayload,
}

/// Image payload of a [visual](Visual).
///
/// Backends are expected to report a sequence as a gallery of images for the
/// step, and a single image as one image artifact.
#[derive(Debug, Clone)]
pub enum VisualPayload {
    /// A single image.
    Single(DynamicImage),
    /// An ordered sequence of images.
    Sequence(Vec<DynamicImage>),
}

impl VisualPayload {
    /// Number of images in the payload.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequence(images) => images.len(),
        }
    }

    /// Whether the payload holds no image.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Sequence(images) if images.is_empty())
    }

    /// Iterate over the images in order.
    pub fn images(&self) -> std::slice::Iter<'_, DynamicImage> {
        match self {
            Self::Single(image) => std::slice::from_ref(image).iter(),
            Self::Sequence(images) => images.iter(),
        }
    }
}
