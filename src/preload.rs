use tracing::debug;

use crate::layer::Document;
use crate::sequence::ImageSequence;

/// Asks the host to fetch every image up front. Nothing waits on the result.
pub fn preload<D: Document>(document: &mut D, images: &ImageSequence) {
    for url in images.iter() {
        document.prefetch(url);
    }
    debug!(count = images.len(), "prefetch requested");
}
