/// Decodes image headers to find pixel dimensions.
pub trait ImageProbePort: Send + Sync {
    /// `(width, height)`, or `None` when the bytes are not a decodable image.
    fn dimensions(&self, bytes: &[u8]) -> Option<(u32, u32)>;
}
