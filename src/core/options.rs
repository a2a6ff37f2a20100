//! Decoder configuration.

/// Hard limits applied while decoding untrusted assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest inflated size accepted for a single asset.
    pub max_inflated_len: usize,
    /// Largest record count a pack header may declare.
    pub max_record_count: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_inflated_len: 1024 * 1024 * 1024,
            max_record_count: 64 * 1024 * 1024,
        }
    }
}

/// Options for [`PackageDecoder`](crate::PackageDecoder) and the standalone decoders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub limits: DecodeLimits,
}

impl DecodeOptions {
    /// Options with custom limits.
    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self { limits }
    }
}
