//! Configuration surface for [`crate::SplitController`].
//!
//! The filter is instantiated by name (`hevcsplit`) and takes no external
//! arguments — there is no file or environment configuration. The only knobs
//! are the ones an embedder passes in directly at construction time.

/// Construction-time options for [`crate::SplitController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Initial capacity, in bytes, reserved for the shared NAL scratch buffer
    /// used while stripping/restoring emulation prevention bytes during
    /// per-NAL rewriting. Grows monotonically as needed; this only avoids a
    /// handful of early reallocations for typical NAL sizes.
    pub scratch_capacity: usize,

    /// Whether a NAL unit with `nuh_layer_id != 0` is rejected. Always `true`
    /// in this implementation — HEVC multi-layer streams are a documented
    /// non-goal — but named so the precondition is visible and testable in
    /// isolation rather than baked in as an unconditional `if`.
    pub reject_multilayer: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: 4096,
            reject_multilayer: true,
        }
    }
}
