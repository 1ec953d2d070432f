//! String utilities shared by every pipeline stage: case and accent
//! folding, header token cleanup, size vocabulary and collation.

pub mod collate;
pub mod normalize;
pub mod sizes;

pub use normalize::{normalize_text, normalize_token, remove_accents};
pub use sizes::{has_qty, norm_size, size_index};
