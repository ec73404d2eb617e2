/*! Manifest processing

Native replacements for the small text-processing steps of the recipe:
splitting the `L` subset into pieces, recombining the processed pieces and pulling transcripts
out of supervision manifests.
!*/
pub mod combine;
pub mod manifest;
pub mod split;
pub mod transcript;

pub use combine::{combine, pieces};
pub use split::split;
pub use transcript::TranscriptReader;
