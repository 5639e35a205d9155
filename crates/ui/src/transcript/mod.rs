mod entry;
mod state;

pub use entry::{Block, EntryId, PLACEHOLDER_ID, PlaceholderEntry, Sender, TranscriptEntry};
pub use state::{ScrollAnchor, ScrollBehavior, ScrollBlock, ScrollTarget, Transcript};
