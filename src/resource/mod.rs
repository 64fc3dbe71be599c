// Resource Module
// Loads caption names, channel guides and property files

pub mod channels;
pub mod propfile;
pub mod stringbank;

pub use channels::{ChannelDirectory, ChannelError, ChannelTable, CHANNEL_GUIDE_DIR};
pub use propfile::*;
pub use stringbank::*;
