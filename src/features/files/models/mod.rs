mod file;

pub use file::{File, FileType, ProcessingStatus};
