pub mod references;
pub mod storage;

pub use storage::{EvidenceStorage, LocalStorage};
