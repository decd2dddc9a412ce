pub mod format;
pub mod list;
pub mod show;
pub mod sync;
