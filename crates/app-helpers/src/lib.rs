pub mod dirs;
pub mod id;
