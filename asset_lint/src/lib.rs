pub mod build_scenes;
pub mod code_refs;
pub mod config;
pub mod error;
pub mod guid;
pub mod guid_index;
pub mod guid_refs;
pub mod meta_files;
pub mod report;
pub mod settings;
pub mod walk;
