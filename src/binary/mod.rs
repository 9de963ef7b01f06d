pub mod core_type;
pub mod decl;
pub mod error;
pub mod module;
pub mod section;
pub mod stream;
pub mod types;

#[cfg(test)]
mod encode;
