//! Filesystem primitives shared across pipeline steps.

pub mod tree;

pub use tree::{copy_tree, remove_path, replace_tree, replace_with_tmp, unique_temp_path};
