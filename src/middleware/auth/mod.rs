pub mod access;
mod public_paths;

pub use public_paths::PublicPaths;
