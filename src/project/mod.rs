// src/project/mod.rs

//! Solution and project descriptors.
//!
//! A solution file lists the buildable projects; each project file declares
//! the target frameworks it builds for. Test projects are selected by a name
//! suffix.

pub mod solution;

pub use solution::{find_solution, Project, Solution};
