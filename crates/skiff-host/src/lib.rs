//! Privileged-process side of the Skiff install protocol: deep-link command
//! parsing, the UI surface registry with its one-way broadcast channels, and
//! the install controller bridging the two.

pub mod install;
pub mod protocol;
pub mod surfaces;
