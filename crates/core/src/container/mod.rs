//! Container resolution.
//!
//! [`ContainerFactory::build_container`] finds the authoritative root of a
//! container and [`ContainerFactory::children_for_slot`] lists what renders
//! in one of its slots.

pub mod error;
pub mod factory;
pub mod model;
pub mod overlay;

#[cfg(test)]
mod fixtures;

pub use error::ContainerError;
pub use factory::ContainerFactory;
pub use model::Container;
