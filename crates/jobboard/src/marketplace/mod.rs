//! Marketplace workflows: clients post publications, freelancers apply to them.

pub mod publications;
