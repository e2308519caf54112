/*!
 * Node Types
 * Shared types for node capabilities and errors
 */

mod capability;
mod errors;

pub use capability::{Capabilities, Capability, PropertyMap};
pub use errors::{TreeError, TreeResult};
