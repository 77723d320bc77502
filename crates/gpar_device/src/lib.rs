//! Device model and bitstream codec for GreenPAK4 parts.
//!
//! A [`Device`] owns one [`Entity`] per physical primitive of a [`Part`].
//! Every entity implements [`BitstreamEntity`]: it saves its configuration
//! into, and loads it back from, a fixed-length [`Bitstream`] at the literal
//! offsets of the part's [`PartLayout`].

#![warn(missing_docs)]

pub mod bitstream;
pub mod device;
pub mod entity;
pub mod error;
pub mod ids;
pub mod layout;
pub mod part;
pub mod primitives;

pub use bitstream::{Bitstream, TextFormat};
pub use device::Device;
pub use entity::{
    BitstreamEntity, CommitContext, Directory, EntityKind, EntityLocation, EntityOutput,
    LoadContext, PortRole, SaveContext, UNKNOWN_PARAMETER, UNRECOVERABLE_STATE,
};
pub use error::{BitstreamError, DeviceError, EntityError};
pub use ids::EntityId;
pub use layout::PartLayout;
pub use part::{Part, UnknownPart};
pub use primitives::Entity;
