//! Concrete primitives and the closed [`Entity`] sum over them.

mod clock_buffer;
mod counter;
mod cross_connection;
mod dac;
mod dff;
mod iob;
mod lfosc;
mod lut;
mod pga;
mod power_rail;
mod system;
mod vref;

pub use clock_buffer::ClockBuffer;
pub use counter::{Counter, ResetMode};
pub use cross_connection::CrossConnection;
pub use dac::Dac;
pub use dff::Dff;
pub use iob::{DriveType, InputMode, Iob, PullDirection, PullResistor};
pub use lfosc::LfOscillator;
pub use lut::Lut;
pub use pga::{Pga, PgaMode};
pub use power_rail::PowerRail;
pub use system::SystemBlock;
pub use vref::{VoltageReference, VrefSource};

use crate::bitstream::Bitstream;
use crate::entity::{
    BitstreamEntity, CommitContext, EntityKind, EntityLocation, EntityOutput, LoadContext,
    PortRole, SaveContext,
};
use crate::error::EntityError;
use std::ops::Range;

/// One configurable block of the device.
#[derive(Clone, Debug)]
pub enum Entity {
    /// Pin I/O buffer.
    Iob(Iob),
    /// Look-up table.
    Lut(Lut),
    /// D flip-flop.
    Dff(Dff),
    /// Counter.
    Counter(Counter),
    /// Low-frequency oscillator.
    LfOscillator(LfOscillator),
    /// Voltage reference.
    VoltageReference(VoltageReference),
    /// DAC.
    Dac(Dac),
    /// PGA.
    Pga(Pga),
    /// Clock buffer.
    ClockBuffer(ClockBuffer),
    /// Matrix-to-matrix relay.
    CrossConnection(CrossConnection),
    /// Ground or Vdd.
    PowerRail(PowerRail),
    /// Device-wide settings.
    System(SystemBlock),
}

macro_rules! dispatch {
    ($self:ident, $e:ident => $body:expr) => {
        match $self {
            Entity::Iob($e) => $body,
            Entity::Lut($e) => $body,
            Entity::Dff($e) => $body,
            Entity::Counter($e) => $body,
            Entity::LfOscillator($e) => $body,
            Entity::VoltageReference($e) => $body,
            Entity::Dac($e) => $body,
            Entity::Pga($e) => $body,
            Entity::ClockBuffer($e) => $body,
            Entity::CrossConnection($e) => $body,
            Entity::PowerRail($e) => $body,
            Entity::System($e) => $body,
        }
    };
}

macro_rules! accessors {
    ($($variant:ident($ty:ty): $get:ident, $get_mut:ident;)*) => {
        impl Entity {
            $(
                #[doc = concat!("Returns the [`", stringify!($ty), "`], if this is one.")]
                pub fn $get(&self) -> Option<&$ty> {
                    match self {
                        Entity::$variant(e) => Some(e),
                        _ => None,
                    }
                }

                #[doc = concat!("Mutable form of [`Entity::", stringify!($get), "`].")]
                pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        Entity::$variant(e) => Some(e),
                        _ => None,
                    }
                }
            )*
        }
    };
}

accessors! {
    Iob(Iob): as_iob, as_iob_mut;
    Lut(Lut): as_lut, as_lut_mut;
    Dff(Dff): as_dff, as_dff_mut;
    Counter(Counter): as_counter, as_counter_mut;
    LfOscillator(LfOscillator): as_lf_oscillator, as_lf_oscillator_mut;
    VoltageReference(VoltageReference): as_vref, as_vref_mut;
    Dac(Dac): as_dac, as_dac_mut;
    Pga(Pga): as_pga, as_pga_mut;
    ClockBuffer(ClockBuffer): as_clock_buffer, as_clock_buffer_mut;
    CrossConnection(CrossConnection): as_cross_connection, as_cross_connection_mut;
    PowerRail(PowerRail): as_power_rail, as_power_rail_mut;
    System(SystemBlock): as_system, as_system_mut;
}

impl BitstreamEntity for Entity {
    fn kind(&self) -> EntityKind {
        dispatch!(self, e => e.kind())
    }

    fn index(&self) -> usize {
        dispatch!(self, e => e.index())
    }

    fn location(&self) -> EntityLocation {
        dispatch!(self, e => e.location())
    }

    fn description(&self) -> String {
        dispatch!(self, e => e.description())
    }

    fn primitive_name(&self) -> &'static str {
        dispatch!(self, e => e.primitive_name())
    }

    fn accepts_primitive(&self, cell_type: &str) -> bool {
        dispatch!(self, e => e.accepts_primitive(cell_type))
    }

    fn config_len(&self) -> usize {
        dispatch!(self, e => e.config_len())
    }

    fn config_regions(&self) -> Vec<Range<usize>> {
        dispatch!(self, e => e.config_regions())
    }

    fn input_ports(&self) -> &'static [&'static str] {
        dispatch!(self, e => e.input_ports())
    }

    fn dedicated_inputs(&self) -> &'static [&'static str] {
        dispatch!(self, e => e.dedicated_inputs())
    }

    fn output_ports(&self) -> &'static [&'static str] {
        dispatch!(self, e => e.output_ports())
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        dispatch!(self, e => e.get_input(port))
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        dispatch!(self, e => e.set_input(port, source))
    }

    fn output_net_number(&self, port: &str) -> Option<usize> {
        dispatch!(self, e => e.output_net_number(port))
    }

    fn cell_port_role(&self, cell_type: &str, port: &str, bit: usize) -> PortRole {
        dispatch!(self, e => e.cell_port_role(cell_type, port, bit))
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        dispatch!(self, e => e.known_parameters())
    }

    fn is_configured(&self) -> bool {
        dispatch!(self, e => e.is_configured())
    }

    fn summary(&self) -> String {
        dispatch!(self, e => e.summary())
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        dispatch!(self, e => e.commit_changes(ctx))
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        dispatch!(self, e => e.save(bits, ctx))
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        dispatch!(self, e => e.load(bits, ctx))
    }
}
