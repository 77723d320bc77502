//! The device model: every entity of one part, addressable by family index.

use crate::bitstream::{Bitstream, TextFormat};
use crate::entity::{
    BitstreamEntity, Directory, EntityKind, EntityOutput, LoadContext, SaveContext,
};
use crate::error::{BitstreamError, DeviceError};
use crate::ids::EntityId;
use crate::layout::PartLayout;
use crate::part::Part;
use crate::primitives::{
    ClockBuffer, Counter, CrossConnection, Dac, Dff, Entity, Iob, LfOscillator, Lut, Pga,
    PowerRail, SystemBlock, VoltageReference,
};
use gpar_diagnostics::DiagnosticSink;
use std::ops::Range;
use std::path::Path;

/// All entities of one part.
///
/// The entity list is fixed at construction; [`EntityId`]s index into it and
/// stay valid for the device's lifetime.
#[derive(Debug)]
pub struct Device {
    layout: &'static PartLayout,
    entities: Vec<Entity>,
    directory: Directory,
    ground: EntityId,
    vdd: EntityId,
    system: EntityId,
}

macro_rules! family_accessors {
    ($($kind:ident: $get:ident, $get_mut:ident => $ty:ty, $cast:ident, $cast_mut:ident;)*) => {
        $(
            #[doc = concat!("The `index`-th [`", stringify!($ty), "`].")]
            pub fn $get(&self, index: usize) -> Option<&$ty> {
                self.family_member(EntityKind::$kind, index)
                    .and_then(Entity::$cast)
            }

            #[doc = concat!("Mutable form of [`Device::", stringify!($get), "`].")]
            pub fn $get_mut(&mut self, index: usize) -> Option<&mut $ty> {
                let id = self.directory.find(EntityKind::$kind, index)?;
                self.entity_mut(id).and_then(Entity::$cast_mut)
            }
        )*
    };
}

impl Device {
    /// Builds the full entity inventory for `part`.
    pub fn new(part: Part) -> Self {
        let layout = PartLayout::for_part(part);
        let mut entities = Vec::new();

        for (i, site) in layout.iobs.iter().enumerate() {
            entities.push(Entity::Iob(Iob::new(i, *site)));
        }
        let mut per_width = [0usize; 5];
        for (i, site) in layout.luts.iter().enumerate() {
            let ordinal = per_width[site.inputs];
            per_width[site.inputs] += 1;
            entities.push(Entity::Lut(Lut::new(i, ordinal, *site)));
        }
        for (i, site) in layout.dffs.iter().enumerate() {
            entities.push(Entity::Dff(Dff::new(i, *site)));
        }
        for (i, site) in layout.counters.iter().enumerate() {
            entities.push(Entity::Counter(Counter::new(i, *site)));
        }
        for (i, site) in layout.lf_oscillators.iter().enumerate() {
            entities.push(Entity::LfOscillator(LfOscillator::new(i, *site)));
        }
        for (i, base) in layout.vrefs.iter().enumerate() {
            entities.push(Entity::VoltageReference(VoltageReference::new(i, *base)));
        }
        for (i, site) in layout.dacs.iter().enumerate() {
            entities.push(Entity::Dac(Dac::new(i, *site)));
        }
        if let Some(site) = layout.pga {
            entities.push(Entity::Pga(Pga::new(0, site)));
        }
        for (i, site) in layout.clock_buffers.iter().enumerate() {
            entities.push(Entity::ClockBuffer(ClockBuffer::new(i, *site)));
        }
        for (i, site) in layout.cross_connections.iter().enumerate() {
            entities.push(Entity::CrossConnection(CrossConnection::new(i, *site)));
        }

        let next = |entities: &Vec<Entity>| EntityId::from_raw(entities.len() as u32);
        let ground = next(&entities);
        entities.push(Entity::PowerRail(PowerRail::new(false)));
        let vdd = next(&entities);
        entities.push(Entity::PowerRail(PowerRail::new(true)));
        let system = next(&entities);
        entities.push(Entity::System(SystemBlock::new(layout.system.clone())));

        let directory = Directory::build(&entities);
        Self {
            layout,
            entities,
            directory,
            ground,
            vdd,
            system,
        }
    }

    /// The target part.
    pub fn part(&self) -> Part {
        self.layout.part
    }

    /// The part's register map.
    pub fn layout(&self) -> &'static PartLayout {
        self.layout
    }

    /// Device lookup tables.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Every entity, indexed by [`EntityId`].
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Looks up an entity.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// Looks up an entity mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    /// IDs and entities, in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::from_raw(i as u32), e))
    }

    fn family_member(&self, kind: EntityKind, index: usize) -> Option<&Entity> {
        self.directory.find(kind, index).and_then(|id| self.entity(id))
    }

    family_accessors! {
        Iob: iob, iob_mut => Iob, as_iob, as_iob_mut;
        Lut: lut, lut_mut => Lut, as_lut, as_lut_mut;
        Dff: dff, dff_mut => Dff, as_dff, as_dff_mut;
        Counter: counter, counter_mut => Counter, as_counter, as_counter_mut;
        LfOscillator: lf_oscillator, lf_oscillator_mut => LfOscillator,
            as_lf_oscillator, as_lf_oscillator_mut;
        VoltageReference: vref, vref_mut => VoltageReference, as_vref, as_vref_mut;
        Dac: dac, dac_mut => Dac, as_dac, as_dac_mut;
        ClockBuffer: clock_buffer, clock_buffer_mut => ClockBuffer,
            as_clock_buffer, as_clock_buffer_mut;
        CrossConnection: cross_connection, cross_connection_mut => CrossConnection,
            as_cross_connection, as_cross_connection_mut;
    }

    /// The PGA, on parts that have one.
    pub fn pga(&self) -> Option<&Pga> {
        self.family_member(EntityKind::Pga, 0).and_then(Entity::as_pga)
    }

    /// Mutable form of [`Device::pga`].
    pub fn pga_mut(&mut self) -> Option<&mut Pga> {
        let id = self.directory.find(EntityKind::Pga, 0)?;
        self.entity_mut(id).and_then(Entity::as_pga_mut)
    }

    /// The device-wide settings block.
    pub fn system(&self) -> &SystemBlock {
        match &self.entities[self.system.index()] {
            Entity::System(system) => system,
            _ => unreachable!("system block is built last"),
        }
    }

    /// Mutable form of [`Device::system`].
    pub fn system_mut(&mut self) -> &mut SystemBlock {
        match &mut self.entities[self.system.index()] {
            Entity::System(system) => system,
            _ => unreachable!("system block is built last"),
        }
    }

    /// The IOB bonded to package pin `pin`.
    pub fn iob_for_pin(&self, pin: u32) -> Option<&Iob> {
        let (index, _) = self.layout.iob_for_pin(pin)?;
        self.iob(index)
    }

    /// The entity ID of the IOB bonded to `pin`.
    pub fn iob_id_for_pin(&self, pin: u32) -> Option<EntityId> {
        let (index, _) = self.layout.iob_for_pin(pin)?;
        self.directory.find(EntityKind::Iob, index)
    }

    /// The ground rail entity.
    pub fn ground(&self) -> EntityId {
        self.ground
    }

    /// The Vdd rail entity.
    pub fn vdd(&self) -> EntityId {
        self.vdd
    }

    /// The rail entity for `value`.
    pub fn rail(&self, value: bool) -> EntityId {
        if value {
            self.vdd
        } else {
            self.ground
        }
    }

    /// The signal carried by output `port` of `id`. Rails come back as
    /// [`EntityOutput::Rail`].
    pub fn output_of(&self, id: EntityId, port: &str) -> Option<EntityOutput> {
        let entity = self.entity(id)?;
        if let Entity::PowerRail(rail) = entity {
            return Some(rail.output());
        }
        let port = entity.output_ports().iter().copied().find(|p| *p == port)?;
        Some(EntityOutput::Port {
            entity: id,
            kind: entity.kind(),
            port,
        })
    }

    /// Every voltage reference, ascending by index.
    pub fn voltage_references(&self) -> impl Iterator<Item = &VoltageReference> {
        self.entities.iter().filter_map(Entity::as_vref)
    }

    /// Whether any entity input is driven by `id`.
    pub fn is_used(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| {
            e.input_ports()
                .iter()
                .chain(e.dedicated_inputs())
                .any(|p| e.get_input(p).and_then(EntityOutput::entity) == Some(id))
        })
    }

    /// Absolute bits owned by `id`: its configuration regions, then its
    /// input-selector words.
    pub fn footprint(&self, id: EntityId) -> Vec<Range<usize>> {
        let Some(entity) = self.entity(id) else {
            return Vec::new();
        };
        let mut ranges = entity.config_regions();
        let loc = entity.location();
        if let Some(base) = loc.input_base {
            for i in 0..entity.input_ports().len() {
                ranges.push(self.layout.input_word_bits(loc.matrix, base + i));
            }
        }
        ranges
    }

    /// Serializes every entity into a fresh bitstream.
    ///
    /// The first entity that fails aborts the save.
    pub fn save_bitstream(&self, sink: &DiagnosticSink) -> Result<Bitstream, DeviceError> {
        let mut bits = Bitstream::new(self.layout.total_bits);
        let ctx = SaveContext {
            layout: self.layout,
            directory: &self.directory,
            entities: &self.entities,
            sink,
        };
        for entity in &self.entities {
            entity.save(&mut bits, &ctx)?;
        }
        Ok(bits)
    }

    /// Reconstructs every entity from `bits`.
    ///
    /// The device is left untouched if any entity fails to load.
    pub fn load_bitstream(
        &mut self,
        bits: &Bitstream,
        sink: &DiagnosticSink,
    ) -> Result<(), DeviceError> {
        if bits.len() != self.layout.total_bits {
            return Err(BitstreamError::Length {
                expected: self.layout.total_bits,
                found: bits.len(),
            }
            .into());
        }
        let ctx = LoadContext {
            layout: self.layout,
            directory: &self.directory,
            sink,
        };
        let mut loaded = self.entities.clone();
        for entity in &mut loaded {
            entity.load(bits, &ctx)?;
        }
        self.entities = loaded;
        Ok(())
    }

    /// Saves the device and writes the text form to `path`.
    ///
    /// Nothing is written unless every entity saves.
    pub fn write_to_file(
        &self,
        path: &Path,
        format: TextFormat,
        sink: &DiagnosticSink,
    ) -> Result<Bitstream, DeviceError> {
        let bits = self.save_bitstream(sink)?;
        std::fs::write(path, bits.to_text(format)).map_err(|source| DeviceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(bits)
    }

    /// Reads a bitstream file in either text form and loads it.
    pub fn read_from_file(
        &mut self,
        path: &Path,
        sink: &DiagnosticSink,
    ) -> Result<(), DeviceError> {
        let text = std::fs::read_to_string(path).map_err(|source| DeviceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bits = Bitstream::parse_text(&text, self.layout.total_bits)?;
        self.load_bitstream(&bits, sink)
    }
}
