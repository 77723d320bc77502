//! The contract every configurable primitive implements.
//!
//! An entity owns one slot of the part: a configuration region at a fixed
//! bit offset, zero or more input-bus words in one routing matrix, and an
//! output word other entities may select. [`BitstreamEntity::save`] writes
//! exactly those bits and [`BitstreamEntity::load`] reads them back.
//!
//! Entities never hold a reference to their device. Device-wide lookups go
//! through the [`Directory`] and the per-call contexts instead.

use crate::bitstream::Bitstream;
use crate::error::EntityError;
use crate::ids::EntityId;
use crate::layout::{PartLayout, GROUND_WORD, VDD_WORD};
use crate::part::Part;
use crate::primitives::Entity;
use gpar_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use gpar_netlist::{Cell, Module, ParamValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Range;

/// Warning code for parameters a primitive does not understand.
pub const UNKNOWN_PARAMETER: DiagnosticCode =
    DiagnosticCode::new(gpar_diagnostics::Category::Warning, 501);

/// Warning code for state that cannot be recovered from a bitstream.
pub const UNRECOVERABLE_STATE: DiagnosticCode =
    DiagnosticCode::new(gpar_diagnostics::Category::Warning, 502);

/// The closed set of entity families.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum EntityKind {
    /// Pin I/O buffer.
    Iob,
    /// Look-up table.
    Lut,
    /// D flip-flop.
    Dff,
    /// Counter/delay block.
    Counter,
    /// Low-frequency oscillator.
    LfOscillator,
    /// Voltage reference.
    VoltageReference,
    /// Digital-to-analog converter.
    Dac,
    /// Programmable gain amplifier.
    Pga,
    /// Clock buffer.
    ClockBuffer,
    /// Matrix-to-matrix relay.
    CrossConnection,
    /// Ground or Vdd.
    PowerRail,
    /// Device-wide settings.
    System,
}

impl EntityKind {
    /// Short family name used in descriptions and messages.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Iob => "IOB",
            EntityKind::Lut => "LUT",
            EntityKind::Dff => "DFF",
            EntityKind::Counter => "COUNT",
            EntityKind::LfOscillator => "LFOSC",
            EntityKind::VoltageReference => "VREF",
            EntityKind::Dac => "DAC",
            EntityKind::Pga => "PGA",
            EntityKind::ClockBuffer => "CLKBUF",
            EntityKind::CrossConnection => "XCONN",
            EntityKind::PowerRail => "RAIL",
            EntityKind::System => "SYSTEM",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The signal driving an input.
///
/// Power-rail entities never appear as `Port`; they normalize to `Rail`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum EntityOutput {
    /// Unconnected.
    #[default]
    None,
    /// Ground (`false`) or Vdd (`true`).
    Rail(bool),
    /// A named output of another entity, tagged with its family.
    Port {
        /// The driving entity.
        entity: EntityId,
        /// Its family.
        kind: EntityKind,
        /// The output port name.
        port: &'static str,
    },
}

impl EntityOutput {
    /// Ground.
    pub const GROUND: EntityOutput = EntityOutput::Rail(false);
    /// Vdd.
    pub const VDD: EntityOutput = EntityOutput::Rail(true);

    /// Returns `true` if unconnected.
    pub fn is_none(self) -> bool {
        self == EntityOutput::None
    }

    /// Returns `true` if unconnected or tied to ground.
    pub fn is_ground_or_none(self) -> bool {
        matches!(self, EntityOutput::None | EntityOutput::Rail(false))
    }

    /// The rail value, if this is a rail.
    pub fn rail(self) -> Option<bool> {
        match self {
            EntityOutput::Rail(v) => Some(v),
            _ => None,
        }
    }

    /// The driving entity, if this is a port.
    pub fn entity(self) -> Option<EntityId> {
        match self {
            EntityOutput::Port { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// The driving entity's family, if this is a port.
    pub fn kind(self) -> Option<EntityKind> {
        match self {
            EntityOutput::Port { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for EntityOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityOutput::None => f.write_str("-"),
            EntityOutput::Rail(false) => f.write_str("GND"),
            EntityOutput::Rail(true) => f.write_str("VDD"),
            EntityOutput::Port { entity, kind, port } => write!(f, "{kind}#{entity}.{port}"),
        }
    }
}

/// Where an entity sits on the part.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EntityLocation {
    /// Routing matrix of the entity's input words.
    pub matrix: usize,
    /// First input-bus word, if the entity has fabric inputs.
    pub input_base: Option<usize>,
    /// Matrix and word of the entity's output, if it drives the fabric.
    pub output: Option<(usize, usize)>,
    /// First configuration bit, if the entity has a config region.
    pub config_base: Option<usize>,
}

/// How a netlist cell port maps onto an entity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PortRole {
    /// Drives the named entity input.
    Input(&'static str),
    /// Carries the named entity output.
    Output(&'static str),
    /// The package pad; not routed through the fabric.
    Pad,
    /// Not a port of this primitive.
    Unknown,
}

/// Device-wide lookup tables built once per part.
///
/// The directory maps output words back to their drivers and finds entities
/// by family and index. It never changes after the device is built, so
/// entities can consult it while the device mutates them.
#[derive(Debug, Default)]
pub struct Directory {
    kinds: Vec<EntityKind>,
    outputs: Vec<Option<(usize, usize)>>,
    drivers: HashMap<(usize, usize), EntityOutput>,
    by_kind: BTreeMap<(EntityKind, usize), EntityId>,
}

impl Directory {
    pub(crate) fn build(entities: &[Entity]) -> Self {
        let mut dir = Directory::default();
        for (i, entity) in entities.iter().enumerate() {
            let id = EntityId::from_raw(i as u32);
            let kind = entity.kind();
            let output = entity.location().output;
            dir.kinds.push(kind);
            dir.outputs.push(output);
            dir.by_kind.insert((kind, entity.index()), id);
            if let (Some(word), Some(port)) = (output, entity.output_ports().first().copied()) {
                dir.drivers.insert(
                    word,
                    EntityOutput::Port {
                        entity: id,
                        kind,
                        port,
                    },
                );
            }
        }
        dir
    }

    /// The family of `id`.
    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.kinds.get(id.index()).copied()
    }

    /// Matrix and word driven by `id`.
    pub fn output_word(&self, id: EntityId) -> Option<(usize, usize)> {
        self.outputs.get(id.index()).copied().flatten()
    }

    /// The entity driving `word` of `matrix`.
    pub fn driver_at(&self, matrix: usize, word: usize) -> Option<EntityOutput> {
        self.drivers.get(&(matrix, word)).copied()
    }

    /// Finds the `index`-th entity of a family.
    pub fn find(&self, kind: EntityKind, index: usize) -> Option<EntityId> {
        self.by_kind.get(&(kind, index)).copied()
    }

    /// A port reference to the `index`-th entity of a family.
    pub fn port(
        &self,
        kind: EntityKind,
        index: usize,
        port: &'static str,
    ) -> Option<EntityOutput> {
        self.find(kind, index)
            .map(|entity| EntityOutput::Port { entity, kind, port })
    }

    /// Every entity of a family, ascending by index.
    pub fn family(&self, kind: EntityKind) -> impl Iterator<Item = EntityId> + '_ {
        self.by_kind
            .range((kind, 0)..=(kind, usize::MAX))
            .map(|(_, id)| *id)
    }
}

/// Everything [`BitstreamEntity::save`] may consult.
pub struct SaveContext<'a> {
    /// The part's register map.
    pub layout: &'static PartLayout,
    /// Device lookup tables.
    pub directory: &'a Directory,
    /// Every entity on the device, indexed by [`EntityId`].
    pub entities: &'a [Entity],
    /// Where warnings go.
    pub sink: &'a DiagnosticSink,
}

impl SaveContext<'_> {
    /// The target part.
    pub fn part(&self) -> Part {
        self.layout.part
    }

    /// Looks up another entity.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }
}

/// Everything [`BitstreamEntity::load`] may consult.
pub struct LoadContext<'a> {
    /// The part's register map.
    pub layout: &'static PartLayout,
    /// Device lookup tables.
    pub directory: &'a Directory,
    /// Where warnings go.
    pub sink: &'a DiagnosticSink,
}

impl LoadContext<'_> {
    /// The target part.
    pub fn part(&self) -> Part {
        self.layout.part
    }
}

/// The netlist view handed to [`BitstreamEntity::commit_changes`].
pub struct CommitContext<'a> {
    /// The module being placed.
    pub module: &'a Module,
    /// The bound cell; `None` for an IOB created for a bare module port.
    pub cell: Option<&'a Cell>,
    /// Cell or port name, for messages.
    pub name: &'a str,
    /// Parameters, then cell attributes, then pad-net attributes.
    pub params: BTreeMap<String, ParamValue>,
    /// Where warnings go.
    pub sink: &'a DiagnosticSink,
}

impl<'a> CommitContext<'a> {
    /// Builds a context for `cell`, merging its parameters over its attributes.
    pub fn for_cell(module: &'a Module, cell: &'a Cell, sink: &'a DiagnosticSink) -> Self {
        let mut params = cell.attributes.clone();
        params.extend(cell.parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            module,
            cell: Some(cell),
            name: &cell.name,
            params,
            sink,
        }
    }

    /// Looks up a parameter.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Looks up a parameter as upper-cased text, accepting numbers too.
    pub fn param_text(&self, name: &str) -> Option<String> {
        self.param(name).map(|v| v.to_string().to_ascii_uppercase())
    }

    /// Reads a `0`/`1` flag, defaulting to `false` when absent.
    pub fn flag(&self, entity: &str, name: &str) -> Result<bool, EntityError> {
        match self.param(name) {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| {
                EntityError::drc(entity, format!("{name} must be 0 or 1, got {v}"))
            }),
        }
    }

    /// Reads an integer parameter.
    pub fn int(&self, entity: &str, name: &str) -> Result<Option<i64>, EntityError> {
        match self.param(name) {
            None => Ok(None),
            Some(v) => v.as_int().map(Some).ok_or_else(|| {
                EntityError::drc(entity, format!("{name} must be an integer, got {v}"))
            }),
        }
    }

    /// Emits a warning for every cell parameter not in `known`. `LOC` is
    /// consumed by placement and always accepted.
    pub fn warn_unknown(&self, entity: &str, known: &[&str]) {
        let Some(cell) = self.cell else { return };
        for name in cell.parameters.keys() {
            if name != "LOC" && !known.contains(&name.as_str()) {
                self.sink.emit(
                    Diagnostic::warning(
                        UNKNOWN_PARAMETER,
                        format!("unknown parameter {name} ignored"),
                        Location::Cell(cell.name.clone()),
                    )
                    .with_note(format!("cell is placed on {entity}")),
                );
            }
        }
    }
}

/// Writes the selector word for one fabric input.
///
/// Ground and unconnected encode as word 0, Vdd as word 63, and a port as
/// its driver's output word, which must be in the same matrix.
pub fn write_selector(
    bits: &mut Bitstream,
    ctx: &SaveContext<'_>,
    owner: &str,
    matrix: usize,
    word: usize,
    source: EntityOutput,
) -> Result<(), EntityError> {
    let value = match source {
        EntityOutput::None | EntityOutput::Rail(false) => GROUND_WORD,
        EntityOutput::Rail(true) => VDD_WORD,
        EntityOutput::Port { entity, kind, .. } => match ctx.directory.output_word(entity) {
            Some((m, w)) if m == matrix => w,
            Some((m, _)) => {
                return Err(EntityError::encoding(
                    owner,
                    format!("{kind} driver is in matrix {m}, input is in matrix {matrix}"),
                ))
            }
            None => {
                return Err(EntityError::encoding(
                    owner,
                    format!("{kind} output cannot drive the routing matrix"),
                ))
            }
        },
    };
    let range = ctx.layout.input_word_bits(matrix, word);
    bits.write_field(range.start, range.len(), value as u64)?;
    Ok(())
}

/// Reads the selector word for one fabric input.
pub fn read_selector(
    bits: &Bitstream,
    ctx: &LoadContext<'_>,
    owner: &str,
    matrix: usize,
    word: usize,
) -> Result<EntityOutput, EntityError> {
    let range = ctx.layout.input_word_bits(matrix, word);
    let value = bits.read_field(range.start, range.len())? as usize;
    match value {
        GROUND_WORD => Ok(EntityOutput::GROUND),
        VDD_WORD => Ok(EntityOutput::VDD),
        w => ctx.directory.driver_at(matrix, w).ok_or_else(|| {
            EntityError::encoding(owner, format!("matrix {matrix} word {w} has no driver"))
        }),
    }
}

/// The uniform contract of every configurable primitive.
pub trait BitstreamEntity {
    /// The entity's family.
    fn kind(&self) -> EntityKind;

    /// Index within the family, across the whole device.
    fn index(&self) -> usize;

    /// Matrix and addresses.
    fn location(&self) -> EntityLocation;

    /// Stable name such as `LUT3_2` or `IOB_P5`, matched against `LOC`.
    fn description(&self) -> String;

    /// The netlist cell type this entity round-trips to.
    fn primitive_name(&self) -> &'static str;

    /// Whether a cell of `cell_type` may be placed here.
    fn accepts_primitive(&self, cell_type: &str) -> bool {
        cell_type == self.primitive_name()
    }

    /// Length of the configuration region in bits.
    fn config_len(&self) -> usize;

    /// Absolute configuration bit ranges owned by this entity.
    fn config_regions(&self) -> Vec<Range<usize>> {
        match self.location().config_base {
            Some(base) if self.config_len() > 0 => vec![base..base + self.config_len()],
            _ => Vec::new(),
        }
    }

    /// Fabric inputs, in input-bus word order.
    fn input_ports(&self) -> &'static [&'static str] {
        &[]
    }

    /// Inputs wired directly rather than through the routing matrix.
    fn dedicated_inputs(&self) -> &'static [&'static str] {
        &[]
    }

    /// Output port names.
    fn output_ports(&self) -> &'static [&'static str] {
        &[]
    }

    /// The driver of an input.
    fn get_input(&self, port: &str) -> Option<EntityOutput>;

    /// Connects an input.
    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError>;

    /// Output word of `port` within the entity's output matrix.
    fn output_net_number(&self, port: &str) -> Option<usize> {
        let (_, word) = self.location().output?;
        self.output_ports()
            .iter()
            .any(|p| *p == port)
            .then_some(word)
    }

    /// Maps a port bit of a netlist cell of type `cell_type` onto this entity.
    fn cell_port_role(&self, _cell_type: &str, port: &str, bit: usize) -> PortRole {
        if bit != 0 {
            return PortRole::Unknown;
        }
        let mut inputs = self
            .input_ports()
            .iter()
            .chain(self.dedicated_inputs())
            .copied();
        if let Some(name) = inputs.find(|p| *p == port) {
            return PortRole::Input(name);
        }
        match self.output_ports().iter().copied().find(|p| *p == port) {
            Some(name) => PortRole::Output(name),
            None => PortRole::Unknown,
        }
    }

    /// Parameter names understood by `commit_changes`.
    fn known_parameters(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the entity differs from its power-on state.
    fn is_configured(&self) -> bool;

    /// One-line description of the current state, for decode listings.
    fn summary(&self) -> String;

    /// Pulls the bound cell's parameters into typed state.
    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError>;

    /// Writes the configuration region and input selectors.
    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError>;

    /// Reconstructs state from the configuration region and input selectors.
    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError>;
}

/// Saves every fabric input's selector for an entity.
pub(crate) fn save_inputs<E: BitstreamEntity + ?Sized>(
    entity: &E,
    bits: &mut Bitstream,
    ctx: &SaveContext<'_>,
) -> Result<(), EntityError> {
    let loc = entity.location();
    let Some(base) = loc.input_base else {
        return Ok(());
    };
    let owner = entity.description();
    for (i, port) in entity.input_ports().iter().enumerate() {
        let source = entity.get_input(port).unwrap_or_default();
        write_selector(bits, ctx, &owner, loc.matrix, base + i, source)?;
    }
    Ok(())
}

/// Loads every fabric input's selector for an entity.
pub(crate) fn load_inputs<E: BitstreamEntity + ?Sized>(
    entity: &mut E,
    bits: &Bitstream,
    ctx: &LoadContext<'_>,
) -> Result<(), EntityError> {
    let loc = entity.location();
    let Some(base) = loc.input_base else {
        return Ok(());
    };
    let owner = entity.description();
    for (i, port) in entity.input_ports().iter().enumerate() {
        let source = read_selector(bits, ctx, &owner, loc.matrix, base + i)?;
        entity.set_input(port, source)?;
    }
    Ok(())
}

/// The error for a port the entity does not have.
pub(crate) fn unknown_port(entity: &str, port: &str) -> EntityError {
    EntityError::UnknownPort {
        entity: entity.to_string(),
        port: port.to_string(),
    }
}
