//! Place-and-route for GreenPAK parts.
//!
//! Takes a loaded [`Netlist`] and configures every entity of a [`Device`]:
//!
//! 1. **Pins**: pad buffers and bare top-level ports get IOBs, honouring
//!    `LOC` pin constraints.
//! 2. **Binding**: every other cell gets an entity that accepts its type.
//! 3. **Routing**: each load is wired to its net's single driver, through a
//!    cross-connection when the two sit in different matrices.
//! 4. **Commit**: cell parameters are pushed into the entities.
//!
//! Every failure is reported through the [`DiagnosticSink`] before the
//! matching [`PnrError`] is returned.

#![warn(missing_docs)]

pub mod bind;
pub mod codes;
pub mod commit;
pub mod error;
pub mod iob;
pub mod placement;
pub mod route;

pub use error::PnrError;
pub use placement::{FamilyUsage, Placement};

use gpar_device::{Bitstream, BitstreamEntity, Device, DeviceError, EntityError, Part};
use gpar_diagnostics::{Diagnostic, DiagnosticSink, Location};
use gpar_netlist::Netlist;

/// Device-wide settings that do not come from the netlist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PnrOptions {
    /// Pattern ID burned into the part.
    pub pattern_id: u8,
    /// Whether the part refuses configuration read-back.
    pub read_protect: bool,
}

/// A fully configured device and its bitstream.
#[derive(Debug)]
pub struct Compiled {
    /// The configured device.
    pub device: Device,
    /// Where every cell landed.
    pub placement: Placement,
    /// The saved configuration.
    pub bitstream: Bitstream,
}

/// Places and routes the top module of `netlist` onto `device`.
pub fn place_and_route(
    netlist: &Netlist,
    device: &mut Device,
    options: &PnrOptions,
    sink: &DiagnosticSink,
) -> Result<Placement, PnrError> {
    let module = netlist.top_module();
    let mut placement = Placement::default();

    iob::place_iobs(module, device, &mut placement, sink)?;
    bind::bind_cells(module, device, &mut placement, sink)?;
    route::route(module, device, &mut placement, sink)?;
    commit::commit_all(module, device, &placement, sink)?;

    let system = device.system_mut();
    system.pattern_id = options.pattern_id;
    system.read_protect = options.read_protect;

    let usage: Vec<String> = placement
        .utilization(device)
        .iter()
        .filter(|u| u.used > 0)
        .map(|u| format!("{}: {}/{}", u.kind, u.used, u.total))
        .collect();
    let mut summary = Diagnostic::info(
        codes::I601,
        format!(
            "placed {} cells and {} bare pins of `{}` on {}",
            placement.cells.len(),
            placement.ports.len(),
            netlist.top_name(),
            device.part()
        ),
        Location::None,
    );
    if !usage.is_empty() {
        summary = summary.with_note(usage.join(", "));
    }
    sink.emit(summary);
    Ok(placement)
}

/// Places and routes `netlist` onto a fresh `part` and saves the result.
pub fn compile(
    netlist: &Netlist,
    part: Part,
    options: &PnrOptions,
    sink: &DiagnosticSink,
) -> Result<Compiled, PnrError> {
    let mut device = Device::new(part);
    let placement = place_and_route(netlist, &mut device, options, sink)?;
    let bitstream = device.save_bitstream(sink).map_err(|err| {
        let location = blame(&err, &device, &placement);
        error::entity_failure(sink, err, location)
    })?;
    Ok(Compiled {
        device,
        placement,
        bitstream,
    })
}

/// Attributes a save failure to the cell bound on the failing entity.
fn blame(err: &DeviceError, device: &Device, placement: &Placement) -> Location {
    let DeviceError::Entity(err) = err else {
        return Location::None;
    };
    let name = match err {
        EntityError::Drc { entity, .. }
        | EntityError::Encoding { entity, .. }
        | EntityError::Unimplemented { entity, .. }
        | EntityError::UnknownPort { entity, .. } => entity,
        EntityError::BitOutOfRange { .. } => return Location::None,
    };
    let cell = placement.cells.iter().find(|(_, id)| {
        device
            .entity(**id)
            .is_some_and(|e| e.description() == *name)
    });
    match cell {
        Some((cell, _)) => Location::Cell(cell.clone()),
        None => Location::Entity(name.clone()),
    }
}
