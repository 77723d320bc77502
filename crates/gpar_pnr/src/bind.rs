//! Binding of fixed-role cells to entities.
//!
//! Cells carrying a `LOC` constraint are bound first so that unconstrained
//! cells never take a slot somebody asked for. Power-rail cells all share
//! the device's two rail entities.

use crate::codes;
use crate::error::{binding, PnrError};
use crate::placement::Placement;
use gpar_device::{BitstreamEntity, Device, Entity, EntityId};
use gpar_diagnostics::{DiagnosticSink, Location};
use gpar_netlist::{Cell, Module, ParamValue};

/// Cell types handled by pin placement rather than by binding.
pub const IO_BUFFERS: [&str; 4] = ["GP_IBUF", "GP_OBUF", "GP_OBUFT", "GP_IOBUF"];

/// Whether `cell_type` is a pad buffer.
pub fn is_io_buffer(cell_type: &str) -> bool {
    IO_BUFFERS.contains(&cell_type)
}

/// Binds every non-buffer cell of `module`.
pub fn bind_cells(
    module: &Module,
    device: &Device,
    placement: &mut Placement,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    let (constrained, free): (Vec<&Cell>, Vec<&Cell>) = module
        .cells
        .values()
        .filter(|c| !is_io_buffer(&c.cell_type))
        .partition(|c| c.param("LOC").is_some());
    for cell in constrained.into_iter().chain(free) {
        bind_cell(cell, device, placement, sink)?;
    }
    Ok(())
}

fn bind_cell(
    cell: &Cell,
    device: &Device,
    placement: &mut Placement,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    let location = Location::Cell(cell.name.clone());
    let rail = match cell.cell_type.as_str() {
        "GP_VDD" => Some(device.vdd()),
        "GP_VSS" => Some(device.ground()),
        _ => None,
    };
    if let Some(id) = rail {
        placement.cells.insert(cell.name.clone(), id);
        return Ok(());
    }

    let mut candidates: Vec<(EntityId, &Entity)> = device
        .iter()
        .filter(|(_, e)| e.accepts_primitive(&cell.cell_type))
        .collect();
    if candidates.is_empty() {
        return Err(binding(
            sink,
            codes::E201,
            format!(
                "{} has no entity for cell type {}",
                device.part(),
                cell.cell_type
            ),
            location,
            None,
        ));
    }
    // Exact primitive matches first, so a small cell does not take a large slot.
    candidates.sort_by_key(|(id, e)| (e.primitive_name() != cell.cell_type, *id));

    let chosen = match cell.param("LOC") {
        Some(loc) => {
            let (id, entity) = candidates
                .iter()
                .copied()
                .find(|(_, e)| loc_matches(loc, e))
                .ok_or_else(|| {
                    let legal: Vec<String> =
                        candidates.iter().map(|(_, e)| e.description()).collect();
                    binding(
                        sink,
                        codes::E202,
                        format!("LOC {loc} matches no {} slot", cell.cell_type),
                        location.clone(),
                        Some(format!("legal locations: {}", legal.join(", "))),
                    )
                })?;
            if let Some(other) = owner_of(placement, id) {
                return Err(binding(
                    sink,
                    codes::E203,
                    format!("{} is requested by more than one cell", entity.description()),
                    location,
                    Some(format!("already bound to `{other}`")),
                ));
            }
            id
        }
        None => candidates
            .iter()
            .map(|(id, _)| *id)
            .find(|id| !placement.is_claimed(*id))
            .ok_or_else(|| {
                binding(
                    sink,
                    codes::E204,
                    format!(
                        "all {} slots for {} are in use",
                        candidates.len(),
                        cell.cell_type
                    ),
                    location.clone(),
                    None,
                )
            })?,
    };
    placement.cells.insert(cell.name.clone(), chosen);
    Ok(())
}

/// Whether a `LOC` value names `entity`, by description or family index.
fn loc_matches(loc: &ParamValue, entity: &Entity) -> bool {
    let text = loc.to_string();
    if text.eq_ignore_ascii_case(&entity.description()) {
        return true;
    }
    let index = loc.as_int().or_else(|| text.parse().ok());
    index.is_some_and(|i| usize::try_from(i).ok() == Some(entity.index()))
}

fn owner_of(placement: &Placement, id: EntityId) -> Option<&str> {
    placement
        .cells
        .iter()
        .find(|(_, e)| **e == id)
        .map(|(name, _)| name.as_str())
}
