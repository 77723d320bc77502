//! The result of binding a netlist onto a device.

use gpar_device::{BitstreamEntity, Device, EntityId, EntityKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Which entity every cell and pad ended up on.
#[derive(Clone, Debug, Default)]
pub struct Placement {
    /// Cell name to entity. Power-rail cells map to the shared rail.
    pub cells: BTreeMap<String, EntityId>,
    /// Bit of a top-level port without a buffer cell, to its IOB.
    pub ports: BTreeMap<(String, usize), EntityId>,
    /// Cross-connections, in allocation order.
    pub cross_connections: Vec<EntityId>,
}

/// Usage of one entity family.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct FamilyUsage {
    /// The family.
    pub kind: EntityKind,
    /// Entities in use.
    pub used: usize,
    /// Entities on the part.
    pub total: usize,
}

impl Placement {
    /// Whether `id` has been claimed by a cell, pad or route.
    pub fn is_claimed(&self, id: EntityId) -> bool {
        self.cells.values().any(|e| *e == id)
            || self.ports.values().any(|e| *e == id)
            || self.cross_connections.contains(&id)
    }

    /// The entity bound to `cell`.
    pub fn entity_of(&self, cell: &str) -> Option<EntityId> {
        self.cells.get(cell).copied()
    }

    /// Per-family usage, skipping families the part does not have and the
    /// power rails and system block.
    pub fn utilization(&self, device: &Device) -> Vec<FamilyUsage> {
        let claimed: BTreeSet<EntityId> = self
            .cells
            .values()
            .chain(self.ports.values())
            .chain(&self.cross_connections)
            .copied()
            .collect();
        let mut usage: BTreeMap<EntityKind, (usize, usize)> = BTreeMap::new();
        for (id, entity) in device.iter() {
            let kind = entity.kind();
            if matches!(kind, EntityKind::PowerRail | EntityKind::System) {
                continue;
            }
            let slot = usage.entry(kind).or_default();
            slot.1 += 1;
            if claimed.contains(&id) {
                slot.0 += 1;
            }
        }
        usage
            .into_iter()
            .map(|(kind, (used, total))| FamilyUsage { kind, used, total })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpar_device::Part;

    #[test]
    fn utilization_counts_claims() {
        let device = Device::new(Part::Slg46620);
        let mut placement = Placement::default();
        let lut = device.directory().find(EntityKind::Lut, 3).unwrap();
        let xconn = device.directory().find(EntityKind::CrossConnection, 0).unwrap();
        placement.cells.insert("u1".into(), lut);
        placement.cells.insert("vdd".into(), device.vdd());
        placement.cross_connections.push(xconn);
        assert!(placement.is_claimed(lut));
        assert_eq!(placement.entity_of("u1"), Some(lut));

        let usage = placement.utilization(&device);
        let luts = usage.iter().find(|u| u.kind == EntityKind::Lut).unwrap();
        assert_eq!((luts.used, luts.total), (1, 14));
        let xconns = usage
            .iter()
            .find(|u| u.kind == EntityKind::CrossConnection)
            .unwrap();
        assert_eq!((xconns.used, xconns.total), (1, 20));
        assert!(usage.iter().all(|u| u.kind != EntityKind::PowerRail));
    }
}
