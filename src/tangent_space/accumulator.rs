//! Provides [`BasisAccumulator`]; the growing table of bases and the
//! find-or-create lookup from [`BaseIndex`] into it.
//!
//! Each [`BaseIndex`] owns a [`VertexSlot`] holding its accumulated normal.
//! The bases of a slot form a chain: the first is created on lookup, further
//! ones are appended whenever a contribution cannot be merged into any
//! existing base of the chain (mirrored seams, diverging tangents).

use alloc::vec::Vec;

use hashbrown::HashMap;

use super::{
    base_index::BaseIndex,
    raw_basis::{Contribution, RawBasis},
};
use crate::{CalculateTangentSpaceError, Ops, math::Vec3};

/// Stable index of a base within a [`BasisAccumulator`].
pub(super) type Handle = usize;

pub(super) struct VertexSlot<O: Ops> {
    /// Weighted sum of the normals contributed to this vertex instance.
    pub(super) normal: Vec3<O>,
    /// Input normal of the first corner referencing this vertex instance.
    /// Used when no triangle contributed a normal.
    pub(super) input_normal: Vec3<O>,
    first_entry: Handle,
}

impl<O: Ops> VertexSlot<O> {
    /// Returns the unit normal of this vertex instance, falling back to the
    /// input normal and finally `+Z`.
    pub(super) fn unit_normal(&self) -> Vec3<O> {
        self.normal
            .try_normalize()
            .or_else(|| self.input_normal.try_normalize())
            .unwrap_or(Vec3::Z)
    }
}

pub(super) struct Entry<O: Ops> {
    pub(super) raw: RawBasis<O>,
    pub(super) slot: usize,
    next: Option<Handle>,
}

pub(super) struct BasisAccumulator<O: Ops> {
    map: HashMap<BaseIndex, usize>,
    slots: Vec<VertexSlot<O>>,
    entries: Vec<Entry<O>>,
}

impl<O: Ops> BasisAccumulator<O> {
    pub(super) fn new() -> Self {
        Self {
            map: HashMap::new(),
            slots: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Reserves room for roughly `vertices` vertex instances.
    pub(super) fn try_reserve(&mut self, vertices: usize) -> Result<(), CalculateTangentSpaceError> {
        self.map.try_reserve(vertices)?;
        self.slots.try_reserve(vertices)?;
        self.entries.try_reserve(vertices)?;
        Ok(())
    }

    /// Returns the first base of the vertex instance `key`, creating an empty
    /// one if `key` has not been seen yet.
    ///
    /// `input_normal` is only evaluated on creation.
    pub(super) fn find_or_create(
        &mut self,
        key: BaseIndex,
        input_normal: impl FnOnce() -> [f32; 3],
    ) -> Result<Handle, CalculateTangentSpaceError> {
        if let Some(&slot) = self.map.get(&key) {
            return Ok(self.slots[slot].first_entry);
        }

        let slot = self.slots.len();
        let entry = self.push_entry(slot)?;

        self.slots.try_reserve(1)?;
        self.slots.push(VertexSlot {
            normal: Vec3::ZERO,
            input_normal: input_normal().into(),
            first_entry: entry,
        });

        self.map.try_reserve(1)?;
        self.map.insert(key, slot);

        Ok(entry)
    }

    fn push_entry(&mut self, slot: usize) -> Result<Handle, CalculateTangentSpaceError> {
        self.entries.try_reserve(1)?;
        self.entries.push(Entry {
            raw: RawBasis::ZERO,
            slot,
            next: None,
        });
        Ok(self.entries.len() - 1)
    }

    /// Adds a weighted normal to the vertex instance owning `handle`.
    pub(super) fn add_normal(&mut self, handle: Handle, normal: Vec3<O>) {
        let slot = self.entries[handle].slot;
        self.slots[slot].normal += normal;
    }

    /// Returns the slot of the vertex instance owning `handle`.
    pub(super) fn slot(&self, handle: Handle) -> &VertexSlot<O> {
        &self.slots[self.entries[handle].slot]
    }

    /// Merges `contribution` into the chain starting at `handle` and returns the
    /// base it ended up in.
    ///
    /// Unless `ignore_degeneracies` is set, the contribution joins the first
    /// base of the chain which [accepts](RawBasis::accepts) it, and a new base
    /// is appended to the chain if none does.
    pub(super) fn add_contribution(
        &mut self,
        handle: Handle,
        contribution: &Contribution<O>,
        ignore_degeneracies: bool,
        split_threshold: f32,
    ) -> Result<Handle, CalculateTangentSpaceError> {
        if ignore_degeneracies {
            self.entries[handle].raw.add(contribution);
            return Ok(handle);
        }

        let slot = self.entries[handle].slot;
        let n = self.slots[slot].unit_normal();

        let mut current = handle;
        loop {
            let entry = &mut self.entries[current];
            if entry.raw.accepts(contribution, n, split_threshold) {
                entry.raw.add(contribution);
                return Ok(current);
            }

            match entry.next {
                Some(next) => current = next,
                None => break,
            }
        }

        let split = self.push_entry(slot)?;
        self.entries[current].next = Some(split);
        self.entries[split].raw.add(contribution);

        log::trace!("splitting base {handle} into {split}");

        Ok(split)
    }

    pub(super) fn entries(&self) -> &[Entry<O>] {
        &self.entries
    }

    pub(super) fn slots(&self) -> &[VertexSlot<O>] {
        &self.slots
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::StdOps;

    type V = Vec3<StdOps>;

    fn contribution(u: V, mirrored: bool) -> Contribution<StdOps> {
        Contribution {
            u,
            v: V::Y,
            mirrored,
        }
    }

    #[test]
    fn find_or_create_is_stable() {
        let mut accumulator = BasisAccumulator::<StdOps>::new();
        let a = accumulator.find_or_create(BaseIndex::new(0, 0), || [0., 0., 1.]).unwrap();
        let b = accumulator.find_or_create(BaseIndex::new(1, 0), || [0., 0., 1.]).unwrap();
        let again = accumulator
            .find_or_create(BaseIndex::new(0, 0), || unreachable!())
            .unwrap();

        assert_eq!((a, b, again), (0, 1, 0));
        assert_eq!(accumulator.entries().len(), 2);
        assert_eq!(accumulator.slots().len(), 2);
    }

    #[test]
    fn mirrored_contribution_splits() {
        let mut accumulator = BasisAccumulator::<StdOps>::new();
        let handle = accumulator.find_or_create(BaseIndex::new(0, 0), || [0., 0., 1.]).unwrap();
        accumulator.add_normal(handle, V::Z);

        let first = accumulator
            .add_contribution(handle, &contribution(V::X, false), false, -1.)
            .unwrap();
        let mirrored = accumulator
            .add_contribution(handle, &contribution(-V::X, true), false, -1.)
            .unwrap();
        let mirrored_again = accumulator
            .add_contribution(handle, &contribution(-V::X, true), false, -1.)
            .unwrap();
        let unmirrored = accumulator
            .add_contribution(handle, &contribution(V::X, false), false, -1.)
            .unwrap();

        assert_eq!(first, handle);
        assert_ne!(mirrored, handle);
        assert_eq!(mirrored_again, mirrored);
        assert_eq!(unmirrored, handle);
        assert_eq!(accumulator.entries().len(), 2);

        // both bases share the vertex instance and so its normal
        assert_eq!(accumulator.entries()[mirrored].slot, accumulator.entries()[handle].slot);
    }

    #[test]
    fn ignoring_degeneracies_never_splits() {
        let mut accumulator = BasisAccumulator::<StdOps>::new();
        let handle = accumulator.find_or_create(BaseIndex::new(0, 0), || [0., 0., 1.]).unwrap();

        for (u, mirrored) in [(V::X, false), (-V::X, true)] {
            let merged = accumulator
                .add_contribution(handle, &contribution(u, mirrored), true, -1.)
                .unwrap();
            assert_eq!(merged, handle);
        }
        assert_eq!(accumulator.entries().len(), 1);
    }

    #[test]
    fn unit_normal_falls_back() {
        let mut accumulator = BasisAccumulator::<StdOps>::new();
        let with_input = accumulator.find_or_create(BaseIndex::new(0, 0), || [0., 2., 0.]).unwrap();
        let without = accumulator.find_or_create(BaseIndex::new(1, 0), || [0., 0., 0.]).unwrap();

        assert_eq!(accumulator.slot(with_input).unit_normal(), V::Y);
        assert_eq!(accumulator.slot(without).unit_normal(), V::Z);

        accumulator.add_normal(with_input, V::X * 3.);
        assert_eq!(accumulator.slot(with_input).unit_normal(), V::X);
    }
}
