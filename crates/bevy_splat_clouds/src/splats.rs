//! Fixed-size splat storage shared by the synthesizer, the wind animator and
//! the render bridge.

use bevy::prelude::*;

/// Constant splat extents: flattened on Y.
pub const SPLAT_SCALE: Vec3 = Vec3::new(0.12, 0.08, 0.12);

/// One renderable splat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplatRecord {
    pub center: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
    pub opacity: f32,
    /// Linear RGB.
    pub color: Vec3,
}

/// Indexable splat array whose length is fixed at construction.
///
/// The index is a splat's only identity. Animation mutates records in place;
/// a rebuild produces a whole new set that replaces this one.
#[derive(Clone, Debug, Default)]
pub struct SplatSet {
    records: Vec<SplatRecord>,
    needs_update: bool,
}

impl SplatSet {
    pub fn from_records(records: Vec<SplatRecord>) -> Self {
        Self {
            records,
            needs_update: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SplatRecord> {
        self.records.get(index)
    }

    /// Replace the record at `index`. Out-of-range writes are ignored and
    /// return `false`; the set never grows.
    pub fn set(&mut self, index: usize, record: SplatRecord) -> bool {
        let Some(slot) = self.records.get_mut(index) else {
            return false;
        };
        *slot = record;
        self.needs_update = true;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &SplatRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[SplatRecord] {
        &self.records
    }

    /// Visit every record mutably with its index, then flag the set dirty.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(usize, &mut SplatRecord)) {
        for (index, record) in self.records.iter_mut().enumerate() {
            f(index, record);
        }
        self.needs_update = true;
    }

    /// Whether records changed since the renderer last consumed them.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn mark_updated(&mut self) {
        self.needs_update = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f32) -> SplatRecord {
        SplatRecord {
            center: Vec3::new(x, 0.0, 0.0),
            scale: SPLAT_SCALE,
            rotation: Quat::IDENTITY,
            opacity: 0.5,
            color: Vec3::ONE,
        }
    }

    #[test]
    fn set_never_grows() {
        let mut set = SplatSet::from_records(vec![record(0.0), record(1.0)]);
        assert!(set.set(1, record(5.0)));
        assert!(!set.set(2, record(9.0)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).map(|r| r.center.x), Some(5.0));
    }

    #[test]
    fn dirty_flag_tracks_writes() {
        let mut set = SplatSet::from_records(vec![record(0.0)]);
        assert!(set.needs_update());
        set.mark_updated();
        assert!(!set.needs_update());
        set.for_each_mut(|_, r| r.center.y = 2.0);
        assert!(set.needs_update());
        assert_eq!(set.get(0).map(|r| r.center.y), Some(2.0));
    }

    #[test]
    fn default_set_is_empty() {
        let set = SplatSet::default();
        assert!(set.is_empty());
        assert!(set.get(0).is_none());
    }
}
