//! # Waypoint store module
//!
//! The waypoint store is a fixed-capacity ordered collection of the mission's
//! waypoints. Storage is an array of slots, each either `Free` or `Full`,
//! with all `Full` slots forming a contiguous prefix. Every stored waypoint
//! also carries `next`/`previous` links naming its neighbours by id, so the
//! path can be walked as a doubly-linked list while edits address slots by
//! position.
//!
//! The two representations are redundant and must always agree: for adjacent
//! full slots `i` and `i + 1`, `slots[i].next` names `slots[i + 1]` and
//! `slots[i + 1].previous` names `slots[i]`. Links are ids rather than slot
//! indices because compaction shifts records between slots without renaming
//! them, and ids are never reused within a session.
//!
//! Every mutating operation either fully succeeds or returns an error having
//! touched nothing - all validation happens before the first slot is
//! written.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};

// Internal
use nav_if::mission::{WaypointKind, WaypointSpec};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The maximum number of waypoints the store can hold.
pub const CAPACITY: usize = 50;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A stored waypoint record.
///
/// Records are created only by [`WpStore::create`], which assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Unique id, assigned by the store, strictly increasing within a session.
    pub id: u32,

    /// Latitude in degrees.
    pub lat_deg: f64,

    /// Longitude in degrees.
    pub lon_deg: f64,

    /// Target altitude for this leg in meters.
    pub alt_m: f64,

    /// The kind of the waypoint, selecting the guidance law.
    pub kind: WaypointKind,

    /// Turn radius in meters, meaningful only for orbit waypoints.
    pub turn_radius_m: f64,

    /// Id of the following waypoint, `None` for the tail.
    pub next: Option<u32>,

    /// Id of the preceding waypoint, `None` for the head.
    pub previous: Option<u32>,
}

/// A single slot in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Slot {
    Free,
    Full(Waypoint),
}

/// The store itself.
pub struct WpStore {
    /// The slot array. Full slots always occupy the contiguous prefix
    /// `[0, count)`.
    slots: [Slot; CAPACITY],

    /// Number of full slots.
    count: usize,

    /// Next id to be assigned by `create`. Reset only by `clear`.
    next_id: u32,

    /// Home position, captured once at `initialise` and immutable thereafter.
    home_base: Option<WaypointSpec>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Occupancy of a slot, for telemetry introspection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Free,
    Full,
}

/// Possible errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store is full, or an initial mission exceeds the capacity.
    #[error("The waypoint store capacity would be exceeded")]
    CapacityExceeded,

    /// The referenced id is not in the store.
    #[error("No waypoint with id {0} is in the store")]
    NotFound(u32),

    /// The two ids given to an insert are not currently adjacent.
    #[error("Waypoints {previous} and {next} are not adjacent in the path")]
    AdjacencyViolation {
        previous: u32,
        next: u32
    },

    /// The appended waypoint has exactly the tail's coordinates.
    #[error("The new waypoint has the same coordinates as the current tail")]
    DuplicateOfTail,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WpStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Slot::Free),
            count: 0,
            next_id: 0,
            home_base: None,
        }
    }

    /// Seed the store with an initial ordered mission and record the home
    /// position.
    ///
    /// Any previously stored mission is destroyed and the id generator
    /// restarts from zero. Fails with [`StoreError::CapacityExceeded`] if the
    /// initial mission is longer than [`CAPACITY`], in which case the store
    /// is left untouched.
    pub fn initialise(
        &mut self,
        initial: &[WaypointSpec],
        home: WaypointSpec
    ) -> Result<(), StoreError> {
        if initial.len() > CAPACITY {
            return Err(StoreError::CapacityExceeded);
        }

        self.clear();
        self.home_base = Some(home);

        // Fill the prefix
        for (i, spec) in initial.iter().enumerate() {
            let wp = self.create(*spec);
            self.slots[i] = Slot::Full(wp);
        }
        self.count = initial.len();

        // Link the prefix together
        for i in 0..self.count {
            let previous = match i {
                0 => None,
                _ => self.id_at(i - 1),
            };
            let next = match i + 1 < self.count {
                true => self.id_at(i + 1),
                false => None,
            };

            if let Some(wp) = self.get_full_mut(i) {
                wp.previous = previous;
                wp.next = next;
            }
        }

        Ok(())
    }

    /// Create a new waypoint record from the given spec, assigning it a fresh
    /// id.
    ///
    /// The record is NOT yet in the store - pass it to [`WpStore::append`],
    /// [`WpStore::insert`] or [`WpStore::update`] to store it.
    pub fn create(&mut self, spec: WaypointSpec) -> Waypoint {
        let wp = Waypoint {
            id: self.next_id,
            lat_deg: spec.lat_deg,
            lon_deg: spec.lon_deg,
            alt_m: spec.alt_m,
            kind: spec.kind,
            turn_radius_m: spec.turn_radius_m,
            next: None,
            previous: None,
        };

        self.next_id += 1;

        wp
    }

    /// Add a waypoint at the end of the path.
    ///
    /// Fails with [`StoreError::DuplicateOfTail`] if the new waypoint's
    /// coordinates exactly equal the current tail's. Only the tail is
    /// checked, this is not a full duplicate scan.
    pub fn append(&mut self, wp: Waypoint) -> Result<(), StoreError> {
        if self.count == CAPACITY {
            return Err(StoreError::CapacityExceeded);
        }

        // Capture the tail before any mutation
        let tail = match self.count {
            0 => None,
            n => self.get_full(n - 1).map(|t| (t.id, t.lat_deg, t.lon_deg)),
        };

        if let Some((_, lat_deg, lon_deg)) = tail {
            if lat_deg == wp.lat_deg && lon_deg == wp.lon_deg {
                return Err(StoreError::DuplicateOfTail);
            }
        }

        let index = self.count;
        let new_id = wp.id;

        let mut wp = wp;
        wp.previous = tail.map(|(id, _, _)| id);
        wp.next = None;

        self.slots[index] = Slot::Full(wp);

        // Link the old tail forwards to the new one
        if index > 0 {
            self.set_next(index - 1, Some(new_id));
        }

        self.count += 1;

        Ok(())
    }

    /// Insert a waypoint directly between the waypoints identified by
    /// `previous_id` and `next_id`.
    ///
    /// The two ids must currently be positionally adjacent. All slots from
    /// the insertion point are shifted right by one before the new record is
    /// written, and the three affected link pairs are rewritten.
    pub fn insert(
        &mut self,
        wp: Waypoint,
        previous_id: u32,
        next_id: u32
    ) -> Result<(), StoreError> {
        if self.count == CAPACITY {
            return Err(StoreError::CapacityExceeded);
        }

        let previous_index = self
            .find_index(previous_id)
            .ok_or(StoreError::NotFound(previous_id))?;
        let next_index = self
            .find_index(next_id)
            .ok_or(StoreError::NotFound(next_id))?;

        if next_index != previous_index + 1 {
            return Err(StoreError::AdjacencyViolation {
                previous: previous_id,
                next: next_id,
            });
        }

        // Shift the suffix right by one, leaving a free slot at next_index.
        // count < CAPACITY so slots[count] is free.
        for i in (next_index..self.count).rev() {
            self.slots.swap(i, i + 1);
        }

        let new_id = wp.id;
        let mut wp = wp;
        wp.previous = Some(previous_id);
        wp.next = Some(next_id);

        self.slots[next_index] = Slot::Full(wp);

        // Relink the neighbours to the new record
        self.set_next(previous_index, Some(new_id));
        self.set_previous(next_index + 1, Some(new_id));

        self.count += 1;

        Ok(())
    }

    /// Replace the record at `id` in place.
    ///
    /// The replacement keeps its own (fresh) id, inherits the old record's
    /// position and neighbours, and both neighbours are relinked to it. The
    /// old record is destroyed.
    pub fn update(&mut self, wp: Waypoint, id: u32) -> Result<(), StoreError> {
        let index = self.find_index(id).ok_or(StoreError::NotFound(id))?;

        let (old_previous, old_next) = match self.get_full(index) {
            Some(old) => (old.previous, old.next),
            None => (None, None),
        };

        let new_id = wp.id;
        let mut wp = wp;
        wp.previous = old_previous;
        wp.next = old_next;

        // The old record is dropped here
        self.slots[index] = Slot::Full(wp);

        if index > 0 {
            self.set_next(index - 1, Some(new_id));
        }
        if index + 1 < self.count {
            self.set_previous(index + 1, Some(new_id));
        }

        Ok(())
    }

    /// Remove the record at `id`, relinking its former neighbours to each
    /// other and compacting the prefix so no gap remains.
    pub fn delete(&mut self, id: u32) -> Result<(), StoreError> {
        let index = self.find_index(id).ok_or(StoreError::NotFound(id))?;

        let previous_id = match index {
            0 => None,
            _ => self.get_full(index - 1).map(|w| w.id),
        };
        let next_id = match index + 1 < self.count {
            true => self.get_full(index + 1).map(|w| w.id),
            false => None,
        };

        // Link the neighbours together, skipping the removed record
        if index > 0 {
            self.set_next(index - 1, next_id);
        }
        if index + 1 < self.count {
            self.set_previous(index + 1, previous_id);
        }

        // Destroy the record and compact the prefix
        self.slots[index] = Slot::Free;
        for i in index..self.count - 1 {
            self.slots.swap(i, i + 1);
        }

        self.count -= 1;

        Ok(())
    }

    /// Destroy every stored waypoint, reset the store to empty and reset the
    /// id generator.
    ///
    /// The home base is not cleared.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Free;
        }

        self.count = 0;
        self.next_id = 0;
    }

    /// Find the slot index holding the waypoint with the given id.
    ///
    /// Linear scan over the contiguous prefix, stopping at the first free
    /// slot.
    pub fn find_index(&self, id: u32) -> Option<usize> {
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Free => return None,
                Slot::Full(wp) if wp.id == id => return Some(i),
                Slot::Full(_) => (),
            }
        }

        None
    }

    /// Get the occupancy of the slot at the given index.
    ///
    /// Indices at or beyond the capacity read as free.
    pub fn status_of(&self, index: usize) -> SlotStatus {
        match self.slots.get(index) {
            Some(Slot::Full(_)) => SlotStatus::Full,
            _ => SlotStatus::Free,
        }
    }

    /// Get a read-only view of the whole slot array.
    pub fn buffer(&self) -> &[Slot] {
        &self.slots
    }

    /// Get the number of waypoints currently stored.
    pub fn num_waypoints(&self) -> usize {
        self.count
    }

    /// Get the first waypoint of the path, if any.
    pub fn head(&self) -> Option<&Waypoint> {
        self.get_full(0)
    }

    /// Get the waypoint with the given id, if it is stored.
    pub fn get(&self, id: u32) -> Option<&Waypoint> {
        self.find_index(id).and_then(|i| self.get_full(i))
    }

    /// Get the waypoint at the given slot index, if that slot is full.
    pub fn get_at(&self, index: usize) -> Option<&Waypoint> {
        self.get_full(index)
    }

    /// Get the home position recorded at initialisation.
    pub fn home_base(&self) -> Option<&WaypointSpec> {
        self.home_base.as_ref()
    }

    // ---- PRIVATE HELPERS ----

    fn get_full(&self, index: usize) -> Option<&Waypoint> {
        match self.slots.get(index) {
            Some(Slot::Full(wp)) => Some(wp),
            _ => None,
        }
    }

    fn get_full_mut(&mut self, index: usize) -> Option<&mut Waypoint> {
        match self.slots.get_mut(index) {
            Some(Slot::Full(wp)) => Some(wp),
            _ => None,
        }
    }

    fn id_at(&self, index: usize) -> Option<u32> {
        self.get_full(index).map(|wp| wp.id)
    }

    fn set_next(&mut self, index: usize, next: Option<u32>) {
        if let Some(wp) = self.get_full_mut(index) {
            wp.next = next;
        }
    }

    fn set_previous(&mut self, index: usize, previous: Option<u32>) {
        if let Some(wp) = self.get_full_mut(index) {
            wp.previous = previous;
        }
    }
}

impl Default for WpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn spec(lat_deg: f64, lon_deg: f64) -> WaypointSpec {
        WaypointSpec::fly_through(lat_deg, lon_deg, 100.0)
    }

    /// Build a store initialised with `n` waypoints in a line of increasing
    /// latitude.
    fn store_with(n: usize) -> WpStore {
        let mut store = WpStore::new();
        let initial: Vec<WaypointSpec> =
            (0..n).map(|i| spec(i as f64 * 0.01, 0.0)).collect();
        store
            .initialise(&initial, spec(0.0, 0.0))
            .expect("initialise failed");
        store
    }

    /// Snapshot of the store's contents, by id and coordinates, for
    /// atomicity comparisons.
    fn id_coords(store: &WpStore) -> Vec<(u32, f64, f64)> {
        (0..store.num_waypoints())
            .filter_map(|i| store.get_at(i))
            .map(|wp| (wp.id, wp.lat_deg, wp.lon_deg))
            .collect()
    }

    /// Check every structural invariant of the store: contiguous prefix,
    /// id-link/positional agreement, absent end links, unique ids.
    fn assert_store_consistent(store: &WpStore) {
        let count = store.num_waypoints();

        // Contiguous prefix
        for i in 0..CAPACITY {
            let expected = match i < count {
                true => SlotStatus::Full,
                false => SlotStatus::Free,
            };
            assert_eq!(store.status_of(i), expected, "slot {} occupancy", i);
        }

        // Link/positional agreement
        for i in 0..count {
            let wp = store.get_at(i).unwrap();

            let expected_previous = match i {
                0 => None,
                _ => Some(store.get_at(i - 1).unwrap().id),
            };
            let expected_next = match i + 1 < count {
                true => Some(store.get_at(i + 1).unwrap().id),
                false => None,
            };

            assert_eq!(wp.previous, expected_previous, "slot {} previous", i);
            assert_eq!(wp.next, expected_next, "slot {} next", i);
        }

        // Unique ids
        let mut ids: Vec<u32> =
            (0..count).map(|i| store.get_at(i).unwrap().id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count, "duplicate ids in store");
    }

    #[test]
    fn test_initialise_links_prefix() {
        let store = store_with(3);

        assert_eq!(store.num_waypoints(), 3);
        assert_store_consistent(&store);

        // Ids are assigned in order from zero
        assert_eq!(store.get_at(0).unwrap().id, 0);
        assert_eq!(store.get_at(1).unwrap().id, 1);
        assert_eq!(store.get_at(2).unwrap().id, 2);

        // Home base was recorded
        assert!(store.home_base().is_some());
    }

    #[test]
    fn test_initialise_over_capacity_fails() {
        let mut store = WpStore::new();
        let initial: Vec<WaypointSpec> =
            (0..CAPACITY + 1).map(|i| spec(i as f64 * 0.01, 0.0)).collect();

        assert_eq!(
            store.initialise(&initial, spec(0.0, 0.0)),
            Err(StoreError::CapacityExceeded)
        );
        assert_eq!(store.num_waypoints(), 0);
        assert!(store.home_base().is_none());
    }

    #[test]
    fn test_create_ids_strictly_increase() {
        let mut store = WpStore::new();

        let a = store.create(spec(0.0, 0.0));
        let b = store.create(spec(0.1, 0.0));
        let c = store.create(spec(0.2, 0.0));

        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_append_links_tail() {
        let mut store = store_with(2);

        let wp = store.create(spec(0.5, 0.5));
        let new_id = wp.id;
        store.append(wp).unwrap();

        assert_eq!(store.num_waypoints(), 3);
        assert_eq!(store.get_at(2).unwrap().id, new_id);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_append_first_waypoint() {
        let mut store = WpStore::new();

        let wp = store.create(spec(0.1, 0.2));
        store.append(wp).unwrap();

        assert_eq!(store.num_waypoints(), 1);
        let head = store.head().unwrap();
        assert_eq!(head.previous, None);
        assert_eq!(head.next, None);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_append_duplicate_of_tail_rejected() {
        let mut store = store_with(3);
        let before = id_coords(&store);

        // Exactly the tail's coordinates
        let wp = store.create(spec(0.02, 0.0));
        assert_eq!(store.append(wp), Err(StoreError::DuplicateOfTail));

        assert_eq!(id_coords(&store), before);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_append_at_capacity_rejected() {
        let mut store = store_with(CAPACITY);
        let before = id_coords(&store);

        let wp = store.create(spec(10.0, 10.0));
        assert_eq!(store.append(wp), Err(StoreError::CapacityExceeded));

        assert_eq!(id_coords(&store), before);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_insert_between_adjacent() {
        // W0, W1, W2 in a line, insert between W0 and W1
        let mut store = store_with(3);

        let wp = store.create(spec(0.005, 0.001));
        let new_id = wp.id;
        store.insert(wp, 0, 1).unwrap();

        assert_eq!(store.num_waypoints(), 4);
        assert_eq!(store.get_at(0).unwrap().id, 0);
        assert_eq!(store.get_at(1).unwrap().id, new_id);
        assert_eq!(store.get_at(2).unwrap().id, 1);
        assert_eq!(store.get_at(3).unwrap().id, 2);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_insert_unknown_id_rejected() {
        let mut store = store_with(3);
        let before = id_coords(&store);

        let wp = store.create(spec(0.005, 0.001));
        assert_eq!(store.insert(wp, 0, 99), Err(StoreError::NotFound(99)));

        assert_eq!(id_coords(&store), before);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_insert_non_adjacent_rejected() {
        let mut store = store_with(3);
        let before = id_coords(&store);

        let wp = store.create(spec(0.005, 0.001));
        assert_eq!(
            store.insert(wp, 0, 2),
            Err(StoreError::AdjacencyViolation { previous: 0, next: 2 })
        );

        // Order reversed is also not adjacent
        let wp = store.create(spec(0.006, 0.001));
        assert_eq!(
            store.insert(wp, 1, 0),
            Err(StoreError::AdjacencyViolation { previous: 1, next: 0 })
        );

        assert_eq!(id_coords(&store), before);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_insert_at_capacity_rejected() {
        let mut store = store_with(CAPACITY);
        let before = id_coords(&store);

        let wp = store.create(spec(10.0, 10.0));
        assert_eq!(store.insert(wp, 0, 1), Err(StoreError::CapacityExceeded));

        assert_eq!(id_coords(&store), before);
    }

    #[test]
    fn test_delete_middle() {
        let mut store = store_with(4);

        store.delete(1).unwrap();

        assert_eq!(store.num_waypoints(), 3);
        assert_eq!(store.get_at(0).unwrap().id, 0);
        assert_eq!(store.get_at(1).unwrap().id, 2);
        assert_eq!(store.get_at(2).unwrap().id, 3);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_delete_head_and_tail() {
        let mut store = store_with(3);

        store.delete(0).unwrap();
        assert_eq!(store.head().unwrap().id, 1);
        assert_store_consistent(&store);

        store.delete(2).unwrap();
        assert_eq!(store.num_waypoints(), 1);
        let only = store.head().unwrap();
        assert_eq!(only.previous, None);
        assert_eq!(only.next, None);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_delete_unknown_id_rejected() {
        let mut store = store_with(3);
        let before = id_coords(&store);

        assert_eq!(store.delete(42), Err(StoreError::NotFound(42)));

        assert_eq!(id_coords(&store), before);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_update_relinks_neighbours() {
        let mut store = store_with(3);

        let wp = store.create(spec(0.5, 0.5));
        let new_id = wp.id;
        store.update(wp, 1).unwrap();

        assert_eq!(store.num_waypoints(), 3);
        assert_eq!(store.get_at(1).unwrap().id, new_id);
        assert_eq!(store.get_at(1).unwrap().lat_deg, 0.5);
        assert!(store.get(1).is_none());
        assert_store_consistent(&store);
    }

    #[test]
    fn test_update_unknown_id_rejected() {
        let mut store = store_with(3);
        let before = id_coords(&store);

        let wp = store.create(spec(0.5, 0.5));
        assert_eq!(store.update(wp, 7), Err(StoreError::NotFound(7)));

        assert_eq!(id_coords(&store), before);
        assert_store_consistent(&store);
    }

    #[test]
    fn test_clear_resets_generator() {
        let mut store = store_with(3);

        store.clear();

        assert_eq!(store.num_waypoints(), 0);
        assert_store_consistent(&store);

        // Generator restarts from zero
        let wp = store.create(spec(0.0, 0.0));
        assert_eq!(wp.id, 0);

        // Home base survives a clear
        assert!(store.home_base().is_some());
    }

    #[test]
    fn test_round_trip_leaves_generator_running() {
        let mut store = WpStore::new();

        let wp = store.create(spec(0.1, 0.2));
        let id = wp.id;
        store.append(wp).unwrap();

        assert_eq!(store.find_index(id), Some(0));

        store.delete(id).unwrap();
        assert_eq!(store.num_waypoints(), 0);
        assert_eq!(store.find_index(id), None);

        // Delete does not reset the generator, only clear does
        let wp = store.create(spec(0.3, 0.4));
        assert_eq!(wp.id, id + 1);
    }

    #[test]
    fn test_mixed_edit_sequence_stays_consistent() {
        let mut store = store_with(3);

        let wp = store.create(spec(0.005, 0.001));
        store.insert(wp, 0, 1).unwrap();
        assert_store_consistent(&store);

        store.delete(0).unwrap();
        assert_store_consistent(&store);

        let wp = store.create(spec(0.9, 0.9));
        store.append(wp).unwrap();
        assert_store_consistent(&store);

        let wp = store.create(spec(0.7, 0.7));
        store.update(wp, 2).unwrap();
        assert_store_consistent(&store);
    }
}
