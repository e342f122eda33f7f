//! Sensor registry - fixed-capacity table of sensors keyed by id
//!
//! Slots are scanned linearly; with eight slots that is cheaper than any
//! index structure. Enumeration always follows slot order, so `LIST`
//! output and report order are deterministic.

use crate::config::MAX_SENSORS;
use crate::domain::sensor::{NewSensor, Sensor};

/// Error type for registry operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A sensor with this id already exists
    Duplicate,
    /// Every slot is in use
    Full,
    /// No sensor has this id
    NotFound,
}

/// Fixed-capacity sensor table
///
/// Invariant: at most one used slot per distinct id.
#[derive(Clone, Debug)]
pub struct SensorRegistry<const N: usize = MAX_SENSORS> {
    slots: [Option<Sensor>; N],
}

impl<const N: usize> Default for SensorRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SensorRegistry<N> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of used slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Look up a sensor by id
    pub fn find(&self, id: u8) -> Option<&Sensor> {
        self.iter().find(|sensor| sensor.id() == id)
    }

    /// Look up a sensor by id for modification
    pub fn find_mut(&mut self, id: u8) -> Option<&mut Sensor> {
        self.iter_mut().find(|sensor| sensor.id() == id)
    }

    pub fn exists(&self, id: u8) -> bool {
        self.find(id).is_some()
    }

    /// Whether the sensor exists and is active
    pub fn is_active(&self, id: u8) -> bool {
        self.find(id).is_some_and(|sensor| sensor.active)
    }

    /// Create a sensor in the first free slot
    ///
    /// Fails with [`RegistryError::Duplicate`] if the id is taken and with
    /// [`RegistryError::Full`] if no slot is free.
    pub fn create(&mut self, params: NewSensor, now_ms: u32) -> Result<&mut Sensor, RegistryError> {
        if self.exists(params.id) {
            return Err(RegistryError::Duplicate);
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(RegistryError::Full)?;
        Ok(slot.insert(Sensor::new(params, now_ms)))
    }

    /// Remove a sensor, freeing its slot immediately
    pub fn remove(&mut self, id: u8) -> Result<Sensor, RegistryError> {
        self.slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|sensor| sensor.id() == id))
            .and_then(Option::take)
            .ok_or(RegistryError::NotFound)
    }

    /// Used slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Sensor> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Used slots in slot order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sensor> + '_ {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }
}
