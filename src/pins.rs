//! Simulated hardware I/O pins.
//!
//! Embedded code under test reads and drives pins by name; the harness keeps
//! their state in a small fixed-capacity list. Lookups are linear, so the list
//! is kept in rough most-recently-used order: a hit on [`PinStore::get`] moves
//! the pin to the front, and a newly defined pin is placed at the front.

use std::fmt::Write as _;

use crate::errors::HarnessError;

/// Width of the name column in [`PinStore::dump`].
const DUMP_NAME_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pin {
    name: String,
    value: i32,
}

/// A bounded store of named pin values.
#[derive(Debug)]
pub struct PinStore {
    pins: Vec<Pin>,
    capacity: usize,
}

impl PinStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            pins: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the value of `name`, or 0 if it has never been set.
    ///
    /// A hit swaps the pin into position 0.
    pub fn get(&mut self, name: &str) -> i32 {
        match self.position(name) {
            Some(index) => {
                let value = self.pins[index].value;
                self.pins.swap(0, index);
                value
            }
            None => 0,
        }
    }

    /// Sets `name` to `value`.
    ///
    /// An existing pin is updated where it stands. A new pin takes position 0
    /// and the previous front pin moves to the end of the list.
    pub fn set(&mut self, name: &str, value: i32) -> Result<(), HarnessError> {
        if let Some(index) = self.position(name) {
            self.pins[index].value = value;
            return Ok(());
        }
        if self.pins.len() >= self.capacity {
            return Err(HarnessError::PinStoreFull {
                name: name.to_string(),
                capacity: self.capacity,
            });
        }
        let pin = Pin {
            name: name.to_string(),
            value,
        };
        match self.pins.first_mut() {
            Some(front) => {
                let demoted = std::mem::replace(front, pin);
                self.pins.push(demoted);
            }
            None => self.pins.push(pin),
        }
        Ok(())
    }

    /// Pin names in lookup order, front first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pins.iter().map(|pin| pin.name.as_str())
    }

    /// Renders every pin sorted by name, one per line, preceded by a blank
    /// line. Values outside `0..=9` are also shown in hex.
    ///
    /// The sort works on a copy; lookup order is left alone.
    pub fn dump(&self) -> String {
        let mut sorted: Vec<&Pin> = self.pins.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = String::from("\n");
        for pin in sorted {
            let _ = write!(
                out,
                "{:<width$}: {}",
                pin.name,
                pin.value,
                width = DUMP_NAME_WIDTH
            );
            if !(0..10).contains(&pin.value) {
                let _ = write!(out, " (0x{:04X})", pin.value);
            }
            out.push('\n');
        }
        out
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.pins.iter().position(|pin| pin.name == name)
    }
}

impl Default for PinStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PIN_CAPACITY)
    }
}
