//! Entprellung der Allzweck-Eingänge
//!
//! Jeder Eingang hat einen sättigenden Zähler (0..=7). Weicht der Rohwert
//! vom entprellten Wert ab, zählt der Zähler hoch; stimmt er überein, wird
//! der Zähler auf 0 gesetzt. Erreicht der Zähler [`SETTLE_SAMPLES`], wird
//! der Rohwert übernommen und das Dirty-Flag gesetzt.

use crate::types::{INPUT_MASK, InputReport};

/// Anzahl überwachter Eingänge
pub const INPUT_COUNT: usize = 5;

/// Aufeinanderfolgende abweichende Samples bis zur Übernahme
pub const SETTLE_SAMPLES: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    counters: [u8; INPUT_COUNT],
    debounced: u8,
    dirty: bool,
}

impl Debouncer {
    /// Startet mit dem aktuellen Rohwert als entprelltem Zustand.
    /// Dirty ist gesetzt, damit der Anfangszustand gemeldet wird.
    pub fn new(initial: u8) -> Self {
        Self {
            counters: [0; INPUT_COUNT],
            debounced: initial & INPUT_MASK,
            dirty: true,
        }
    }

    pub fn state(&self) -> u8 {
        self.debounced
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Verarbeitet ein Sample aller Eingänge
    ///
    /// Gibt `true` zurück, wenn sich der entprellte Zustand geändert hat.
    pub fn sample(&mut self, raw: u8) -> bool {
        let changes = (raw ^ self.debounced) & INPUT_MASK;
        let mut settled = 0u8;

        for (pin, counter) in self.counters.iter_mut().enumerate() {
            let bit = 1 << pin;
            if changes & bit == 0 {
                *counter = 0;
                continue;
            }
            *counter = (*counter + 1).min(SETTLE_SAMPLES);
            if *counter == SETTLE_SAMPLES {
                settled |= bit;
                *counter = 0;
            }
        }

        if settled != 0 {
            self.debounced ^= settled;
            self.dirty = true;
        }
        settled != 0
    }

    /// Erzeugt den Report und löscht das Dirty-Flag
    pub fn take_report(&mut self) -> InputReport {
        self.dirty = false;
        InputReport::new(self.debounced)
    }
}
