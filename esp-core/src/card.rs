//! Proximity-Kartenleser: bit-weises Einlesen über Takt/Daten
//!
//! Solange die Datenleitung low ist, liegt eine Karte an. Jedes Bit wird
//! auf der fallenden Taktflanke gelesen (LSB zuerst, invertiert), je fünf
//! Bits ergeben ein Wort (`dddd` + Paritätsbit `p`). Ein Null-Wort beendet
//! die Übertragung. Jede Flanke hat ein Timeout in Poll-Durchläufen; bei
//! Timeout wird der komplette Lesevorgang verworfen.

use heapless::Vec;

use crate::traits::{CardLines, Watchdog};
use crate::types::REPORT_MARKER;

/// Maximale Anzahl Wörter pro Lesevorgang
pub const MAX_CARD_WORDS: usize = 63;

/// Bits pro Wort (4 Daten + 1 Parität)
pub const WORD_BITS: u8 = 5;

/// Standard-Timeout pro Flanke in Poll-Durchläufen
pub const DEFAULT_BIT_TIMEOUT: u32 = 65_535;

const WORD_MASK: u8 = 0x1F;
const START_SENTINEL: u8 = 0x0B;
const END_SENTINEL: u8 = 0x0F;
const HID_DATA_WORDS: usize = 16;
// führende Nullen + Start-Sentinel
const HID_SKIP_WORDS: usize = 8;

/// Flanke, auf die beim Timeout gewartet wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockEdge {
    Falling,
    Rising,
}

/// Fehler beim Einlesen einer Karte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardReadError {
    Timeout { word: u8, bit: u8, edge: ClockEdge },
}

/// Gelesene Kartendaten (Wörter inkl. Markierungsbit `0x20`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardData {
    words: Vec<u8, MAX_CARD_WORDS>,
}

impl CardData {
    pub fn words(&self) -> &[u8] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Frame-Bytes: `H<word>...<word>\n`
    pub fn frame_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        core::iter::once(b'H')
            .chain(self.words.iter().copied())
            .chain(core::iter::once(b'\n'))
    }
}

/// Liest Karten mit festem Flanken-Timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardReader {
    bit_timeout: u32,
}

impl Default for CardReader {
    fn default() -> Self {
        Self::new(DEFAULT_BIT_TIMEOUT)
    }
}

impl CardReader {
    /// `bit_timeout`: maximale Poll-Durchläufe pro Flanke (mindestens 1)
    pub fn new(bit_timeout: u32) -> Self {
        Self {
            bit_timeout: bit_timeout.max(1),
        }
    }

    pub fn bit_timeout(&self) -> u32 {
        self.bit_timeout
    }

    /// Liest eine komplette Karte (blockiert bis Ende oder Timeout)
    pub fn read<L>(&self, lines: &mut L) -> Result<CardData, CardReadError>
    where
        L: CardLines + Watchdog + ?Sized,
    {
        let mut data = CardData::default();

        for word in 0..MAX_CARD_WORDS as u8 {
            let mut value = 0u8;
            for bit in 0..WORD_BITS {
                let timeout = |edge| CardReadError::Timeout { word, bit, edge };

                self.wait_for_clock(lines, false)
                    .ok_or(timeout(ClockEdge::Falling))?;
                lines.settle();
                // Datenleitung ist invertiert
                if !lines.data_is_high() {
                    value |= 1 << bit;
                }
                self.wait_for_clock(lines, true)
                    .ok_or(timeout(ClockEdge::Rising))?;
                lines.settle();
            }

            if value == 0 {
                break;
            }
            if data.words.push(value | REPORT_MARKER).is_err() {
                break;
            }
        }

        Ok(data)
    }

    /// Wartet bis der Takt den gewünschten Pegel hat
    fn wait_for_clock<L>(&self, lines: &mut L, high: bool) -> Option<()>
    where
        L: CardLines + Watchdog + ?Sized,
    {
        let mut remaining = self.bit_timeout;
        while lines.clock_is_high() != high {
            lines.feed();
            lines.poll_delay();
            remaining -= 1;
            if remaining == 0 {
                return None;
            }
        }
        Some(())
    }
}

/// Fehler beim Dekodieren der Kartendaten in eine HID-Kartennummer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardFormatError {
    MissingSentinel,
    /// Anzahl Datenwörter zwischen den Sentinels (erwartet 16)
    WrongLength(usize),
    /// Index des Wortes mit falscher Parität
    ParityMismatch(usize),
}

/// HID-Karte im 26-Bit-Format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HidCard {
    pub facility: u32,
    pub card_number: u32,
}

impl HidCard {
    /// Dekodiert die Wörter eines `H`-Frames
    ///
    /// Sucht das letzte Start- (`0xB`) und End-Sentinel (`0xF`), prüft die
    /// ungerade Parität aller Wörter dazwischen und packt die letzten neun
    /// Ziffern zu je 3 Bit.
    pub fn from_words(words: &[u8]) -> Result<Self, CardFormatError> {
        let start = words
            .iter()
            .rposition(|w| w & 0x0F == START_SENTINEL)
            .ok_or(CardFormatError::MissingSentinel)?;
        let end = words
            .iter()
            .rposition(|w| w & 0x0F == END_SENTINEL)
            .ok_or(CardFormatError::MissingSentinel)?;
        if end < start {
            return Err(CardFormatError::MissingSentinel);
        }

        let digits = end - start - 1;
        if digits != HID_DATA_WORDS {
            return Err(CardFormatError::WrongLength(digits));
        }

        if let Some(index) =
            (start..=end).find(|&i| (words[i] & WORD_MASK).count_ones() % 2 == 0)
        {
            return Err(CardFormatError::ParityMismatch(index));
        }

        let raw = words[start + HID_SKIP_WORDS..end]
            .iter()
            .fold(0u32, |acc, w| (acc << 3) | u32::from(w & 0x0F));

        Ok(Self {
            facility: (raw & 0x01FE_0000) >> 17,
            card_number: (raw & 0x0001_FFFE) >> 1,
        })
    }
}

impl core::fmt::Display for HidCard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.facility, self.card_number)
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for CardData {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "CardData {{ words: {=[u8]:#x} }}", self.words.as_slice())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HidCard {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}-{}", self.facility, self.card_number)
    }
}
