//! Core Types für die Türsteuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies: Kommandos vom Host,
//! Status- und Eingangs-Reports an den Host.

/// Ticks pro Sekunde (Timer-Auflösung der Aktor-Timeouts)
pub const TICKS_PER_SECOND: u8 = 16;

/// Timer-Wert für "dauerhaft an" (wird nie heruntergezählt)
pub const LATCHED: u8 = 0xFF;

/// Maske der fünf Allzweck-Eingänge
pub const INPUT_MASK: u8 = 0x1F;

/// Feste obere Bits in Report-Bytes (`B'001x xxxx'`)
pub const REPORT_MARKER: u8 = 0x20;

/// Die drei zeitgesteuerten Aktoren
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Actuator {
    Beeper,
    GreenLed,
    Strike,
}

impl Actuator {
    /// Kommando-Buchstabe (Großschreibung) für diesen Aktor
    pub fn command_byte(self) -> u8 {
        match self {
            Actuator::Beeper => b'B',
            Actuator::GreenLed => b'G',
            Actuator::Strike => b'S',
        }
    }
}

/// Parameter eines Aktor-Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerSetting {
    /// 0-9 Sekunden, 0 = aus (größere Werte werden auf 9 begrenzt)
    Seconds(u8),
    /// Dauerhaft an bis zum nächsten `0`-Kommando
    Latched,
}

impl TimerSetting {
    /// Rohwert für den Countdown-Timer
    pub fn timer_value(self) -> u8 {
        match self {
            TimerSetting::Seconds(secs) => secs.min(9) * TICKS_PER_SECOND,
            TimerSetting::Latched => LATCHED,
        }
    }

    fn parameter_byte(self) -> u8 {
        match self {
            TimerSetting::Seconds(secs) => b'0' + secs.min(9),
            TimerSetting::Latched => b'L',
        }
    }
}

/// Fehler beim Dekodieren eines Host-Kommandos
///
/// Wird nie an den Host gemeldet, nur geloggt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    UnknownCommand(u8),
    InvalidParameter(u8),
    /// Drittes Byte war kein Zeilenende
    UnterminatedFrame,
}

/// Kommando vom Host (`<cmd><param>\n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Aktor für eine Zeit einschalten, dauerhaft einschalten oder ausschalten
    Set {
        actuator: Actuator,
        setting: TimerSetting,
    },
    /// Status-Abfrage `?`
    Status,
}

impl Command {
    /// Bytes, die ein Host für dieses Kommando sendet
    ///
    /// ```
    /// # use esp_core::{Actuator, Command, TimerSetting};
    /// let cmd = Command::Set { actuator: Actuator::Strike, setting: TimerSetting::Latched };
    /// assert_eq!(&cmd.encode(), b"SL\n");
    /// assert_eq!(&Command::Status.encode(), b"??\n");
    /// ```
    pub fn encode(&self) -> [u8; 3] {
        match self {
            Command::Set { actuator, setting } => {
                [actuator.command_byte(), setting.parameter_byte(), b'\n']
            }
            Command::Status => [b'?', b'?', b'\n'],
        }
    }
}

impl core::convert::TryFrom<[u8; 2]> for Command {
    type Error = ProtocolError;

    /// Dekodiert Kommando-Byte und Parameter-Byte
    fn try_from([command, parameter]: [u8; 2]) -> Result<Self, Self::Error> {
        let actuator = match command {
            b'?' => return Ok(Command::Status),
            b'b' | b'B' => Actuator::Beeper,
            b'g' | b'G' => Actuator::GreenLed,
            b's' | b'S' => Actuator::Strike,
            other => return Err(ProtocolError::UnknownCommand(other)),
        };

        let setting = match parameter {
            b'L' | b'l' => TimerSetting::Latched,
            b'0'..=b'9' => TimerSetting::Seconds(parameter & 0x0f),
            other => return Err(ProtocolError::InvalidParameter(other)),
        };

        Ok(Command::Set { actuator, setting })
    }
}

/// Aktiv-Status der drei Aktoren (Antwort auf `?`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorStatus {
    pub beeper: bool,
    pub green_led: bool,
    pub strike: bool,
}

impl ActuatorStatus {
    /// `?ABC\n` mit A/B/C ∈ {'0', '1'}
    pub fn encode(&self) -> [u8; 5] {
        let digit = |on: bool| if on { b'1' } else { b'0' };
        [
            b'?',
            digit(self.beeper),
            digit(self.green_led),
            digit(self.strike),
            b'\n',
        ]
    }
}

/// Entprellter Zustand der Allzweck-Eingänge (Bit 0..4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputReport {
    pub state: u8,
}

impl InputReport {
    pub fn new(state: u8) -> Self {
        Self {
            state: state & INPUT_MASK,
        }
    }

    /// `i<state><~state>\n`, beide Bytes mit fester Markierung `001` oben
    pub fn encode(&self) -> [u8; 4] {
        let byte = (self.state & INPUT_MASK) | REPORT_MARKER;
        [b'i', byte, byte ^ INPUT_MASK, b'\n']
    }

    /// `true` wenn Eingang `index` (0..4) high ist
    pub fn is_high(&self, index: u8) -> bool {
        index < 5 && self.state & (1 << index) != 0
    }
}
