//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung. Der Control-Loop ist generisch
//! über [`Board`] und läuft damit sowohl auf dem ESP32 als auch
//! gegen ein Mock-Board in den Host-Tests.
//!
//! # Implementierungen
//! - **Production:** `EspBoard` (esp-firmware, UART + GPIO + TIMG-Watchdog)
//! - **Testing:** `MockBoard` (esp-tests, in-memory Mock)

/// Fehler-Typ für den seriellen Empfänger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Empfangs-FIFO ist übergelaufen, Bytes gingen verloren
    Overrun,
}

/// Serielle Schnittstelle zum Host (9600 8N1)
pub trait SerialPort {
    /// Liest ein empfangenes Byte, falls eines bereitliegt (non-blocking)
    ///
    /// # Fehlerbehandlung
    /// Gibt `SerialError::Overrun` zurück wenn der Empfänger übergelaufen ist.
    /// Der Aufrufer muss danach [`SerialPort::restart_receiver`] aufrufen.
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError>;

    /// Setzt den Empfänger nach einem Overrun zurück
    fn restart_receiver(&mut self);

    /// `true` wenn der Sender ein weiteres Byte annehmen kann
    fn is_tx_idle(&mut self) -> bool;

    /// Übergibt genau ein Byte an den Sender
    fn write_byte(&mut self, byte: u8);
}

/// Ausgänge für Türöffner, grüne LED und Summer
///
/// `true` bedeutet "aktiv". Die Polarität (LED und Summer sind
/// low-aktiv) ist Sache der Implementierung.
pub trait ActuatorOutputs {
    fn set_strike(&mut self, on: bool);
    fn set_green_led(&mut self, on: bool);
    fn set_beeper(&mut self, on: bool);
}

/// Takt- und Datenleitung des Proximity-Kartenlesers
pub trait CardLines {
    fn clock_is_high(&mut self) -> bool;

    /// Low auf der Datenleitung signalisiert eine Karte bzw. ein 1-Bit
    fn data_is_high(&mut self) -> bool;

    /// Kurze Wartezeit nach einer Taktflanke (10 µs auf der Hardware)
    fn settle(&mut self);

    /// Pause zwischen zwei Abfragen beim Warten auf eine Flanke
    ///
    /// Zusammen mit dem Poll-Limit des `CardReader` ergibt das die
    /// Timeout-Zeit pro Flanke.
    fn poll_delay(&mut self) {}
}

/// Die fünf Allzweck-Eingänge (Rohwerte, Bit 0..4)
pub trait InputPins {
    fn read_inputs(&mut self) -> u8;
}

/// Periodischer Tick (16 Hz), wird einmal pro Loop-Durchlauf abgefragt
pub trait TickSource {
    /// `true` genau einmal pro abgelaufener Tick-Periode
    fn poll_tick(&mut self) -> bool;
}

/// Watchdog, muss in jedem Loop-Durchlauf und in jeder Warteschleife
/// gefüttert werden
pub trait Watchdog {
    fn feed(&mut self);
}

/// Komplettes Board: alles, was der Control-Loop braucht
pub trait Board: SerialPort + ActuatorOutputs + CardLines + InputPins + TickSource + Watchdog {}

impl<T> Board for T where
    T: SerialPort + ActuatorOutputs + CardLines + InputPins + TickSource + Watchdog
{
}
