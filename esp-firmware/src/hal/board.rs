// ESP32-C6 Board: bindet die esp-core Traits an echte Peripherie
//
// UART1 zum Host, GPIO für Aktoren, Kartenleser und Eingänge,
// TIMG1-Watchdog. Der Tick wird aus esp_hal::time abgeleitet.

use defmt::warn;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, Level, Output};
use esp_hal::peripherals::TIMG1;
use esp_hal::time::{Duration, Instant};
use esp_hal::timer::timg::Wdt;
use esp_hal::uart::{RxError, Uart};

use esp_core::{
    ActuatorOutputs, CardLines, InputPins, SerialError, SerialPort, TickSource, Watchdog,
};

use crate::config::{CARD_POLL_INTERVAL_US, CARD_SETTLE_US, TICK_PERIOD_US};

/// Bereits konfigurierte GPIO-Treiber für das Board
pub struct BoardPins<'d> {
    pub strike: Output<'d>,
    pub green_led: Output<'d>,
    pub beeper: Output<'d>,
    pub card_clock: Input<'d>,
    pub card_data: Input<'d>,
    pub inputs: [Input<'d>; 5],
}

/// Real Hardware Board
///
/// Implementiert alle Traits aus `esp_core::traits`, damit
/// `Controller::step()` direkt auf der Hardware läuft.
pub struct EspBoard<'d> {
    uart: Uart<'d, Blocking>,
    pins: BoardPins<'d>,
    watchdog: Wdt<TIMG1<'d>>,
    delay: Delay,
    next_tick: Instant,
}

impl<'d> EspBoard<'d> {
    /// Erstellt das Board
    ///
    /// # Parameter
    /// - `uart`: UART zum Host (9600 8N1, RX/TX bereits zugeordnet)
    /// - `pins`: konfigurierte GPIO-Treiber
    /// - `watchdog`: aktivierter TIMG1-Watchdog
    pub fn new(uart: Uart<'d, Blocking>, pins: BoardPins<'d>, watchdog: Wdt<TIMG1<'d>>) -> Self {
        Self {
            uart,
            pins,
            watchdog,
            delay: Delay::new(),
            next_tick: Instant::now() + Duration::from_micros(TICK_PERIOD_US),
        }
    }
}

impl SerialPort for EspBoard<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        if !self.uart.read_ready() {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(RxError::FifoOverflowed) => Err(SerialError::Overrun),
            // Frame-/Paritätsfehler: Byte verwerfen, der Parser
            // synchronisiert sich am nächsten Zeilenende
            Err(_) => Ok(None),
        }
    }

    fn restart_receiver(&mut self) {
        // FIFO leeren, verlorene Bytes sind ohnehin nicht rekonstruierbar
        let mut scratch = [0u8; 16];
        while self.uart.read_ready() {
            if self.uart.read(&mut scratch).is_err() {
                break;
            }
        }
    }

    fn is_tx_idle(&mut self) -> bool {
        self.uart.write_ready()
    }

    fn write_byte(&mut self, byte: u8) {
        if self.uart.write(&[byte]).is_err() {
            warn!("UART: TX byte dropped");
        }
    }
}

impl ActuatorOutputs for EspBoard<'_> {
    fn set_strike(&mut self, on: bool) {
        self.pins
            .strike
            .set_level(if on { Level::High } else { Level::Low });
    }

    // LED und Summer sind low-aktiv
    fn set_green_led(&mut self, on: bool) {
        self.pins
            .green_led
            .set_level(if on { Level::Low } else { Level::High });
    }

    fn set_beeper(&mut self, on: bool) {
        self.pins
            .beeper
            .set_level(if on { Level::Low } else { Level::High });
    }
}

impl CardLines for EspBoard<'_> {
    fn clock_is_high(&mut self) -> bool {
        self.pins.card_clock.is_high()
    }

    fn data_is_high(&mut self) -> bool {
        self.pins.card_data.is_high()
    }

    fn settle(&mut self) {
        self.delay.delay_micros(CARD_SETTLE_US);
    }

    fn poll_delay(&mut self) {
        self.delay.delay_micros(CARD_POLL_INTERVAL_US);
    }
}

impl InputPins for EspBoard<'_> {
    fn read_inputs(&mut self) -> u8 {
        self.pins
            .inputs
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_high())
            .fold(0u8, |acc, (bit, _)| acc | (1 << bit))
    }
}

impl TickSource for EspBoard<'_> {
    fn poll_tick(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next_tick {
            return false;
        }
        // Reload ab jetzt: verpasste Ticks (z.B. beim Kartenlesen) werden
        // nicht nachgeholt
        self.next_tick = now + Duration::from_micros(TICK_PERIOD_US);
        true
    }
}

impl Watchdog for EspBoard<'_> {
    fn feed(&mut self) {
        self.watchdog.feed();
    }
}
