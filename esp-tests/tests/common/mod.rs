//! Mock-Board für die Host-Tests
//!
//! Implementiert alle Traits aus `esp_core::traits` in-memory. UART-Empfang
//! kommt aus einer Queue, gesendete Bytes landen in `tx`. Der Kartenleser
//! wird über [`MockCard`] simuliert.

#![allow(dead_code)]

use std::collections::VecDeque;

use esp_core::{
    ActuatorOutputs, CardLines, Controller, InputPins, LoopEvents, SerialError, SerialPort,
    TickSource, Watchdog,
};

/// Obergrenze für Schleifen in den Hilfsfunktionen
const MAX_STEPS: usize = 10_000;

/// Simulierter Proximity-Leser
///
/// Jeder Aufruf von `clock_is_high()` schaltet den Takt weiter: bei high
/// wird das nächste Bit angelegt und der Takt geht auf low, bei low geht
/// er wieder auf high. Sind alle Bits verbraucht, gibt die Karte die
/// Datenleitung frei und der Takt bleibt high.
#[derive(Debug, Default)]
pub struct MockCard {
    bits: Vec<bool>,
    next: usize,
    clock_low: bool,
    data_low: bool,
    /// Takt hängt auf diesem Pegel, Datenleitung bleibt low
    stuck_clock: Option<bool>,
}

impl MockCard {
    /// Karte mit diesen 5-Bit-Wörtern (LSB zuerst) auflegen
    pub fn present(&mut self, words: &[u8]) {
        self.bits = words
            .iter()
            .flat_map(|w| (0..5).map(move |bit| w & (1 << bit) != 0))
            .collect();
        self.next = 0;
        self.clock_low = false;
        self.data_low = true;
        self.stuck_clock = None;
    }

    /// Karte, deren Takt nie kommt (Takt bleibt high)
    pub fn jam(&mut self) {
        self.jam_at(true);
    }

    /// Takt fällt einmal und kommt nie wieder hoch
    pub fn jam_low(&mut self) {
        self.jam_at(false);
    }

    fn jam_at(&mut self, clock_high: bool) {
        self.bits.clear();
        self.clock_low = !clock_high;
        self.data_low = true;
        self.stuck_clock = Some(clock_high);
    }

    pub fn remove(&mut self) {
        *self = Self::default();
    }

    pub fn bits_left(&self) -> usize {
        self.bits.len() - self.next
    }
}

#[derive(Debug, Default)]
pub struct MockBoard {
    pub rx: VecDeque<Result<u8, SerialError>>,
    pub tx: Vec<u8>,
    /// Sender nimmt nichts an, solange gesetzt
    pub tx_busy: bool,
    pub receiver_restarts: usize,

    pub strike: bool,
    pub green_led: bool,
    pub beeper: bool,

    pub card: MockCard,
    pub inputs: u8,
    pub tick_pending: bool,
    pub feeds: usize,
    pub card_poll_delays: usize,
}

impl MockBoard {
    pub fn new(inputs: u8) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied().map(Ok));
    }

    /// Alle gesendeten Bytes abholen
    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }

    /// Gesendete Bytes als Zeilen (ohne `\n`)
    pub fn take_lines(&mut self) -> Vec<Vec<u8>> {
        let tx = self.take_tx();
        tx.split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(<[u8]>::to_vec)
            .collect()
    }
}

impl SerialPort for MockBoard {
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        self.rx.pop_front().transpose()
    }

    fn restart_receiver(&mut self) {
        self.receiver_restarts += 1;
    }

    fn is_tx_idle(&mut self) -> bool {
        !self.tx_busy
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx.push(byte);
    }
}

impl ActuatorOutputs for MockBoard {
    fn set_strike(&mut self, on: bool) {
        self.strike = on;
    }

    fn set_green_led(&mut self, on: bool) {
        self.green_led = on;
    }

    fn set_beeper(&mut self, on: bool) {
        self.beeper = on;
    }
}

impl CardLines for MockBoard {
    fn clock_is_high(&mut self) -> bool {
        let card = &mut self.card;
        if let Some(level) = card.stuck_clock {
            return level;
        }
        if card.clock_low {
            card.clock_low = false;
            return false;
        }
        match card.bits.get(card.next) {
            Some(&bit) => {
                card.data_low = bit;
                card.next += 1;
                card.clock_low = true;
            }
            None => card.data_low = false,
        }
        true
    }

    fn data_is_high(&mut self) -> bool {
        !self.card.data_low
    }

    fn settle(&mut self) {}

    fn poll_delay(&mut self) {
        self.card_poll_delays += 1;
    }
}

impl InputPins for MockBoard {
    fn read_inputs(&mut self) -> u8 {
        self.inputs
    }
}

impl TickSource for MockBoard {
    fn poll_tick(&mut self) -> bool {
        std::mem::take(&mut self.tick_pending)
    }
}

impl Watchdog for MockBoard {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}

/// `n` Loop-Durchläufe
pub fn run(controller: &mut Controller, board: &mut MockBoard, n: usize) -> Vec<LoopEvents> {
    (0..n).map(|_| controller.step(board)).collect()
}

/// Läuft, bis Empfang, Sende-Queue und Dirty-Flag abgearbeitet sind
pub fn settle(controller: &mut Controller, board: &mut MockBoard) -> Vec<LoopEvents> {
    let mut events = Vec::new();
    for _ in 0..MAX_STEPS {
        let idle = board.rx.is_empty()
            && controller.tx_queue().is_empty()
            && !controller.debouncer().is_dirty();
        if idle {
            return events;
        }
        events.push(controller.step(board));
    }
    panic!("controller did not settle within {MAX_STEPS} steps");
}

/// Ein Tick plus der zugehörige Loop-Durchlauf
pub fn tick(controller: &mut Controller, board: &mut MockBoard) -> LoopEvents {
    board.tick_pending = true;
    controller.step(board)
}

/// 5-Bit-Wort mit ungerader Parität (Bit 4)
pub fn with_parity(digit: u8) -> u8 {
    let d = digit & 0x0F;
    if d.count_ones() % 2 == 0 { d | 0x10 } else { d }
}

/// Wortfolge einer 26-Bit-HID-Karte, wie sie der Leser taktet
/// (inkl. abschließendem Null-Wort, ohne Markierungsbit)
pub fn hid_card_words(facility: u32, card_number: u32) -> Vec<u8> {
    let raw = (facility << 17) | (card_number << 1);
    let mut words = vec![with_parity(0), with_parity(0x0B)];
    words.extend(std::iter::repeat_n(with_parity(0), 7));
    words.extend((0..9).map(|i| with_parity(((raw >> (3 * (8 - i))) & 0x07) as u8)));
    words.push(with_parity(0x0F));
    words.push(with_parity(0x05));
    words.push(0);
    words
}
