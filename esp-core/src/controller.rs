//! Control-Loop: ein Durchlauf pro Aufruf von [`Controller::step`]
//!
//! Reihenfolge pro Durchlauf (nicht ändern):
//! 1. UART-Empfang, ggf. Kommando ausführen; Overrun zurücksetzen
//! 2. Ausgänge nach Timer-Stand setzen
//! 3. Tick: Timer herunterzählen
//! 4. Kartenleser (blockiert, solange eine Karte taktet)
//! 5. Eingänge entprellen
//! 6. Eingangs-Report, falls geändert und Sende-Queue leer
//! 7. Ein Byte aus der Sende-Queue senden
//! 8. Watchdog füttern

use crate::actuator::Actuators;
use crate::card::{CardData, CardReadError, CardReader, DEFAULT_BIT_TIMEOUT};
use crate::debounce::Debouncer;
use crate::protocol::CommandReceiver;
use crate::traits::{Board, SerialError};
use crate::tx_queue::TxQueue;
use crate::types::{Command, INPUT_MASK, ProtocolError};

/// Begrüßung nach dem Einschalten
pub const BOOT_BANNER: &[u8] = b"Moo!\n";

/// Laufzeit-Konfiguration des Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Poll-Durchläufe pro Taktflanke, bevor ein Lesevorgang abbricht
    pub card_bit_timeout: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            card_bit_timeout: DEFAULT_BIT_TIMEOUT,
        }
    }
}

/// Was in einem Loop-Durchlauf passiert ist (nur für Logging/Tests)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoopEvents {
    /// Abgeschlossener Frame: ausgeführt oder verworfen
    pub command: Option<Result<Command, ProtocolError>>,
    pub serial_error: Option<SerialError>,
    pub ticked: bool,
    pub card: Option<Result<CardData, CardReadError>>,
    /// Neuer entprellter Zustand, falls er sich geändert hat
    pub inputs_changed: Option<u8>,
    pub input_report_queued: bool,
    pub byte_sent: bool,
}

/// Gesamter Gerätezustand, gehört dem Main-Loop
#[derive(Debug, Clone)]
pub struct Controller {
    receiver: CommandReceiver,
    actuators: Actuators,
    debouncer: Debouncer,
    tx: TxQueue,
    card_reader: CardReader,
}

impl Controller {
    /// `initial_inputs`: Rohwert der Eingänge beim Start
    pub fn new(config: ControllerConfig, initial_inputs: u8) -> Self {
        Self {
            receiver: CommandReceiver::new(),
            actuators: Actuators::new(),
            debouncer: Debouncer::new(initial_inputs & INPUT_MASK),
            tx: TxQueue::new(),
            card_reader: CardReader::new(config.card_bit_timeout),
        }
    }

    pub fn actuators(&self) -> &Actuators {
        &self.actuators
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn tx_queue(&self) -> &TxQueue {
        &self.tx
    }

    pub fn receiver(&self) -> &CommandReceiver {
        &self.receiver
    }

    /// Stellt die Begrüßung in die Sende-Queue
    pub fn boot(&mut self) {
        self.tx.extend(BOOT_BANNER.iter().copied());
    }

    /// Führt ein dekodiertes Kommando aus
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Set { actuator, setting } => self.actuators.set(actuator, setting),
            Command::Status => {
                self.tx.extend(self.actuators.status().encode());
                self.queue_input_report();
            }
        }
    }

    fn queue_input_report(&mut self) {
        let report = self.debouncer.take_report();
        self.tx.extend(report.encode());
    }

    /// Ein kompletter Loop-Durchlauf
    pub fn step<B: Board + ?Sized>(&mut self, board: &mut B) -> LoopEvents {
        let mut events = LoopEvents::default();

        match board.read_byte() {
            Ok(Some(byte)) => {
                if let Some(result) = self.receiver.push(byte) {
                    if let Ok(command) = result {
                        self.execute(command);
                    }
                    events.command = Some(result);
                }
            }
            Ok(None) => {}
            Err(err) => {
                board.restart_receiver();
                events.serial_error = Some(err);
            }
        }

        self.actuators.drive(board);

        if board.poll_tick() {
            self.actuators.tick();
            events.ticked = true;
        }

        if !board.data_is_high() {
            let result = self.card_reader.read(board);
            if let Ok(data) = &result {
                self.tx.extend(data.frame_bytes());
            }
            events.card = Some(result);
        }

        let raw = board.read_inputs() & INPUT_MASK;
        if self.debouncer.sample(raw) {
            events.inputs_changed = Some(self.debouncer.state());
        }

        if self.debouncer.is_dirty() && self.tx.is_empty() {
            self.queue_input_report();
            events.input_report_queued = true;
        }

        events.byte_sent = self.tx.service(board);
        board.feed();

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Actuator, TimerSetting};

    #[test]
    fn test_boot_queues_banner() {
        let mut controller = Controller::new(ControllerConfig::default(), 0);
        controller.boot();
        assert_eq!(controller.tx_queue().len(), BOOT_BANNER.len());
    }

    #[test]
    fn test_status_reports_and_clears_dirty() {
        let mut controller = Controller::new(ControllerConfig::default(), 0b00011);
        controller.execute(Command::Set {
            actuator: Actuator::Strike,
            setting: TimerSetting::Seconds(4),
        });
        controller.execute(Command::Status);

        assert!(!controller.debouncer().is_dirty());
        // ?001\n + i<s><~s>\n
        assert_eq!(controller.tx_queue().len(), 9);
        assert!(controller.actuators().timer(Actuator::Strike).is_active());
    }
}
