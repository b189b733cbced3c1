//! Empfangs-Zustandsautomat für Host-Kommandos
//!
//! Ein Frame besteht aus Kommando-Byte, Parameter-Byte und Zeilenende.
//! Steuerzeichen (< 0x21) setzen den Automaten zurück, ein falsches
//! drittes Byte verwirft den Frame. Ein verstümmelter Frame kann den
//! Parser daher höchstens ein Kommando lang aus dem Takt bringen.

use crate::types::{Command, ProtocolError};

/// Bytes unterhalb dieser Grenze gelten als Frame-Trenner
const PRINTABLE_THRESHOLD: u8 = 0x21;

/// Zustand des Empfängers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    #[default]
    AwaitingCommand,
    AwaitingParameter {
        command: u8,
    },
    AwaitingTerminator {
        command: u8,
        parameter: u8,
    },
}

/// Byte-weiser Kommando-Parser
#[derive(Debug, Clone, Default)]
pub struct CommandReceiver {
    state: RxState,
}

impl CommandReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    /// Verarbeitet ein empfangenes Byte
    ///
    /// Liefert `Some` genau dann, wenn ein kompletter Frame abgeschlossen
    /// wurde: `Ok` mit dem Kommando oder `Err` wenn der Frame ungültig war.
    /// Ungültige Frames werden vom Aufrufer stillschweigend verworfen.
    pub fn push(&mut self, byte: u8) -> Option<Result<Command, ProtocolError>> {
        if let RxState::AwaitingTerminator { command, parameter } = self.state {
            self.state = RxState::AwaitingCommand;
            return Some(if byte == b'\n' || byte == b'\r' {
                Command::try_from([command, parameter])
            } else {
                Err(ProtocolError::UnterminatedFrame)
            });
        }

        if byte < PRINTABLE_THRESHOLD {
            self.state = RxState::AwaitingCommand;
            return None;
        }

        self.state = match self.state {
            RxState::AwaitingCommand => RxState::AwaitingParameter { command: byte },
            RxState::AwaitingParameter { command } => RxState::AwaitingTerminator {
                command,
                parameter: byte,
            },
            // oben bereits behandelt
            RxState::AwaitingTerminator { .. } => RxState::AwaitingCommand,
        };
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Actuator, TimerSetting};

    fn feed(rx: &mut CommandReceiver, bytes: &[u8]) -> Option<Result<Command, ProtocolError>> {
        let mut last = None;
        for &b in bytes {
            if let Some(result) = rx.push(b) {
                last = Some(result);
            }
        }
        last
    }

    #[test]
    fn test_complete_frame() {
        let mut rx = CommandReceiver::new();
        assert_eq!(
            feed(&mut rx, b"B5\n"),
            Some(Ok(Command::Set {
                actuator: Actuator::Beeper,
                setting: TimerSetting::Seconds(5)
            }))
        );
        assert_eq!(rx.state(), RxState::AwaitingCommand);
    }

    #[test]
    fn test_carriage_return_terminates() {
        let mut rx = CommandReceiver::new();
        assert_eq!(feed(&mut rx, b"??\r"), Some(Ok(Command::Status)));
    }

    #[test]
    fn test_states_progress() {
        let mut rx = CommandReceiver::new();
        rx.push(b'S');
        assert_eq!(rx.state(), RxState::AwaitingParameter { command: b'S' });
        rx.push(b'1');
        assert_eq!(
            rx.state(),
            RxState::AwaitingTerminator {
                command: b'S',
                parameter: b'1'
            }
        );
    }

    #[test]
    fn test_control_byte_resets() {
        let mut rx = CommandReceiver::new();
        rx.push(b'S');
        assert_eq!(rx.push(b' '), None);
        assert_eq!(rx.state(), RxState::AwaitingCommand);

        // Newline vor dem Parameter: kein Kommando
        assert_eq!(feed(&mut rx, b"S\nG1\n").map(|r| r.is_ok()), Some(true));
    }

    #[test]
    fn test_missing_terminator_drops_frame_and_byte() {
        let mut rx = CommandReceiver::new();
        assert_eq!(
            feed(&mut rx, b"S1X"),
            Some(Err(ProtocolError::UnterminatedFrame))
        );
        assert_eq!(rx.state(), RxState::AwaitingCommand);
        // Nächstes Kommando wird wieder sauber erkannt
        assert_eq!(feed(&mut rx, b"G0\n").map(|r| r.is_ok()), Some(true));
    }

    #[test]
    fn test_unknown_command_is_reported_once() {
        let mut rx = CommandReceiver::new();
        assert_eq!(
            feed(&mut rx, b"Z1\n"),
            Some(Err(ProtocolError::UnknownCommand(b'Z')))
        );
    }
}
