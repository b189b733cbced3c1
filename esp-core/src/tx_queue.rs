//! Sende-Ringpuffer zwischen Protokoll-Logik und UART-Sender
//!
//! Schreib- und Lesezeiger laufen modulo `N`. Gleichheit bedeutet leer.
//! Es gibt keine Überlaufprüfung: wer schneller schreibt als gesendet
//! wird, überschreibt noch nicht gesendete Bytes. Die Eingangs-Reports
//! werden deshalb nur bei leerer Queue erzeugt.

use crate::traits::SerialPort;

/// Kapazität der Sende-Queue in Bytes
pub const TX_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct TxQueue<const N: usize = TX_QUEUE_CAPACITY> {
    buf: [u8; N],
    write: usize,
    read: usize,
}

impl<const N: usize> Default for TxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TxQueue<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            write: 0,
            read: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Anzahl wartender Bytes (nach einem Überlauf nicht mehr aussagekräftig)
    pub fn len(&self) -> usize {
        (self.write + N - self.read) % N
    }

    /// Hängt ein Byte an, ohne Überlaufprüfung
    pub fn push(&mut self, byte: u8) {
        self.write = (self.write + 1) % N;
        self.buf[self.write] = byte;
    }

    pub fn extend<I: IntoIterator<Item = u8>>(&mut self, bytes: I) {
        for byte in bytes {
            self.push(byte);
        }
    }

    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        self.read = (self.read + 1) % N;
        Some(self.buf[self.read])
    }

    /// Gibt höchstens ein Byte an den Sender, wenn dieser frei ist
    ///
    /// Gibt `true` zurück wenn ein Byte gesendet wurde.
    pub fn service<S: SerialPort + ?Sized>(&mut self, port: &mut S) -> bool {
        if self.is_empty() || !port.is_tx_idle() {
            return false;
        }
        match self.pop() {
            Some(byte) => {
                port.write_byte(byte);
                true
            }
            None => false,
        }
    }
}
