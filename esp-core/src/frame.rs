//! Host-Seite: Dekodieren der Frames, die das Board sendet
//!
//! Eine Zeile (ohne abschließendes `\n`) ist genau ein Frame.

use crate::controller::BOOT_BANNER;
use crate::types::{ActuatorStatus, INPUT_MASK, InputReport, REPORT_MARKER};

/// Fehler beim Dekodieren eines Frames vom Board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    Empty,
    UnknownTag(u8),
    BadLength,
    BadStatusDigit(u8),
    /// Zweites Byte eines `i`-Reports ist nicht das Komplement des ersten
    ComplementMismatch,
}

/// Ein Frame vom Board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFrame<'a> {
    Banner,
    Status(ActuatorStatus),
    Inputs(InputReport),
    /// Kartenwörter (inkl. Markierungsbit)
    Card(&'a [u8]),
}

impl<'a> DeviceFrame<'a> {
    pub fn parse(line: &'a [u8]) -> Result<Self, FrameError> {
        let (&tag, payload) = line.split_first().ok_or(FrameError::Empty)?;

        match tag {
            b'?' => {
                let [beeper, green_led, strike] =
                    <[u8; 3]>::try_from(payload).map_err(|_| FrameError::BadLength)?;
                Ok(DeviceFrame::Status(ActuatorStatus {
                    beeper: status_digit(beeper)?,
                    green_led: status_digit(green_led)?,
                    strike: status_digit(strike)?,
                }))
            }
            b'i' => {
                let [state, complement] =
                    <[u8; 2]>::try_from(payload).map_err(|_| FrameError::BadLength)?;
                if state ^ complement != INPUT_MASK || state & !INPUT_MASK != REPORT_MARKER {
                    return Err(FrameError::ComplementMismatch);
                }
                Ok(DeviceFrame::Inputs(InputReport::new(state)))
            }
            b'H' => Ok(DeviceFrame::Card(payload)),
            _ if line == &BOOT_BANNER[..BOOT_BANNER.len() - 1] => Ok(DeviceFrame::Banner),
            other => Err(FrameError::UnknownTag(other)),
        }
    }
}

fn status_digit(byte: u8) -> Result<bool, FrameError> {
    match byte {
        b'0' => Ok(false),
        b'1' => Ok(true),
        other => Err(FrameError::BadStatusDigit(other)),
    }
}
