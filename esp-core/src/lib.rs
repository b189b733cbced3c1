//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie enthält den kompletten Control-Loop der Türsteuerung
//! (Kommando-Protokoll, Aktor-Timer, Entprellung, Kartenleser,
//! Sende-Queue) und die Traits, über die er auf Hardware zugreift.

#![no_std]

pub mod actuator;
pub mod card;
pub mod controller;
pub mod debounce;
pub mod frame;
pub mod protocol;
pub mod traits;
pub mod tx_queue;
pub mod types;

// Re-exports für einfachen Zugriff
pub use actuator::{ActuatorTimer, Actuators};
pub use card::{
    CardData, CardFormatError, CardReadError, CardReader, ClockEdge, HidCard, MAX_CARD_WORDS,
};
pub use controller::{BOOT_BANNER, Controller, ControllerConfig, LoopEvents};
pub use debounce::Debouncer;
pub use frame::{DeviceFrame, FrameError};
pub use protocol::{CommandReceiver, RxState};
pub use traits::{
    ActuatorOutputs, Board, CardLines, InputPins, SerialError, SerialPort, TickSource, Watchdog,
};
pub use tx_queue::{TX_QUEUE_CAPACITY, TxQueue};
pub use types::{
    Actuator, ActuatorStatus, Command, InputReport, ProtocolError, TICKS_PER_SECOND, TimerSetting,
};
