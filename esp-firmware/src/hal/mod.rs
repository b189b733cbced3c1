// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul bindet die Traits aus esp-core an die ESP32-C6 Peripherie.
// Die Logik selbst bleibt in esp-core und wird dort gegen Mocks getestet.

pub mod board;

pub use board::{BoardPins, EspBoard};
