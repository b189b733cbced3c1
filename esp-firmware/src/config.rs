// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// UART Konfiguration (Host-Verbindung)
// ============================================================================

/// Baudrate der Host-Schnittstelle (8N1)
pub const UART_BAUDRATE: u32 = 9600;

/// GPIO-Pin für UART TX (zum Host)
pub const UART_TX_GPIO_PIN: u8 = 16;

/// GPIO-Pin für UART RX (vom Host)
pub const UART_RX_GPIO_PIN: u8 = 17;

// ============================================================================
// Aktor-Ausgänge
// ============================================================================

/// GPIO-Pin für den Türöffner (high-aktiv, treibt das Relais)
pub const STRIKE_GPIO_PIN: u8 = 18;

/// GPIO-Pin für die grüne LED im Leser
/// Low-aktiv: Leser zeigt rot, solange der Pin high ist
pub const GREEN_LED_GPIO_PIN: u8 = 19;

/// GPIO-Pin für den Summer im Leser (low-aktiv)
pub const BEEPER_GPIO_PIN: u8 = 20;

// ============================================================================
// Kartenleser
// ============================================================================

/// GPIO-Pin für die Datenleitung des Lesers
/// Low = Karte liegt an bzw. 1-Bit
pub const CARD_DATA_GPIO_PIN: u8 = 2;

/// GPIO-Pin für die Taktleitung des Lesers
pub const CARD_CLOCK_GPIO_PIN: u8 = 3;

/// Wartezeit nach jeder Taktflanke in Mikrosekunden
pub const CARD_SETTLE_US: u32 = 10;

/// Maximale Wartezeit auf eine Taktflanke in Mikrosekunden
/// Danach wird der komplette Lesevorgang verworfen
pub const CARD_EDGE_TIMEOUT_US: u32 = 100_000;

/// Pause zwischen zwei Abfragen der Taktleitung in Mikrosekunden
pub const CARD_POLL_INTERVAL_US: u32 = 2;

/// Poll-Durchläufe pro Taktflanke bis zum Abbruch des Lesevorgangs
/// Aus der Wartezeit abgeleitet, damit das Timeout nicht vom CPU-Takt abhängt
pub const CARD_BIT_TIMEOUT_POLLS: u32 = CARD_EDGE_TIMEOUT_US / CARD_POLL_INTERVAL_US;

// ============================================================================
// Allzweck-Eingänge
// ============================================================================

/// GPIO-Pins der fünf Eingänge (Bit 0..4 im Report), mit Pull-Up
pub const INPUT_GPIO_PINS: [u8; 5] = [4, 5, 6, 7, 10];

// ============================================================================
// Timing
// ============================================================================

/// Tick-Periode in Mikrosekunden (16 Hz)
pub const TICK_PERIOD_US: u64 = 1_000_000 / esp_core::TICKS_PER_SECOND as u64;

/// Watchdog-Timeout in Millisekunden
/// Muss länger sein als ein Loop-Durchlauf, ein Kartenlesevorgang füttert
/// den Watchdog selbst
pub const WATCHDOG_TIMEOUT_MS: u64 = 2300;
