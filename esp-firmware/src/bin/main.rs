// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::time::Duration as HalDuration;
use esp_hal::timer::timg::{MwdtStage, TimerGroup};
use esp_hal::uart::{Config as UartConfig, Uart};

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_tuersteuerung::config::{UART_BAUDRATE, WATCHDOG_TIMEOUT_MS};
use esp_tuersteuerung::hal::{BoardPins, EspBoard};
use esp_tuersteuerung::tasks::control_loop_task;

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime und spawnt den
/// Control-Loop. Danach schläft main() - alle Arbeit läuft im Task.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Watchdog: setzt das Board zurück, wenn der Loop hängt
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let mut watchdog = timg1.wdt;
    watchdog.set_timeout(MwdtStage::Stage0, HalDuration::from_millis(WATCHDOG_TIMEOUT_MS));
    watchdog.enable();

    // UART zum Host: 9600 8N1
    let uart = Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(UART_BAUDRATE),
    )
    .expect("Failed to initialize UART")
    .with_rx(peripherals.GPIO17)
    .with_tx(peripherals.GPIO16);

    // Ausgänge: Türöffner zu, LED rot (high), Summer aus (high)
    let pins = BoardPins {
        strike: Output::new(peripherals.GPIO18, Level::Low, OutputConfig::default()),
        green_led: Output::new(peripherals.GPIO19, Level::High, OutputConfig::default()),
        beeper: Output::new(peripherals.GPIO20, Level::High, OutputConfig::default()),
        card_clock: Input::new(peripherals.GPIO3, InputConfig::default()),
        card_data: Input::new(peripherals.GPIO2, InputConfig::default()),
        // Eingänge mit Pull-Up (offene Kontakte lesen high)
        inputs: [
            Input::new(peripherals.GPIO4, InputConfig::default().with_pull(Pull::Up)),
            Input::new(peripherals.GPIO5, InputConfig::default().with_pull(Pull::Up)),
            Input::new(peripherals.GPIO6, InputConfig::default().with_pull(Pull::Up)),
            Input::new(peripherals.GPIO7, InputConfig::default().with_pull(Pull::Up)),
            Input::new(peripherals.GPIO10, InputConfig::default().with_pull(Pull::Up)),
        ],
    };

    let board = EspBoard::new(uart, pins, watchdog);
    info!("Board initialized, UART {} baud", UART_BAUDRATE);

    // Spawn Control-Loop Task
    spawner.spawn(control_loop_task(board)).unwrap();

    // Main-Loop: schläft (alle Arbeit läuft im Task)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
