// Control-Loop Task - der einzige Task der Firmware
use defmt::{debug, info, warn};
use embassy_futures::yield_now;

use esp_core::{Board, Command, Controller, ControllerConfig, HidCard, LoopEvents};

use crate::config::CARD_BIT_TIMEOUT_POLLS;
use crate::hal::EspBoard;

/// Control-Loop Logic - generisch über das Board
///
/// Führt `Controller::step()` endlos aus. Zwischen zwei Durchläufen gibt der
/// Task die CPU kurz an den Executor zurück; es gibt keine anderen Tasks,
/// der Loop läuft also praktisch ununterbrochen.
///
/// Die Logik selbst steckt in `esp_core::Controller` und wird dort bzw. in
/// esp-tests gegen ein Mock-Board getestet.
pub async fn control_loop_logic<B: Board>(mut board: B) -> ! {
    let config = ControllerConfig {
        card_bit_timeout: CARD_BIT_TIMEOUT_POLLS,
    };
    let initial_inputs = board.read_inputs();
    let mut controller = Controller::new(config, initial_inputs);
    controller.boot();
    info!("Controller started, inputs = {=u8:#b}", initial_inputs);

    loop {
        let events = controller.step(&mut board);
        log_events(&events);
        yield_now().await;
    }
}

/// Loggt, was in einem Loop-Durchlauf passiert ist
fn log_events(events: &LoopEvents) {
    match &events.command {
        Some(Ok(Command::Status)) => debug!("Status requested"),
        Some(Ok(command)) => info!("Command: {}", command),
        // Wird nicht an den Host gemeldet
        Some(Err(err)) => debug!("Frame ignored: {}", err),
        None => {}
    }

    if let Some(err) = events.serial_error {
        warn!("UART: {}, receiver restarted", err);
    }

    match &events.card {
        Some(Ok(data)) => {
            info!("Card read: {} words", data.len());
            match HidCard::from_words(data.words()) {
                Ok(card) => info!("HID card {}", card),
                Err(err) => debug!("Not a 26-bit HID card: {}", err),
            }
        }
        Some(Err(err)) => warn!("Card read aborted: {}", err),
        None => {}
    }

    if let Some(state) = events.inputs_changed {
        info!("Inputs changed: {=u8:#b}", state);
    }
}

/// Control-Loop Task - Embassy Task
///
/// # Parameter
/// - `board`: fertig initialisiertes ESP32-C6 Board
#[embassy_executor::task]
pub async fn control_loop_task(board: EspBoard<'static>) {
    control_loop_logic(board).await
}
