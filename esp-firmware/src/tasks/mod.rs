// Task-Modul: Enthält den Embassy Task der Firmware
//
// Es gibt genau einen Task: den kooperativen Control-Loop. Alle
// Teilschritte laufen in fester Reihenfolge in Controller::step().

pub mod control_loop;

// Re-export Tasks für einfachen Import
pub use control_loop::control_loop_task;
