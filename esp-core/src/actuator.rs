//! Zeitgesteuerte Aktoren: Summer, grüne LED, Türöffner
//!
//! Jeder Aktor hat einen 8-Bit-Countdown. 0 = aus, [`LATCHED`] = dauerhaft
//! an, alles andere = verbleibende Ticks.

use crate::traits::ActuatorOutputs;
use crate::types::{Actuator, ActuatorStatus, LATCHED, TimerSetting};

/// Countdown-Timer eines Aktors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorTimer(u8);

impl ActuatorTimer {
    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn is_active(self) -> bool {
        self.0 != 0
    }

    pub fn is_latched(self) -> bool {
        self.0 == LATCHED
    }

    pub fn set(&mut self, setting: TimerSetting) {
        self.0 = setting.timer_value();
    }

    /// Ein Tick: herunterzählen, außer bei 0 oder dauerhaft an
    pub fn tick(&mut self) {
        if self.0 != 0 && self.0 != LATCHED {
            self.0 -= 1;
        }
    }
}

/// Die drei Aktor-Timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actuators {
    beeper: ActuatorTimer,
    green_led: ActuatorTimer,
    strike: ActuatorTimer,
}

impl Actuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self, actuator: Actuator) -> ActuatorTimer {
        match actuator {
            Actuator::Beeper => self.beeper,
            Actuator::GreenLed => self.green_led,
            Actuator::Strike => self.strike,
        }
    }

    pub fn set(&mut self, actuator: Actuator, setting: TimerSetting) {
        let timer = match actuator {
            Actuator::Beeper => &mut self.beeper,
            Actuator::GreenLed => &mut self.green_led,
            Actuator::Strike => &mut self.strike,
        };
        timer.set(setting);
    }

    pub fn tick(&mut self) {
        self.strike.tick();
        self.green_led.tick();
        self.beeper.tick();
    }

    pub fn status(&self) -> ActuatorStatus {
        ActuatorStatus {
            beeper: self.beeper.is_active(),
            green_led: self.green_led.is_active(),
            strike: self.strike.is_active(),
        }
    }

    /// Setzt die physikalischen Ausgänge nach aktuellem Timer-Stand
    ///
    /// Wird in jedem Loop-Durchlauf aufgerufen, nicht nur pro Tick.
    pub fn drive<O: ActuatorOutputs + ?Sized>(&self, outputs: &mut O) {
        outputs.set_strike(self.strike.is_active());
        outputs.set_green_led(self.green_led.is_active());
        outputs.set_beeper(self.beeper.is_active());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TICKS_PER_SECOND;

    #[derive(Default)]
    struct Pins {
        strike: bool,
        green_led: bool,
        beeper: bool,
    }

    impl ActuatorOutputs for Pins {
        fn set_strike(&mut self, on: bool) {
            self.strike = on;
        }
        fn set_green_led(&mut self, on: bool) {
            self.green_led = on;
        }
        fn set_beeper(&mut self, on: bool) {
            self.beeper = on;
        }
    }

    #[test]
    fn test_timer_counts_down_to_zero() {
        let mut timer = ActuatorTimer::default();
        timer.set(TimerSetting::Seconds(1));
        for _ in 0..TICKS_PER_SECOND - 1 {
            timer.tick();
            assert!(timer.is_active());
        }
        timer.tick();
        assert!(!timer.is_active());
        timer.tick();
        assert_eq!(timer.raw(), 0);
    }

    #[test]
    fn test_latched_never_expires() {
        let mut timer = ActuatorTimer::default();
        timer.set(TimerSetting::Latched);
        for _ in 0..1000 {
            timer.tick();
        }
        assert!(timer.is_latched());
        timer.set(TimerSetting::Seconds(0));
        assert!(!timer.is_active());
    }

    #[test]
    fn test_timers_are_independent() {
        let mut actuators = Actuators::new();
        actuators.set(Actuator::Strike, TimerSetting::Seconds(2));
        actuators.set(Actuator::Beeper, TimerSetting::Latched);
        actuators.tick();

        assert_eq!(actuators.timer(Actuator::Strike).raw(), 31);
        assert!(actuators.timer(Actuator::Beeper).is_latched());
        assert!(!actuators.timer(Actuator::GreenLed).is_active());
    }

    #[test]
    fn test_drive_follows_timers() {
        let mut actuators = Actuators::new();
        let mut pins = Pins::default();
        actuators.set(Actuator::GreenLed, TimerSetting::Seconds(1));
        actuators.drive(&mut pins);
        assert!(pins.green_led);
        assert!(!pins.strike);
        assert!(!pins.beeper);

        actuators.set(Actuator::GreenLed, TimerSetting::Seconds(0));
        actuators.drive(&mut pins);
        assert!(!pins.green_led);
    }
}
