// Generation clock. Frame time is accumulated and whole generations are paid
// out of it at one per `speed` seconds, so the simulation rate is independent
// of the frame rate.

use std::time::Duration;

use log::debug;

use crate::core::{Result, TesseraError};

#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    speed: f64,
    accumulator: f64,
    paused: bool,
}

impl Clock {
    pub fn new(speed: f64) -> Result<Self> {
        check_speed(speed)?;
        Ok(Self { speed, accumulator: 0.0, paused: false })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Seconds per generation. Must be positive and finite.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        check_speed(speed)?;
        debug!("speed {} -> {} s/generation", self.speed, speed);
        self.speed = speed;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.accumulator = 0.0;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    /// Time banked toward the next generation.
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Bank `elapsed` and return how many generations are now due. While
    /// paused, elapsed time is dropped.
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        if self.paused {
            return 0;
        }
        self.accumulator += elapsed.as_secs_f64();
        let due = (self.accumulator / self.speed).floor().min(u32::MAX as f64);
        if due < 1.0 {
            return 0;
        }
        self.accumulator -= due * self.speed;
        if self.accumulator < 0.0 {
            self.accumulator = 0.0;
        }
        due as u32
    }
}

fn check_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(TesseraError::InvalidSpeed(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn accumulates_across_frames() {
        let mut clock = Clock::new(0.25).unwrap();
        assert_eq!(clock.tick(ms(125)), 0);
        assert_eq!(clock.tick(ms(125)), 1);
        assert_eq!(clock.pending(), 0.0);
    }

    #[test]
    fn slow_frames_catch_up() {
        let mut clock = Clock::new(0.125).unwrap();
        assert_eq!(clock.tick(ms(1000)), 8);
        assert_eq!(clock.tick(ms(500)), 4);
    }

    #[test]
    fn remainder_is_kept() {
        let mut clock = Clock::new(0.5).unwrap();
        assert_eq!(clock.tick(ms(1250)), 2);
        assert!((clock.pending() - 0.25).abs() < 1e-9);
        assert_eq!(clock.tick(ms(250)), 1);
    }

    #[test]
    fn paused_drops_time() {
        let mut clock = Clock::new(0.5).unwrap();
        clock.tick(ms(250));
        assert!(clock.toggle_pause());
        assert_eq!(clock.pending(), 0.0);
        assert_eq!(clock.tick(ms(5000)), 0);
        assert!(!clock.toggle_pause());
        assert_eq!(clock.tick(ms(250)), 0);
        assert_eq!(clock.tick(ms(250)), 1);
    }

    #[test]
    fn excess_beyond_u32_stays_banked() {
        let mut clock = Clock::new(1e-9).unwrap();
        assert_eq!(clock.tick(Duration::from_secs(10)), u32::MAX);
        // About 5.7 s worth of generations is still owed.
        assert!(clock.pending() > 5.0);
        assert_eq!(clock.tick(Duration::ZERO), u32::MAX);
    }

    #[test]
    fn rejects_bad_speed() {
        assert_eq!(Clock::new(0.0), Err(TesseraError::InvalidSpeed(0.0)));
        assert!(Clock::new(-1.0).is_err());
        assert!(Clock::new(f64::NAN).is_err());
        let mut clock = Clock::new(1.0).unwrap();
        assert!(clock.set_speed(f64::INFINITY).is_err());
        assert_eq!(clock.speed(), 1.0);
        clock.set_speed(0.5).unwrap();
        assert_eq!(clock.tick(ms(1000)), 2);
    }
}
