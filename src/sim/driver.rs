// Frame driver: the seam between the automaton and whatever shell owns the
// event loop. Each frame, input is applied, due generations are advanced and
// the renderer is called exactly once.

use std::time::Duration;

use log::{info, warn};

use super::automaton::Automaton;
use super::clock::Clock;
use super::config::SimConfig;
use crate::core::Result;
use crate::rules::RuleLibrary;

pub trait Renderer {
    fn render(&mut self, automaton: &Automaton);
}

/// User actions, already translated from raw events by the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    TogglePause,
    /// Pointer click in renderer pixels. Cycles the cell underneath to its
    /// next state.
    Click { x: f64, y: f64 },
    Randomize,
    Clear,
    SelectRule(String),
    SetSpeed(f64),
    /// Advance one generation regardless of the clock.
    Step,
}

#[derive(Debug, Clone)]
pub struct Driver {
    automaton: Automaton,
    clock: Clock,
    library: RuleLibrary,
}

impl Driver {
    pub fn new(automaton: Automaton, clock: Clock, library: RuleLibrary) -> Self {
        Self { automaton, clock, library }
    }

    pub fn from_config(config: &SimConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let library = config.library()?;
        let mut automaton = Automaton::from_config(config, &library)?;
        if config.random_fill {
            automaton.randomize();
        }
        let mut clock = Clock::new(config.speed)?;
        if config.start_paused {
            clock.pause();
        }
        info!(
            "driver ready: {}x{} grid, rule {:?}, {} s/generation{}",
            automaton.grid().width(),
            automaton.grid().height(),
            config.rule,
            config.speed,
            if config.start_paused { ", paused" } else { "" }
        );
        Ok(Self::new(automaton, clock, library))
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn library(&self) -> &RuleLibrary {
        &self.library
    }

    /// Applies one input. Only rule selection and speed changes can fail,
    /// and a failure leaves the driver unchanged.
    pub fn handle(&mut self, input: Input) -> Result<()> {
        match input {
            Input::TogglePause => {
                let paused = self.clock.toggle_pause();
                info!("{}", if paused { "paused" } else { "running" });
            }
            Input::Click { x, y } => match self.automaton.cell_at_pixel(x, y) {
                Some((cx, cy)) => {
                    self.automaton.cycle_cell(cx as isize, cy as isize);
                }
                None => warn!("click at ({}, {}) is outside the grid", x, y),
            },
            Input::Randomize => self.automaton.randomize(),
            Input::Clear => self.automaton.clear(),
            Input::SelectRule(name) => {
                if let Err(e) = self.automaton.switch_rule_set_by_name(&self.library, &name) {
                    warn!("rule set not switched: {}", e);
                    return Err(e);
                }
                info!("rule set {:?}", name);
            }
            Input::SetSpeed(speed) => {
                if let Err(e) = self.clock.set_speed(speed) {
                    warn!("speed unchanged: {}", e);
                    return Err(e);
                }
            }
            Input::Step => self.automaton.advance(),
        }
        Ok(())
    }

    /// Advance every generation the clock says is due, then render once.
    /// Returns the number of generations advanced.
    pub fn frame<R: Renderer + ?Sized>(&mut self, elapsed: Duration, renderer: &mut R) -> u32 {
        let due = self.clock.tick(elapsed);
        for _ in 0..due {
            self.automaton.advance();
        }
        renderer.render(&self.automaton);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TesseraError;
    use crate::rules::library;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<u64>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, automaton: &Automaton) {
            self.frames.push(automaton.generation());
        }
    }

    fn driver(speed: f64) -> Driver {
        let config = SimConfig {
            viewport_width: 80,
            viewport_height: 80,
            cell_width: 8,
            cell_height: 8,
            speed,
            seed: Some(1),
            start_paused: false,
            ..Default::default()
        };
        Driver::from_config(&config).unwrap()
    }

    #[test]
    fn renders_once_per_frame() {
        let mut d = driver(0.5);
        let mut r = Recorder::default();
        assert_eq!(d.frame(Duration::from_millis(250), &mut r), 0);
        assert_eq!(d.frame(Duration::from_millis(250), &mut r), 1);
        assert_eq!(d.frame(Duration::from_millis(1500), &mut r), 3);
        assert_eq!(r.frames, vec![0, 1, 4]);
    }

    #[test]
    fn pause_stops_generations_but_not_rendering() {
        let mut d = driver(0.25);
        let mut r = Recorder::default();
        d.handle(Input::TogglePause).unwrap();
        assert_eq!(d.frame(Duration::from_secs(2), &mut r), 0);
        assert_eq!(r.frames.len(), 1);
        d.handle(Input::Step).unwrap();
        assert_eq!(d.automaton().generation(), 1);
    }

    #[test]
    fn click_flips_two_state_cell_under_pointer() {
        let mut d = driver(1.0);
        d.handle(Input::Click { x: 17.0, y: 9.0 }).unwrap();
        assert_eq!(d.automaton().get(2, 1), Some(1));
        d.handle(Input::Click { x: 23.5, y: 15.9 }).unwrap();
        assert_eq!(d.automaton().get(2, 1), Some(0));
        // Outside: ignored.
        d.handle(Input::Click { x: 800.0, y: 1.0 }).unwrap();
        assert_eq!(d.automaton().grid().population(), 0);
    }

    #[test]
    fn clicks_cycle_through_every_state() {
        let mut d = driver(1.0);
        d.handle(Input::SelectRule(library::WIREWORLD.into())).unwrap();
        let mut seen = Vec::new();
        for _ in 0..5 {
            d.handle(Input::Click { x: 1.0, y: 1.0 }).unwrap();
            seen.push(d.automaton().get(0, 0).unwrap());
        }
        assert_eq!(seen, vec![1, 2, 3, 0, 1]);
    }

    #[test]
    fn select_rule_and_speed() {
        let mut d = driver(1.0);
        d.handle(Input::Randomize).unwrap();
        d.handle(Input::SelectRule(library::WIREWORLD.into())).unwrap();
        assert_eq!(d.automaton().state_count(), 4);
        assert!(matches!(
            d.handle(Input::SelectRule("nope".into())),
            Err(TesseraError::UnknownRuleSet(_))
        ));
        assert_eq!(d.automaton().rule_name(), Some(library::WIREWORLD));
        assert!(d.handle(Input::SetSpeed(-2.0)).is_err());
        d.handle(Input::SetSpeed(0.125)).unwrap();
        assert_eq!(d.clock().speed(), 0.125);
        d.handle(Input::Clear).unwrap();
        assert_eq!(d.automaton().grid().population(), 0);
    }

    #[test]
    fn config_flags_apply() {
        let config = SimConfig { random_fill: true, seed: Some(9), ..Default::default() };
        let d = Driver::from_config(&config).unwrap();
        assert!(d.clock().is_paused());
        assert!(d.automaton().grid().population() > 0);
        assert_eq!(d.automaton().grid().dimensions(), (64, 64));
    }
}
