//! Actuation Loop
//!
//! The scheduling core. Every tick (~2 ms cadence) it snapshots the shared
//! configuration, samples raw trigger state, evaluates the activation
//! predicate, and - when active - splits the configured displacement into
//! a bounded plan of sub-moves dispatched through the selected output
//! backend with a short pacing delay between sub-steps.
//!
//! Each tick is evaluated independently; there is no cross-tick state. An
//! in-progress plan always runs to completion (at most `smoothing` <= 10
//! sub-steps) before activation is reevaluated. Per-tick failures are
//! logged and never terminate the loop.

use crossbeam_channel::Sender;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::backend::OutputBackend;
use crate::config::{Config, SharedConfig};
use crate::input::ButtonSampler;
use crate::utils::TickCounter;

pub mod events;
pub mod plan;

pub use events::{EngineEvent, StatusSeverity};
pub use plan::distribute;

/// Sleep intervals governing the loop cadence.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Base delay between ticks
    pub tick: Duration,
    /// Extra delay between sub-steps while actively moving
    pub sub_step: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(2),
            sub_step: Duration::from_millis(1),
        }
    }
}

impl Pacing {
    /// Zero delays, for tests driving ticks directly.
    pub fn immediate() -> Self {
        Self {
            tick: Duration::ZERO,
            sub_step: Duration::ZERO,
        }
    }
}

/// The activation predicate, evaluated fresh each tick.
pub fn activation(config: &Config, primary: bool, secondary: bool) -> bool {
    config.recoil_compensation && primary && (!config.require_ads || secondary)
}

/// The actuation scheduling core.
///
/// Owns its input sampler and both output backends; reads the shared
/// configuration and the hardware liveness flag each tick. Runs on a
/// dedicated thread until the running flag is cleared.
pub struct ActuationLoop {
    config: SharedConfig,
    sampler: Box<dyn ButtonSampler>,
    synthetic: Box<dyn OutputBackend>,
    hardware: Box<dyn OutputBackend>,
    events: Sender<EngineEvent>,
    ticks: Arc<TickCounter>,
    running: Arc<AtomicBool>,
    pacing: Pacing,
}

impl ActuationLoop {
    /// Assemble the loop from its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SharedConfig,
        sampler: Box<dyn ButtonSampler>,
        synthetic: Box<dyn OutputBackend>,
        hardware: Box<dyn OutputBackend>,
        events: Sender<EngineEvent>,
        ticks: Arc<TickCounter>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            sampler,
            synthetic,
            hardware,
            events,
            ticks,
            running,
            pacing: Pacing::default(),
        }
    }

    /// Override the loop's sleep intervals.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run until the running flag is cleared.
    ///
    /// The flag is checked every iteration, so shutdown is observed within
    /// one tick plus at most one in-flight movement plan.
    pub fn run(&mut self) {
        info!("Actuation loop started");
        while self.running.load(Ordering::Relaxed) {
            self.ticks.record_tick();
            self.tick();
            std::thread::sleep(self.pacing.tick);
        }
        info!("Actuation loop stopped");
    }

    /// Evaluate and execute one tick.
    pub fn tick(&mut self) {
        let config = self.config.snapshot();
        let trigger = self.sampler.sample();

        if !activation(&config, trigger.primary, trigger.secondary) {
            return;
        }

        let steps = config.smoothing.max(1);
        let bloom = config.bloom_intensity.max(0);
        let dx_total = if config.bloom_reduction && bloom > 0 {
            rand::thread_rng().gen_range(-bloom..=bloom)
        } else {
            0
        };

        let y_moves = plan::distribute(config.recoil_strength, steps);
        let x_moves = plan::distribute(dx_total, steps);

        // Selected once per tick; a mid-plan hardware failure surfaces as
        // failed sends for the rest of this plan, and the liveness check
        // routes the next tick to synthetic input.
        let use_hardware = config.use_makcu && self.hardware.is_ready();

        for (&dx, &dy) in x_moves.iter().zip(&y_moves) {
            if use_hardware {
                match self.hardware.send(dx, dy) {
                    Ok(()) => {
                        let _ = self.events.send(EngineEvent::Activity);
                    }
                    Err(e) => debug!("Hardware send failed: {}", e),
                }
            } else if let Err(e) = self.synthetic.send(dx, dy) {
                debug!("Synthetic send failed: {}", e);
            }
            std::thread::sleep(self.pacing.sub_step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::input::TriggerState;
    use parking_lot::Mutex;

    struct FixedSampler(TriggerState);

    impl ButtonSampler for FixedSampler {
        fn sample(&mut self) -> TriggerState {
            self.0
        }
    }

    #[derive(Clone, Default)]
    struct RecordingBackend {
        sends: Arc<Mutex<Vec<(i32, i32)>>>,
        ready: bool,
    }

    impl RecordingBackend {
        fn ready() -> Self {
            Self {
                sends: Arc::new(Mutex::new(Vec::new())),
                ready: true,
            }
        }

        fn offline() -> Self {
            Self {
                sends: Arc::new(Mutex::new(Vec::new())),
                ready: false,
            }
        }

        fn recorded(&self) -> Vec<(i32, i32)> {
            self.sends.lock().clone()
        }
    }

    impl OutputBackend for RecordingBackend {
        fn send(&mut self, dx: i32, dy: i32) -> Result<(), BackendError> {
            self.sends.lock().push((dx, dy));
            Ok(())
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    fn build_loop(
        config: Config,
        trigger: TriggerState,
        synthetic: RecordingBackend,
        hardware: RecordingBackend,
    ) -> (ActuationLoop, crossbeam_channel::Receiver<EngineEvent>) {
        let (tx, rx) = events::channel();
        let engine = ActuationLoop::new(
            SharedConfig::new(config),
            Box::new(FixedSampler(trigger)),
            Box::new(synthetic),
            Box::new(hardware),
            tx,
            Arc::new(TickCounter::new()),
            Arc::new(AtomicBool::new(true)),
        )
        .with_pacing(Pacing::immediate());
        (engine, rx)
    }

    #[test]
    fn test_activation_truth_table() {
        let combos = [
            // (recoil_compensation, require_ads, primary, secondary)
            (false, false, false, false),
            (false, false, true, false),
            (false, true, true, true),
            (true, false, false, false),
            (true, false, true, false),
            (true, true, true, false),
            (true, true, true, true),
            (true, true, false, true),
        ];

        for (comp, ads, primary, secondary) in combos {
            let mut config = Config::default();
            config.recoil_compensation = comp;
            config.require_ads = ads;

            let expected = comp && primary && (!ads || secondary);
            assert_eq!(
                activation(&config, primary, secondary),
                expected,
                "comp={comp} ads={ads} primary={primary} secondary={secondary}"
            );
        }
    }

    #[test]
    fn test_inactive_tick_sends_nothing() {
        let mut config = Config::default();
        config.require_ads = false;

        let synthetic = RecordingBackend::ready();
        let (mut engine, _rx) = build_loop(
            config,
            TriggerState::default(), // nothing pressed
            synthetic.clone(),
            RecordingBackend::offline(),
        );

        engine.tick();
        assert!(synthetic.recorded().is_empty());
    }

    #[test]
    fn test_active_tick_dispatches_full_plan() {
        let mut config = Config::default();
        config.require_ads = false;
        config.bloom_reduction = false;
        config.recoil_strength = 10;
        config.smoothing = 5;

        let synthetic = RecordingBackend::ready();
        let (mut engine, _rx) = build_loop(
            config,
            TriggerState {
                primary: true,
                secondary: false,
            },
            synthetic.clone(),
            RecordingBackend::offline(),
        );

        engine.tick();

        let sends = synthetic.recorded();
        assert_eq!(sends.len(), 5);
        assert_eq!(sends.iter().map(|&(dx, _)| dx).sum::<i32>(), 0);
        assert_eq!(sends.iter().map(|&(_, dy)| dy).sum::<i32>(), 10);
        assert!(sends.iter().all(|&(_, dy)| dy == 2));
    }

    #[test]
    fn test_ads_gate_blocks_without_secondary() {
        let mut config = Config::default();
        config.require_ads = true;

        let synthetic = RecordingBackend::ready();
        let (mut engine, _rx) = build_loop(
            config,
            TriggerState {
                primary: true,
                secondary: false,
            },
            synthetic.clone(),
            RecordingBackend::offline(),
        );

        engine.tick();
        assert!(synthetic.recorded().is_empty());
    }

    #[test]
    fn test_hardware_selected_when_ready_and_enabled() {
        let mut config = Config::default();
        config.require_ads = false;
        config.use_makcu = true;
        config.smoothing = 3;

        let synthetic = RecordingBackend::ready();
        let hardware = RecordingBackend::ready();
        let (mut engine, rx) = build_loop(
            config,
            TriggerState {
                primary: true,
                secondary: false,
            },
            synthetic.clone(),
            hardware.clone(),
        );

        engine.tick();

        assert!(synthetic.recorded().is_empty());
        assert_eq!(hardware.recorded().len(), 3);
        // One activity pulse per successful hardware send
        assert_eq!(rx.try_iter().count(), 3);
    }

    #[test]
    fn test_falls_back_to_synthetic_when_hardware_offline() {
        let mut config = Config::default();
        config.require_ads = false;
        config.use_makcu = true;
        config.smoothing = 3;

        let synthetic = RecordingBackend::ready();
        let hardware = RecordingBackend::offline();
        let (mut engine, rx) = build_loop(
            config,
            TriggerState {
                primary: true,
                secondary: false,
            },
            synthetic.clone(),
            hardware.clone(),
        );

        engine.tick();

        assert_eq!(synthetic.recorded().len(), 3);
        assert!(hardware.recorded().is_empty());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_bloom_jitter_stays_within_bounds() {
        let mut config = Config::default();
        config.require_ads = false;
        config.bloom_reduction = true;
        config.bloom_intensity = 5;
        config.recoil_strength = 8;
        config.smoothing = 1;

        let synthetic = RecordingBackend::ready();
        let (mut engine, _rx) = build_loop(
            config,
            TriggerState {
                primary: true,
                secondary: false,
            },
            synthetic.clone(),
            RecordingBackend::offline(),
        );

        for _ in 0..200 {
            engine.tick();
        }

        for (dx, dy) in synthetic.recorded() {
            assert!((-5..=5).contains(&dx), "jitter out of bounds: {dx}");
            assert_eq!(dy, 8);
        }
    }

    #[test]
    fn test_run_observes_shutdown_flag() {
        let mut config = Config::default();
        config.recoil_compensation = false;

        let running = Arc::new(AtomicBool::new(true));
        let ticks = Arc::new(TickCounter::new());
        let (tx, _rx) = events::channel();

        let mut engine = ActuationLoop::new(
            SharedConfig::new(config),
            Box::new(FixedSampler(TriggerState::default())),
            Box::new(RecordingBackend::ready()),
            Box::new(RecordingBackend::offline()),
            tx,
            ticks.clone(),
            running.clone(),
        )
        .with_pacing(Pacing {
            tick: Duration::from_micros(100),
            sub_step: Duration::ZERO,
        });

        let handle = std::thread::spawn(move || engine.run());
        std::thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Relaxed);
        handle.join().unwrap();

        assert!(ticks.take() > 0);
    }
}
