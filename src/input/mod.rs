//! Trigger Input Sampling
//!
//! Point-in-time reads of the primary and secondary mouse-button state. The
//! loop samples through the [`ButtonSampler`] trait so tests can drive it
//! with fixed states; the host implementation polls the OS through
//! `device_query` (feature `os-input`).

/// Raw trigger state at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerState {
    /// Primary trigger (left mouse button) currently held
    pub primary: bool,
    /// Secondary trigger (right mouse button / ADS) currently held
    pub secondary: bool,
}

/// Non-blocking source of trigger state, sampled once per tick.
pub trait ButtonSampler: Send {
    /// Read both trigger states at this instant.
    fn sample(&mut self) -> TriggerState;
}

#[cfg(feature = "os-input")]
pub use host::DeviceQuerySampler;

#[cfg(feature = "os-input")]
mod host {
    use super::{ButtonSampler, TriggerState};
    use device_query::{DeviceQuery, DeviceState};

    /// Host button sampler backed by `device_query`.
    pub struct DeviceQuerySampler {
        state: DeviceState,
    }

    impl DeviceQuerySampler {
        /// Create a sampler polling the host's global mouse state.
        pub fn new() -> Self {
            Self {
                state: DeviceState::new(),
            }
        }
    }

    impl Default for DeviceQuerySampler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ButtonSampler for DeviceQuerySampler {
        fn sample(&mut self) -> TriggerState {
            // device_query indexes buttons from 1: left, right, middle.
            let mouse = self.state.get_mouse();
            TriggerState {
                primary: mouse.button_pressed.get(1).copied().unwrap_or(false),
                secondary: mouse.button_pressed.get(2).copied().unwrap_or(false),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSampler(TriggerState);

    impl ButtonSampler for FixedSampler {
        fn sample(&mut self) -> TriggerState {
            self.0
        }
    }

    #[test]
    fn test_sampler_trait_object() {
        let mut sampler: Box<dyn ButtonSampler> = Box::new(FixedSampler(TriggerState {
            primary: true,
            secondary: false,
        }));

        let state = sampler.sample();
        assert!(state.primary);
        assert!(!state.secondary);
    }
}
