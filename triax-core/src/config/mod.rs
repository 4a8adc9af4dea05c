//! Configuration type definitions
//!
//! All tunables live in plain structs with `Default` impls so the firmware
//! can construct a machine description as a const-friendly literal. There is
//! no runtime configuration parsing; the serial `OFFSET` command is the only
//! value that changes after boot (see [`points::PointTable`]).

pub mod points;

pub use points::{Point, PointTable, POINT_COUNT};

/// Per-axis motion parameters for the X and Y gantry axes
#[derive(Debug, Clone, Copy)]
pub struct AxisConfig {
    /// Steps per millimeter of travel
    pub steps_per_mm: f32,
    /// Assumed max velocity for eased scan moves (mm/s)
    pub scan_speed_mm_s: f32,
    /// Assumed velocity for rapid transit moves (mm/s)
    pub rapid_speed_mm_s: f32,
    /// Hard pulse-rate ceiling for this axis (Hz)
    pub max_step_rate_hz: u32,
    /// Fixed per-pulse delay while seeking the home limit (µs)
    pub homing_step_delay_us: u32,
    /// Step cap while homing; the limit sensor is considered faulty if it
    /// has not triggered within this much travel
    pub homing_max_travel_mm: f32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            steps_per_mm: 80.0, // GT2 belt + 20T pulley + 1/16 microstep
            scan_speed_mm_s: 60.0,
            rapid_speed_mm_s: 150.0,
            max_step_rate_hz: 20_000,
            homing_step_delay_us: 400,
            homing_max_travel_mm: 500.0,
        }
    }
}

impl AxisConfig {
    /// Convert an absolute distance to a whole step count
    pub fn mm_to_steps(&self, mm: f32) -> u32 {
        let steps = libm::roundf(mm * self.steps_per_mm);
        if steps <= 0.0 {
            0
        } else {
            steps as u32
        }
    }

    /// Minimum per-pulse delay this axis tolerates (µs)
    pub fn min_pulse_interval_us(&self) -> u32 {
        (1_000_000 / self.max_step_rate_hz.max(1)).max(1)
    }
}

/// Ramp parameters for one Z travel direction
///
/// The Z pulse train starts slow and shortens the inter-pulse delay by a
/// fixed amount per pulse until the running delay is reached. Descend and
/// ascend are configured separately (the loaded gripper ascends slower).
#[derive(Debug, Clone, Copy)]
pub struct ZProfile {
    /// Initial inter-pulse delay (µs)
    pub start_delay_us: u32,
    /// Running (fastest) inter-pulse delay (µs)
    pub run_delay_us: u32,
    /// Delay decrement per pulse (µs)
    pub ramp_us_per_step: u32,
}

/// Z axis parameters
#[derive(Debug, Clone, Copy)]
pub struct ZConfig {
    /// Full stroke between travel height and pick/bin depth, in steps.
    /// Z has no persisted absolute position; this count is trusted as
    /// ground truth for every descend/ascend pair.
    pub stroke_steps: u32,
    /// Ramp used when descending (unloaded or lightly loaded)
    pub descend: ZProfile,
    /// Ramp used when ascending (carrying the object)
    pub ascend: ZProfile,
    /// Fixed per-pulse delay while seeking the top limit (µs)
    pub homing_step_delay_us: u32,
    /// Step cap while homing
    pub homing_max_steps: u32,
}

impl Default for ZConfig {
    fn default() -> Self {
        Self {
            stroke_steps: 2_000,
            descend: ZProfile {
                start_delay_us: 900,
                run_delay_us: 350,
                ramp_us_per_step: 6,
            },
            ascend: ZProfile {
                start_delay_us: 1_100,
                run_delay_us: 450,
                ramp_us_per_step: 5,
            },
            homing_step_delay_us: 800,
            homing_max_steps: 4_000,
        }
    }
}

/// Pick sequence parameters
#[derive(Debug, Clone, Copy)]
pub struct SequenceConfig {
    /// Pause after reaching depth before actuating the gripper (ms)
    pub settle_ms: u32,
    /// Pause after actuating the gripper before moving (ms)
    pub grip_hold_ms: u32,
    /// Drop-off bin coordinate (mm)
    pub bin_x_mm: f32,
    /// Drop-off bin coordinate (mm)
    pub bin_y_mm: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            settle_ms: 200,
            grip_hold_ms: 300,
            bin_x_mm: 0.0,
            bin_y_mm: 450.0,
        }
    }
}

/// Run state machine timing
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Dwell after arriving at a point before it counts as stable (ms)
    pub scan_settle_ms: u32,
    /// How long mode 1 waits for an external decision before defaulting
    /// to SKIP (ms)
    pub decision_timeout_ms: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scan_settle_ms: 500,
            decision_timeout_ms: 5_000,
        }
    }
}

/// Shared XY move planning parameters
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// Floor for any move's total duration; short moves are stretched to
    /// this so they are never rushed (ms)
    pub min_move_time_ms: u32,
    /// Control tick period for rapid moves (µs)
    pub rapid_tick_us: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            min_move_time_ms: 250,
            rapid_tick_us: 1_000,
        }
    }
}

/// Complete machine description
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,
    pub z: ZConfig,
    pub motion: MotionConfig,
    pub sequence: SequenceConfig,
    pub run: RunConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_steps_rounds() {
        let cfg = AxisConfig {
            steps_per_mm: 80.0,
            ..Default::default()
        };
        assert_eq!(cfg.mm_to_steps(10.0), 800);
        assert_eq!(cfg.mm_to_steps(0.004), 0);
        assert_eq!(cfg.mm_to_steps(0.01), 1);
    }

    #[test]
    fn test_min_pulse_interval() {
        let cfg = AxisConfig {
            max_step_rate_hz: 20_000,
            ..Default::default()
        };
        assert_eq!(cfg.min_pulse_interval_us(), 50);

        // Degenerate rate must not divide by zero
        let cfg = AxisConfig {
            max_step_rate_hz: 0,
            ..Default::default()
        };
        assert!(cfg.min_pulse_interval_us() >= 1);
    }

    #[test]
    fn test_defaults_sane() {
        let cfg = MachineConfig::default();
        assert!(cfg.x.scan_speed_mm_s < cfg.x.rapid_speed_mm_s);
        assert!(cfg.z.descend.run_delay_us <= cfg.z.descend.start_delay_us);
        assert!(cfg.z.ascend.run_delay_us <= cfg.z.ascend.start_delay_us);
        assert!(cfg.z.homing_max_steps > cfg.z.stroke_steps);
        assert!(cfg.run.decision_timeout_ms > cfg.run.scan_settle_ms);
    }
}
