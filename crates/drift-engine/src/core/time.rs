/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of equal physics steps.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
}

impl FixedTimestep {
    /// Most steps a single frame may run before excess time is dropped.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if self.dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.max(0.0);
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f64);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        if self.dt <= 0.0 {
            return 0.0;
        }
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Drop any partially accumulated frame time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
