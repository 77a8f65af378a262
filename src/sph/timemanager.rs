use crate::units::*;

/// Bounds and tuning of the adaptive time step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeStepLimits {
    pub min: Real,
    pub max: Real,
    // Scales the Courant–Friedrichs–Lewy (CFL) estimate, above 1 allows steps longer than CFL suggests.
    pub cfl_factor: Real,
    // If set, steps are shortened so the passed time lands on every multiple of this length.
    pub frame_length: Option<Real>,
}

impl Default for TimeStepLimits {
    fn default() -> Self {
        TimeStepLimits {
            min: 1.0 / 2000.0,
            max: 1.0 / 60.0,
            cfl_factor: 1.0,
            frame_length: None,
        }
    }
}

/// Suggests the `dt` for [`SphSolver::step`](super::SphSolver::step) from the fastest particle.
///
/// The solver never clamps `dt` itself. All values are in seconds.
pub struct TimeManager {
    passed_time: Real,
    timestep: Real,
    limits: TimeStepLimits,
}

impl TimeManager {
    const VELOCITY_EPSILON: Real = 0.00001;

    pub fn new(limits: TimeStepLimits) -> TimeManager {
        TimeManager {
            passed_time: 0.0,
            timestep: limits.min,
            limits,
        }
    }

    /// Back to t=0 with the smallest step.
    pub fn restart(&mut self) {
        self.passed_time = 0.0;
        self.timestep = self.limits.min;
    }

    pub fn passed_time(&self) -> Real {
        self.passed_time
    }

    /// Step to use next.
    pub fn timestep(&self) -> Real {
        self.timestep
    }

    pub fn limits(&self) -> &TimeStepLimits {
        &self.limits
    }

    /// Accounts for a finished step of length [`timestep`](Self::timestep) and picks the next one.
    ///
    /// `max_speed` is typically [`SolverStatistics::max_speed`](super::SolverStatistics) after the step.
    pub fn advance(&mut self, particle_diameter: Real, max_speed: Real) {
        self.passed_time += self.timestep;

        let limits = &self.limits;
        let time_cfl = limits.cfl_factor * 0.4 * particle_diameter / (max_speed + Self::VELOCITY_EPSILON);
        // Shrinks at once, but grows at most by a factor 2. Jumping up right after an impact makes the step oscillate.
        let grown = limits.max.min(self.timestep * 2.0);
        let mut timestep = limits.min.max(grown.min(time_cfl));

        if let Some(frame_length) = limits.frame_length {
            let time_to_frame = ((self.passed_time / frame_length).floor() + 1.0) * frame_length - self.passed_time;
            // tiny remainders are float noise, not a frame boundary to hit
            if time_to_frame > limits.min {
                timestep = timestep.min(time_to_frame);
            }
        }
        self.timestep = timestep;
    }
}
