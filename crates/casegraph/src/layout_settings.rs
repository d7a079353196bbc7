use crate::case_scope::CaseScope;
use crate::ranking::{EntityFilter, SortSpec};
use serde::{Deserialize, Serialize};

/// Bounds for a tunable parameter so they live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

// Force ranges
pub const REPULSION_RANGE: ParamRange = ParamRange::new(0.0, 20_000.0);
pub const SPRING_LENGTH_RANGE: ParamRange = ParamRange::new(10.0, 500.0);
pub const SPRING_CONSTANT_RANGE: ParamRange = ParamRange::new(0.0, 1.0);
pub const CENTRAL_GRAVITY_RANGE: ParamRange = ParamRange::new(0.0, 0.1);
pub const DAMPING_RANGE: ParamRange = ParamRange::new(0.0, 0.95);
pub const TIMESTEP_RANGE: ParamRange = ParamRange::new(0.01, 1.0);
pub const MAX_VELOCITY_RANGE: ParamRange = ParamRange::new(1.0, 500.0);
pub const EPSILON_RANGE: ParamRange = ParamRange::new(0.0, 100.0);
pub const FORCE_EPSILON_RANGE: ParamRange = ParamRange::new(0.0, 10.0);

pub const MIN_ITERATIONS: usize = 1;
pub const MAX_ITERATIONS: usize = 500;

/// Parameters of the force-directed layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceSettings {
    pub repulsion: f32,
    pub spring_length: f32,
    pub spring_constant: f32,
    pub central_gravity: f32,
    pub damping: f32,
    pub timestep: f32,
    pub max_velocity: f32,
    pub max_iterations: usize,
    /// A step whose summed node displacement falls below this converges,
    /// provided the residual forces are also below `force_epsilon`.
    pub displacement_epsilon: f32,
    /// Largest net force per unit mass on any free node that still counts
    /// as settled.
    pub force_epsilon: f32,
    pub seed: u64,
}

impl Default for ForceSettings {
    fn default() -> Self {
        Self {
            repulsion: 1500.0,
            spring_length: 100.0,
            spring_constant: 0.08,
            central_gravity: 0.001,
            damping: 0.09,
            timestep: 0.35,
            max_velocity: 50.0,
            max_iterations: 150,
            displacement_epsilon: 0.5,
            force_epsilon: 0.2,
            seed: 0x5eed,
        }
    }
}

impl ForceSettings {
    /// Every parameter forced into its documented range.
    pub fn clamped(self) -> Self {
        Self {
            repulsion: REPULSION_RANGE.clamp(self.repulsion),
            spring_length: SPRING_LENGTH_RANGE.clamp(self.spring_length),
            spring_constant: SPRING_CONSTANT_RANGE
                .clamp(self.spring_constant),
            central_gravity: CENTRAL_GRAVITY_RANGE
                .clamp(self.central_gravity),
            damping: DAMPING_RANGE.clamp(self.damping),
            timestep: TIMESTEP_RANGE.clamp(self.timestep),
            max_velocity: MAX_VELOCITY_RANGE.clamp(self.max_velocity),
            max_iterations: self
                .max_iterations
                .clamp(MIN_ITERATIONS, MAX_ITERATIONS),
            displacement_epsilon: EPSILON_RANGE
                .clamp(self.displacement_epsilon),
            force_epsilon: FORCE_EPSILON_RANGE.clamp(self.force_epsilon),
            seed: self.seed,
        }
    }
}

/// Initial table state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefaults {
    pub sort: SortSpec,
    pub filter: EntityFilter,
}

/// Everything configurable about an analysis session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub layout: ForceSettings,
    pub table: TableDefaults,
    pub scope: CaseScope,
}
