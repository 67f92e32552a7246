use crate::{
    config::Config,
    error::{ConfigError, Error},
    rule::CellState,
    world::{Automaton, Dimensions, Generation, Position, World},
};
use log::{debug, trace};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display;

/// The density used by [`Engine::randomize`] when none is given.
pub const DEFAULT_DENSITY: f64 = 0.2;

/// The state of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum EngineState {
    /// No simulation has been started.
    #[default]
    Idle,

    /// A simulation has been started and is paused.
    ///
    /// Cells can be edited, and the simulation can be advanced manually.
    Editing,

    /// The simulation is running.
    ///
    /// The driver is expected to call [`Engine::step`] once per tick interval.
    Running,
}

/// The operations of an [`Engine`], as reported in [`Error::InvalidState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    /// [`Engine::start`].
    Start,
    /// [`Engine::step`].
    Step,
    /// [`Engine::edit`].
    Edit,
    /// [`Engine::run`].
    Run,
    /// [`Engine::stop`].
    Stop,
    /// [`Engine::reset`].
    Reset,
    /// [`Engine::clear`].
    Clear,
    /// [`Engine::randomize`].
    Randomize,
}

/// The initial world of a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Start from the default world of the given size.
    ///
    /// See [`Automaton::initial_world`].
    Blank(Dimensions),

    /// Start from the given world.
    World(World),
}

/// A point edit of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edit {
    /// Set the cell to the given state.
    Set(CellState),

    /// Flip the state of the cell.
    Toggle,
}

/// The rule and the current generation of a simulation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSimulation"))]
struct Simulation {
    automaton: Automaton,
    generation: Generation,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawSimulation {
    automaton: Automaton,
    generation: Generation,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSimulation> for Simulation {
    type Error = ConfigError;

    fn try_from(raw: RawSimulation) -> Result<Self, Self::Error> {
        if !raw.automaton.accepts(raw.generation.world.dimensions()) {
            return Err(ConfigError::DimensionMismatch);
        }
        Ok(Self {
            automaton: raw.automaton,
            generation: raw.generation,
        })
    }
}

/// Runs a cellular automaton one tick at a time.
///
/// The engine is a state machine:
///
/// ```text
///         start             run
/// Idle ----------> Editing -------> Running
///                          <-------
///                            stop
/// ```
///
/// While editing, the engine also accepts `start`, `step`, `edit`, `reset`, `clear`
/// and `randomize`. [`step`](Engine::step) is also allowed while running.
///
/// Every other transition fails with [`Error::InvalidState`]. A failed operation never
/// changes the engine.
///
/// The engine has no timer. The driver calls [`step`](Engine::step) at the cadence
/// recorded by [`run`](Engine::run).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawEngine"))]
pub struct Engine {
    state: EngineState,

    /// [`None`] iff the engine is idle.
    simulation: Option<Simulation>,

    tick_interval: Option<Duration>,

    /// Random number generator for [`randomize`](Engine::randomize).
    rng: Xoshiro256PlusPlus,
}

/// A deserialized [`Engine`] that has not been checked yet.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawEngine {
    state: EngineState,
    simulation: Option<Simulation>,
    tick_interval: Option<Duration>,
    rng: Xoshiro256PlusPlus,
}

#[cfg(feature = "serde")]
impl TryFrom<RawEngine> for Engine {
    type Error = ConfigError;

    fn try_from(raw: RawEngine) -> Result<Self, Self::Error> {
        if (raw.state == EngineState::Idle) != raw.simulation.is_none() {
            return Err(ConfigError::InconsistentState);
        }
        Ok(Self {
            state: raw.state,
            simulation: raw.simulation,
            tick_interval: raw.tick_interval,
            rng: raw.rng,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an idle engine with a randomly seeded random number generator.
    pub fn new() -> Self {
        Self::with_rng(Xoshiro256PlusPlus::from_entropy())
    }

    /// Create an idle engine with the given random seed.
    ///
    /// Two engines with the same seed and the same sequence of operations produce
    /// the same generations.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    const fn with_rng(rng: Xoshiro256PlusPlus) -> Self {
        Self {
            state: EngineState::Idle,
            simulation: None,
            tick_interval: None,
            rng,
        }
    }

    /// Create an engine from a configuration, and start the simulation it describes.
    ///
    /// If the configuration has a density, the world is randomized after the start.
    /// The returned engine is in the [`Editing`](EngineState::Editing) state.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut engine = config.seed.map_or_else(Self::new, Self::with_seed);
        engine.start(config.automaton()?, config.initial_seed()?)?;
        if let Some(density) = config.density {
            engine.randomize(density)?;
        }
        Ok(engine)
    }

    /// The current state.
    #[inline]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// The current generation, or [`None`] if the engine is idle.
    #[inline]
    pub fn generation(&self) -> Option<&Generation> {
        self.simulation.as_ref().map(|simulation| &simulation.generation)
    }

    /// The rule of the current simulation, or [`None`] if the engine is idle.
    #[inline]
    pub fn automaton(&self) -> Option<&Automaton> {
        self.simulation.as_ref().map(|simulation| &simulation.automaton)
    }

    /// The tick interval recorded by the last call to [`run`](Engine::run).
    #[inline]
    pub const fn tick_interval(&self) -> Option<Duration> {
        self.tick_interval
    }

    /// Get the current simulation if the state is one of `allowed`.
    ///
    /// Takes the fields separately so that the caller can still borrow the rng.
    fn simulation_mut<'a>(
        state: EngineState,
        simulation: &'a mut Option<Simulation>,
        operation: Operation,
        allowed: &[EngineState],
    ) -> Result<&'a mut Simulation, Error> {
        match simulation {
            Some(simulation) if allowed.contains(&state) => Ok(simulation),
            _ => Err(Error::InvalidState { operation, state }),
        }
    }

    /// Start a new simulation. Any previous simulation is discarded.
    ///
    /// Allowed when idle or editing. The engine is then in the
    /// [`Editing`](EngineState::Editing) state, at tick `0`.
    pub fn start(&mut self, automaton: Automaton, seed: Seed) -> Result<&Generation, Error> {
        if self.state == EngineState::Running {
            return Err(Error::InvalidState {
                operation: Operation::Start,
                state: self.state,
            });
        }

        let world = match seed {
            Seed::Blank(dimensions) => automaton.initial_world(dimensions)?,
            Seed::World(world) if automaton.accepts(world.dimensions()) => world,
            Seed::World(_) => return Err(ConfigError::DimensionMismatch.into()),
        };

        debug!(
            "Starting {automaton} on a world of {:?}",
            world.dimensions()
        );

        self.state = EngineState::Editing;
        let simulation = self.simulation.insert(Simulation {
            automaton,
            generation: Generation::seed(world),
        });
        Ok(&simulation.generation)
    }

    /// Advance the simulation by one tick.
    ///
    /// Allowed when editing or running. The next world is computed from the current one,
    /// which is then replaced as a whole.
    pub fn step(&mut self) -> Result<&Generation, Error> {
        let simulation = Self::simulation_mut(
            self.state,
            &mut self.simulation,
            Operation::Step,
            &[EngineState::Editing, EngineState::Running],
        )?;

        let world = simulation.automaton.step(&simulation.generation.world)?;
        simulation.generation = Generation {
            tick: simulation.generation.tick + 1,
            world,
        };

        trace!(
            "Tick {}: population {}",
            simulation.generation.tick,
            simulation.generation.population()
        );

        Ok(&simulation.generation)
    }

    /// Edit a single cell. Returns the new state of the cell.
    ///
    /// Allowed only when editing.
    pub fn edit(&mut self, position: Position, edit: Edit) -> Result<CellState, Error> {
        let simulation = Self::simulation_mut(
            self.state,
            &mut self.simulation,
            Operation::Edit,
            &[EngineState::Editing],
        )?;
        let world = &mut simulation.generation.world;

        let state = match edit {
            Edit::Set(state) => state,
            Edit::Toggle => !world.get(position)?,
        };
        world.set(position, state)?;

        trace!("Set {position:?} to {state:?}");
        Ok(state)
    }

    /// Start running the simulation.
    ///
    /// Allowed only when editing. The tick interval is only recorded for the driver.
    pub fn run(&mut self, tick_interval: Duration) -> Result<(), Error> {
        Self::simulation_mut(
            self.state,
            &mut self.simulation,
            Operation::Run,
            &[EngineState::Editing],
        )?;

        debug!("Running with a tick interval of {tick_interval:?}");
        self.state = EngineState::Running;
        self.tick_interval = Some(tick_interval);
        Ok(())
    }

    /// Stop running the simulation.
    ///
    /// Does nothing when already editing. Fails when idle.
    pub fn stop(&mut self) -> Result<(), Error> {
        match self.state {
            EngineState::Idle => Err(Error::InvalidState {
                operation: Operation::Stop,
                state: self.state,
            }),
            EngineState::Editing => Ok(()),
            EngineState::Running => {
                debug!("Stopped");
                self.state = EngineState::Editing;
                Ok(())
            }
        }
    }

    /// Replace the world, and go back to tick `0`.
    ///
    /// Allowed only when editing. The world must have the dimensionality of the automaton.
    pub fn reset(&mut self, world: World) -> Result<&Generation, Error> {
        let simulation = Self::simulation_mut(
            self.state,
            &mut self.simulation,
            Operation::Reset,
            &[EngineState::Editing],
        )?;

        if !simulation.automaton.accepts(world.dimensions()) {
            return Err(ConfigError::DimensionMismatch.into());
        }

        debug!("Reset to a world of {:?}", world.dimensions());
        simulation.generation = Generation::seed(world);
        Ok(&simulation.generation)
    }

    /// Kill every cell, and go back to tick `0`.
    ///
    /// Allowed only when editing.
    pub fn clear(&mut self) -> Result<&Generation, Error> {
        let simulation = Self::simulation_mut(
            self.state,
            &mut self.simulation,
            Operation::Clear,
            &[EngineState::Editing],
        )?;

        let world = World::blank(simulation.generation.world.dimensions())?;

        debug!("Cleared");
        simulation.generation = Generation::seed(world);
        Ok(&simulation.generation)
    }

    /// Set every cell to a random state, and go back to tick `0`.
    ///
    /// Allowed only when editing. Each cell is alive with probability `density`,
    /// which must be in `0..=1`.
    pub fn randomize(&mut self, density: f64) -> Result<&Generation, Error> {
        let simulation = Self::simulation_mut(
            self.state,
            &mut self.simulation,
            Operation::Randomize,
            &[EngineState::Editing],
        )?;

        if !(0.0..=1.0).contains(&density) {
            return Err(ConfigError::InvalidDensity(density).into());
        }

        simulation.generation.world.randomize(&mut self.rng, density);
        simulation.generation.tick = 0;

        debug!(
            "Randomized with density {density}: population {}",
            simulation.generation.population()
        );
        Ok(&simulation.generation)
    }
}
