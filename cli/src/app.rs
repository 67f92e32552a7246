use crate::args::{LoadArgs, NewArgs};
use cellsim_lib::{Engine, World};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::{io::Write, path::PathBuf, thread, time::Duration};

/// Application state.
#[derive(Debug, Serialize, Deserialize)]
pub struct App {
    /// The simulation.
    pub engine: Engine,
    /// Time between two generations.
    pub interval: Duration,
    /// Number of generations to run.
    #[serde(skip)]
    pub generations: u64,
    /// A path to save the application state.
    #[serde(skip)]
    pub save: Option<PathBuf>,
}

impl App {
    /// Create a new [`App`] from the command line arguments.
    pub fn new(args: NewArgs) -> Result<Self> {
        let engine = Engine::from_config(&args.config)?;
        let interval = args.config.tick_interval();

        Ok(Self {
            engine,
            interval,
            generations: args.output.generations,
            save: args.output.save,
        })
    }

    /// Load the [`App`] from the path given in the command line arguments.
    pub fn load(args: LoadArgs) -> Result<Self> {
        let path = args.load;
        let json = std::fs::read_to_string(&path)?;
        let mut app: Self = serde_json::from_str(&json)?;
        log::info!("Loaded from {}", path.display());

        app.generations = args.output.generations;
        app.save = args.output.save;
        Ok(app)
    }

    /// Save the application state.
    pub fn save(&self) -> Result<()> {
        if let Some(save) = &self.save {
            let json = serde_json::to_string(self)?;
            std::fs::write(save, json)?;
            log::info!("Saved to {}", save.display());
        }
        Ok(())
    }

    /// Write the current generation.
    ///
    /// A line is written as a single row, so that successive generations stack up.
    /// A grid is written in RLE format, followed by an empty line.
    pub fn print(&self, out: &mut impl Write) -> Result<()> {
        let (Some(automaton), Some(generation)) =
            (self.engine.automaton(), self.engine.generation())
        else {
            return Ok(());
        };

        let world = generation.world();
        match world {
            World::Line(line) => writeln!(out, "{line}")?,
            World::Grid(_) => writeln!(out, "{}", world.rle(automaton))?,
        }
        Ok(())
    }

    /// Run the simulation for the given number of generations, printing each one.
    ///
    /// Then stop the simulation and save it.
    pub fn run(&mut self, out: &mut impl Write) -> Result<()> {
        self.print(out)?;

        self.engine.run(self.interval)?;
        for _ in 0..self.generations {
            thread::sleep(self.interval);
            self.engine.step()?;
            self.print(out)?;
        }
        self.engine.stop()?;

        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::OutputArgs;
    use cellsim_lib::{Config, EngineState};

    fn new_app(config: Config, generations: u64) -> App {
        App::new(NewArgs {
            config: config.with_interval(0).check().unwrap(),
            output: OutputArgs {
                generations,
                save: None,
            },
        })
        .unwrap()
    }

    #[test]
    fn test_run_line() {
        let mut app = new_app(Config::new(9, None).with_rule("W90"), 3);
        let mut out = Vec::new();
        app.run(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "....o....\n...o.o...\n..o...o..\n.o.o.o.o.\n"
        );
        assert_eq!(app.engine.state(), EngineState::Editing);
        assert_eq!(app.engine.generation().unwrap().tick(), 3);
    }

    #[test]
    fn test_run_grid() {
        let config = Config::new(5, Some(5)).with_pattern("ooo");
        let mut app = new_app(config, 1);
        let mut out = Vec::new();
        app.run(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "x = 5, y = 5, rule = B3/S23\n.....$\n.....$\n.ooo.$\n.....$\n.....!\n\n\
             x = 5, y = 5, rule = B3/S23\n.....$\n..o..$\n..o..$\n..o..$\n.....!\n\n"
        );
    }

    #[test]
    fn test_save_and_resume() {
        let config = Config::new(12, Some(12)).with_density(0.4).with_seed(1);
        let mut app = new_app(config, 4);
        app.run(&mut std::io::sink()).unwrap();

        let json = serde_json::to_string(&app).unwrap();
        let mut loaded: App = serde_json::from_str(&json).unwrap();
        loaded.generations = 4;

        app.run(&mut std::io::sink()).unwrap();
        loaded.run(&mut std::io::sink()).unwrap();
        assert_eq!(loaded.engine.generation(), app.engine.generation());
        assert_eq!(loaded.engine.generation().unwrap().tick(), 8);
    }
}
