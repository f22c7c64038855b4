//! Cactus Runner headless driver
//!
//! Runs the simulation at the fixed step with the autopilot at the controls
//! and logs every run.
//!
//! Usage: `cactus-runner [seed] [ticks] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use cactus_runner::consts::*;
    use cactus_runner::sim::{GameEvent, GameState, TickInput, VisualCatalog, tick};
    use cactus_runner::{Result, SimError, Tuning};

    /// Wall-clock frame the driver pretends to render at
    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_SEED: u64 = 0xCAC7_05;
    const DEFAULT_TICKS: u64 = 30 * 60;

    struct Args {
        seed: u64,
        ticks: u64,
        tuning: Option<String>,
    }

    fn parse_args() -> Result<Args> {
        let mut args = std::env::args().skip(1);
        let number = |arg: Option<String>, name: &str, default: u64| -> Result<u64> {
            match arg {
                Some(s) => s.parse().map_err(|_| {
                    SimError::InvalidArgument(format!("{name} must be an integer, got {s:?}"))
                }),
                None => Ok(default),
            }
        };
        Ok(Args {
            seed: number(args.next(), "seed", DEFAULT_SEED)?,
            ticks: number(args.next(), "ticks", DEFAULT_TICKS)?,
            tuning: args.next(),
        })
    }

    /// Fixed-step driver fed with variable frame times
    struct Runner {
        state: GameState,
        input: TickInput,
        accumulator: f32,
        ticks_run: u64,
        runs: u64,
        best_run: u64,
    }

    impl Runner {
        /// Run as many fixed ticks as the frame time allows
        fn update(&mut self, dt: f32, budget: u64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT
                && substeps < MAX_SUBSTEPS
                && self.ticks_run < budget
            {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                self.ticks_run += 1;
                substeps += 1;
            }
            self.report_events();
        }

        fn report_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::RunEnded {
                        generation,
                        ticks_survived,
                        scroll_speed,
                        obstacle,
                    } => {
                        self.runs += 1;
                        self.best_run = self.best_run.max(ticks_survived);
                        log::info!(
                            "Run {} ended on {:?}: {:.1}s survived at speed {:.2}",
                            generation,
                            obstacle,
                            ticks_survived as f32 / TICK_RATE as f32,
                            scroll_speed
                        );
                    }
                    GameEvent::RampStep { scroll_speed, .. } => {
                        log::debug!("Ramp: speed {:.2}", scroll_speed);
                    }
                    GameEvent::WorldGenerated { .. } | GameEvent::Jumped => {}
                }
            }
        }
    }

    pub fn run() -> Result<()> {
        let args = parse_args()?;
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let state = GameState::with_config(args.seed, tuning, VisualCatalog::with_defaults())?;
        log::info!("Game initialized with seed: {}", args.seed);

        let mut runner = Runner {
            state,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            accumulator: 0.0,
            ticks_run: 0,
            runs: 0,
            best_run: 0,
        };
        while runner.ticks_run < args.ticks {
            runner.update(FRAME_DT, args.ticks);
        }

        let state = &runner.state;
        log::info!(
            "Done: {} ticks, {} runs ended, best run {} ticks, current world {} ({} entities, speed {:.2})",
            runner.ticks_run,
            runner.runs,
            runner.best_run,
            state.generation,
            state.registry.len(),
            state.scroll_speed()
        );
        log::debug!("Final state:\n{}", state.snapshot_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cactus Runner (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is embedded by a host renderer on the web; nothing to run here
}
