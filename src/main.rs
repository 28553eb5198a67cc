//! Square Dodge entry point
//!
//! Headless native driver: loads settings, runs one session with the demo
//! pilot at a simulated 60 Hz frame rate and logs the result.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use square_dodge::Settings;
    use square_dodge::consts::MAX_SUBSTEPS;
    use square_dodge::sim::{GameEvent, Session, SessionSummary, TickInput, tick};

    /// Simulated frame length (milliseconds)
    const FRAME_MS: u32 = 16;

    /// Game instance holding all state
    struct Game {
        session: Session,
        accumulator: u32,
        input: TickInput,
        max_ticks: u64,
    }

    impl Game {
        fn new(session: Session, max_ticks: u64) -> Self {
            Self {
                session,
                accumulator: 0,
                input: TickInput {
                    idle_mode: true,
                    ..Default::default()
                },
                max_ticks,
            }
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, frame_ms: u32) {
            let tick_ms = self.session.tick_ms();
            self.accumulator += frame_ms.min(100);

            let mut substeps = 0;
            while self.accumulator >= tick_ms && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.session, &input, tick_ms);
                self.accumulator -= tick_ms;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.release = false;
                self.input.target = None;
            }

            for event in self.session.drain_events() {
                match event {
                    GameEvent::Collision { platform, hits } => {
                        log::info!("Hit platform {platform} ({hits} hits)");
                    }
                    GameEvent::GameOver { score } => {
                        log::info!("Game over (raw score {score})");
                    }
                    other => log::trace!("{other:?}"),
                }
            }
        }

        fn finished(&self) -> bool {
            self.session.is_over() || self.session.time_ticks >= self.max_ticks
        }

        fn run(mut self) -> SessionSummary {
            while !self.finished() {
                self.update(FRAME_MS);
            }
            self.session.end()
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Square Dodge (headless) starting...");

        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(Path::new(&path)),
            None => Settings::default(),
        };

        let session = match Session::start(&settings) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not start session: {e}");
                std::process::exit(1);
            }
        };

        let summary = Game::new(session, settings.demo_max_ticks).run();
        log::info!(
            "Your score: {} ({} ticks, {:.1}s)",
            summary.display_score,
            summary.ticks,
            summary.time_ms as f64 / 1000.0
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the embedding page
}
