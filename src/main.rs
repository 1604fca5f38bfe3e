//! Math Shark entry point
//!
//! The browser build is driven from the page through `platform::web::WebGame`.
//! Natively this runs a headless demo game on autopilot and logs its record.
//!
//! Usage: `math-shark [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use math_shark::driver::NullRenderer;
    use math_shark::record::{LogSink, RecordSink};
    use math_shark::sim::TickInput;
    use math_shark::{FrameDriver, FrameStatus, GameConfig, GameRecord, HighScores, platform};

    /// Records go to the log and the leaderboard
    struct Sinks {
        log: LogSink,
        high_scores: HighScores,
    }

    impl RecordSink for Sinks {
        fn submit(&mut self, record: &GameRecord) {
            self.log.submit(record);
            self.high_scores.submit(record);
        }
    }

    platform::init_logging();
    log::info!("Math Shark (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(std::path::Path::new(&path)),
        None => GameConfig::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(platform::clock_seed);

    let mut driver = FrameDriver::new(config, seed, None);
    let mut renderer = NullRenderer;
    let mut sinks = Sinks {
        log: LogSink,
        high_scores: HighScores::load(),
    };
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let frame_dt = 1.0 / math_shark::consts::FRAME_RATE as f32;
    while driver.frame(&input, frame_dt, &mut renderer, &mut sinks) != FrameStatus::Finished {}

    if let Some(record) = &driver.state.record {
        log::info!(
            "Finished: score {}, level {}, accuracy {}%, {}s",
            record.score,
            record.level_reached,
            record.accuracy_percent(),
            record.duration_seconds
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebGame, this is just to satisfy the compiler
}
