//! Batch loudness adjuster for MP3 files.
//!
//! Reads a decibel offset, applies it to every `*.mp3` file of a working
//! directory and writes the re-encoded files to `output/`.

pub mod batch;
pub mod config;
pub mod gain;
pub mod prompt;

pub use batch::{BatchGainApplier, BatchReport, FileOutcome};
pub use config::BatchConfig;
pub use gain::{Gain, GainParseError};

/// Logs go to stderr so the per-file report on stdout stays clean.
/// The level is taken from `RUST_LOG` and defaults to `warn`.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
