use audio_utils::Mp3Codec;
use mp3_gain::{BatchConfig, BatchGainApplier, prompt};
use std::{io, process::ExitCode};

fn main() -> ExitCode {
    mp3_gain::init_logger();

    let gain = match prompt::read_gain(&mut io::stdin().lock(), &mut io::stdout()) {
        Ok(gain) => gain,
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let work_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::error!("get current directory failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let applier = BatchGainApplier::new(work_dir, Mp3Codec::default(), BatchConfig::default());
    if let Err(e) = applier.run(gain, &mut io::stdout().lock()) {
        log::error!("batch failed: {e:?}");
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
