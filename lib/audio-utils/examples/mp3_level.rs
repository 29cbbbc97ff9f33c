use audio_utils::{audio, loader::load_audio_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().collect();
    let audio_path = if args.len() > 1 {
        args[1].clone()
    } else {
        "data/test.mp3".to_string()
    };

    log::info!("Loading audio file: {}", audio_path);

    let audio_config = load_audio_file(&audio_path)?;

    log::info!("  Sample Rate: {} Hz", audio_config.sample_rate);
    log::info!("  Channels:    {}", audio_config.channel);
    log::info!(
        "  Duration:    {:.2} seconds",
        audio_config.duration.as_secs_f64()
    );
    log::info!(
        "  RMS Level:   {:.2} dBFS",
        audio::linear_to_db(audio::rms(&audio_config.samples) as f64)
    );
    log::info!(
        "  Peak Level:  {:.2} dBFS",
        audio::linear_to_db(audio::peak(&audio_config.samples) as f64)
    );

    Ok(())
}
