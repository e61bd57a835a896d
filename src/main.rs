//! CLI entry point: one capture → transcribe → translate pass per
//! invocation, printing the structured command to stdout.

use anyhow::{anyhow, Result};
use voicepilot::audio::MicSource;
use voicepilot::config::AppConfig;
use voicepilot::translator::HttpTranslator;
use voicepilot::{init_logging, log_debug, pipeline, stt};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(config.logs);

    if config.list_input_devices {
        match MicSource::list_devices() {
            Ok(names) if names.is_empty() => println!("No audio input devices detected."),
            Ok(names) => {
                println!("Detected audio input devices:");
                for name in names {
                    println!("  {name}");
                }
            }
            Err(err) => println!("Failed to list audio input devices: {err}"),
        }
        return Ok(());
    }

    let model_path = config
        .whisper_model_path
        .as_deref()
        .ok_or_else(|| anyhow!("--whisper-model-path is required"))?;
    stt::init_model(model_path, config.decode_options())?;

    let translator = HttpTranslator::new(
        config
            .translator_url
            .clone()
            .ok_or_else(|| anyhow!("--translator-url is required"))?,
        config.translator_model.clone(),
        config
            .translator_key
            .clone()
            .ok_or_else(|| anyhow!("--translator-key is required"))?,
    );

    let mut source = MicSource::new(config.input_device.as_deref())?;
    log_debug(&format!("recording from '{}'", source.device_name()));
    eprintln!(
        "Recording for {}s from '{}'...",
        config.seconds,
        source.device_name()
    );

    let model = stt::model()?
        .lock()
        .map_err(|_| anyhow!("speech model lock poisoned"))?;
    let command = pipeline::run_once(&mut source, &config.pipeline_config(), &*model, &translator)?;

    println!("{command}");
    Ok(())
}
