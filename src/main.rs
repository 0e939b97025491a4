//! # Arcade Input
//!
//! Diagnostic front end for the input layer.
//!
//! Loads the engine configuration, starts the configured backend, prints
//! the device capability report and runs a few frames over a small demo
//! registry. Useful for checking that a backend driver initialises and
//! enumerates devices.

use anyhow::Result;
use tracing::{info, warn};

use arcade_input::backend::NullBackend;
use arcade_input::config::InputConfig;
use arcade_input::input::code::ControlCode;
use arcade_input::input::engine::InputEngine;
use arcade_input::input::registry::{
    GameInput, InputKind, InputRegistry, OutputCell, Representation, SliderState,
};

/// Frames processed by the demo loop.
const DEMO_FRAMES: u32 = 8;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("arcade-input v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => InputConfig::load(path)?,
        None => InputConfig::default(),
    };
    info!("backend '{}', analog speed {:#06x}", config.backend, config.analog_speed);

    if config.backend != "null" {
        warn!("no driver named '{}' is built in, using 'null'", config.backend);
    }

    let mut engine = InputEngine::from_config(&config);
    engine.set_backend(Box::new(NullBackend::new()));
    engine.start()?;
    engine.set_cooperative_level(config.exclusive_mouse, config.foreground_only)?;

    for line in engine.describe() {
        info!("{line}");
    }

    // A button and a slider, wired to throwaway game-side cells
    let mut registry = InputRegistry::new();
    let (button_out, button) = OutputCell::byte();
    registry.inputs.push(
        GameInput::new(
            InputKind::Switch { code: ControlCode::Key { keyboard: 0, scan: 0x1E } },
            Representation::Digital,
        )
        .with_output(button_out),
    );
    let (slider_out, slider) = OutputCell::word();
    registry.inputs.push(
        GameInput::new(
            InputKind::KeySlider {
                keys: [
                    ControlCode::Key { keyboard: 0, scan: 0x33 },
                    ControlCode::Key { keyboard: 0, scan: 0x34 },
                ],
                slider: SliderState::default(),
            },
            Representation::AnalogAbsolute,
        )
        .with_output(slider_out),
    );

    for frame in 0..DEMO_FRAMES {
        engine.run_frame(&mut registry, true)?;
        info!(
            "frame {frame}: button {:#04x} slider {:#06x}",
            button.get(),
            slider.get()
        );
    }

    engine.stop()?;
    info!("done");
    Ok(())
}
