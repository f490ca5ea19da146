use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use tessera::sim::{Driver, Input, SimConfig, TextRenderer};

const FRAMES: u32 = 120;
const FRAME_TIME: Duration = Duration::from_millis(33);

fn main() -> anyhow::Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    info!("Tessera v{}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path)?,
        None => demo_config(),
    };

    let mut driver = Driver::from_config(&config)?;
    let names: Vec<&str> = driver.library().names().collect();
    info!("rule sets: {}", names.join(", "));

    if driver.clock().is_paused() {
        debug!("config starts paused, resuming for the terminal run");
        driver.handle(Input::TogglePause)?;
    }

    run(&mut driver)
}

fn demo_config() -> SimConfig {
    SimConfig {
        viewport_width: 480,
        viewport_height: 192,
        speed: 0.1,
        start_paused: false,
        random_fill: true,
        ..Default::default()
    }
}

fn run(driver: &mut Driver) -> anyhow::Result<()> {
    let mut renderer = TextRenderer::new();
    let stdout = std::io::stdout();
    let mut last = Instant::now();

    for _ in 0..FRAMES {
        thread::sleep(FRAME_TIME);
        let now = Instant::now();
        driver.frame(now - last, &mut renderer);
        last = now;

        let mut out = stdout.lock();
        // Home the cursor so frames overwrite each other.
        write!(out, "\x1b[H\x1b[2J")?;
        renderer.write_to(&mut out)?;
        out.flush()?;
    }

    info!(
        "{} frames, {} generations",
        renderer.frames(),
        driver.automaton().generation()
    );
    Ok(())
}
