//! Physics Lab entry point
//!
//! The browser build is driven from the page through `WasmLab`. Natively this
//! runs a simulation headless for a few seconds and prints what it did.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Physics Lab (native) starting...");

    let mut args = std::env::args().skip(1);
    let kind = args.next().unwrap_or_else(|| "maze".to_string());
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5.0);

    if let Err(e) = run_headless(&kind, seconds) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `physics_lab::web::start`, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(kind: &str, seconds: f32) -> physics_lab::Result<()> {
    use physics_lab::render::CommandList;
    use physics_lab::{Lab, LabSettings, Simulation as _};

    const FRAME_DT: f32 = 1.0 / 60.0;

    let settings = LabSettings::load();
    let mut lab = Lab::from_name(kind, settings)?;
    let mut surface = CommandList::new(800.0, 600.0);

    let frames = (seconds / FRAME_DT).ceil() as u32;
    let mut substeps = 0;
    for _ in 0..frames {
        surface.clear_commands();
        substeps += lab.frame(FRAME_DT, &mut surface);
        if lab.simulation().is_finished() {
            break;
        }
    }

    println!(
        "{}: {} frames, {} substeps, {:.2} s simulated",
        lab.kind().as_str(),
        lab.frames(),
        substeps,
        lab.clock().elapsed()
    );
    for line in lab.simulation().status() {
        println!("  {line}");
    }
    println!("  last frame: {} draw commands", surface.len());
    Ok(())
}
