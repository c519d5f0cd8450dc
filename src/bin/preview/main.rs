// backdrop-preview - Run the backdrops headless and write PNG frames
//
// Usage: cargo run --bin backdrop-preview -- ripple --frames 120 --every 30
//        cargo run --bin backdrop-preview -- orrery --width 1280 --height 720 --config scene.json
//
// RUST_LOG=debug shows init and sanitizing messages from the engine.

#[cfg(not(target_arch = "wasm32"))]
mod cli;
#[cfg(not(target_arch = "wasm32"))]
mod export;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cli::run(cli::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
