mod monsters;
mod png;
mod scene;

use clap::{Parser, Subcommand};
use duskforge_render::{RenderConfig, RenderInstance};
use duskforge_render_gl::ContextAttributes;
use duskforge_render_soft::SoftRenderInstance;
use duskforge_world::MonsterTable;
use monsters::SimulationArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duskforge-cli", about = "CLI tool for duskforge operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version, backend info and render settings
    Info,
    /// Render the demo frame offscreen and save it as a PNG
    Render {
        #[arg(long, default_value = "320")]
        width: u32,
        #[arg(long, default_value = "240")]
        height: u32,
        /// Output PNG path
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
        /// Number of instanced markers to draw
        #[arg(short, long, default_value = "16")]
        instances: usize,
    },
    /// Spawn and kill random monsters, reporting drops and experience
    Monsters {
        /// Monster table JSON; the built-in table when omitted
        #[arg(long)]
        table: Option<PathBuf>,
        /// Directory of PNG sprite strips; generated placeholders when omitted
        #[arg(long)]
        sprites: Option<PathBuf>,
        #[arg(short, long, default_value = "10")]
        count: usize,
        /// RNG seed for deterministic replay
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(short, long, default_value = "1")]
        dungeon_level: i32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = RenderConfig::from_env();
            let soft = SoftRenderInstance::new(1, 1, &config);
            let info = soft.backend_info();
            let gl = ContextAttributes::core(config.debug_graphics);

            println!("duskforge-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", duskforge_render::crate_info());
            println!(
                "backend: {} {} ({})",
                info.name, info.version, info.renderer
            );
            println!(
                "opengl: requests {}.{} core={} double_buffered={} debug={}",
                gl.major, gl.minor, gl.core_profile, gl.double_buffered, gl.debug
            );
            println!(
                "config: vsync={} debug_graphics={} swap_interval={:?}",
                config.vsync,
                config.debug_graphics,
                config.swap_interval()
            );
        }
        Commands::Render {
            width,
            height,
            output,
            instances,
        } => {
            anyhow::ensure!(width > 0 && height > 0, "render size must be non-zero");
            let instance = SoftRenderInstance::new(width, height, &RenderConfig::from_env());
            scene::draw_frame(&instance, instances);

            let stats = instance.stats();
            png::write_png(&output, width, height, instance.front_buffer().to_rgba8())?;
            println!(
                "Rendered {width}x{height}: draws={}, triangles={}, pixels={} -> {}",
                stats.draw_calls,
                stats.triangles,
                stats.pixels_written,
                output.display()
            );
        }
        Commands::Monsters {
            table,
            sprites,
            count,
            seed,
            dungeon_level,
        } => {
            let table = match table {
                Some(path) => MonsterTable::load(&path)?,
                None => monsters::default_table()?,
            };
            let items = monsters::default_items()?;
            let args = SimulationArgs {
                count,
                seed,
                dungeon_level,
            };
            println!("Monster simulation: seed={seed}, count={count}, dungeon_level={dungeon_level}");

            let summary = match sprites {
                Some(root) => monsters::simulate(png::PngStripDecoder::new(root), &table, &items, args)?,
                None => monsters::simulate(monsters::generated_sprites(&table), &table, &items, args)?,
            };
            println!(
                "Spawned {}, killed {}, sprite textures {}",
                summary.spawned, summary.killed, summary.sprite_textures
            );
            println!(
                "Drops: gold={}, items=[{}]",
                summary.gold_drops,
                summary.items.join(", ")
            );
            println!("Experience: {}", summary.experience);
            println!(
                "Tick {}, hash={:#x}, replay: {}",
                summary.final_tick,
                summary.state_hash,
                if summary.replay_matches { "OK" } else { "MISMATCH" }
            );
        }
    }

    Ok(())
}
