use clap::{Args, Parser, Subcommand, ValueEnum};
use flagsim_core::{run_simulation, FamilySettings, FlagConfig, IntegrationRule, SceneConfig};
use glam::Vec3;
use tracing::info;
use tracing::level_filters::LevelFilter;

mod view_app;

#[derive(Parser)]
#[command(name = "flagsim")]
#[command(about = "flagsim - A mass-spring flag simulator", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the flag headless for a number of ticks and print probe values
    Run {
        #[command(flatten)]
        physics: PhysicsArgs,

        /// Number of physics ticks to run
        #[arg(long, default_value_t = 1000)]
        steps: u32,
    },
    /// Open an interactive window showing the flag
    View {
        #[command(flatten)]
        physics: PhysicsArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Integrator {
    Verlet,
    Euler,
}

impl From<Integrator> for IntegrationRule {
    fn from(value: Integrator) -> Self {
        match value {
            Integrator::Verlet => IntegrationRule::Verlet,
            Integrator::Euler => IntegrationRule::ExplicitEuler,
        }
    }
}

#[derive(Args, Clone)]
struct PhysicsArgs {
    #[arg(long, default_value_t = 12.0)]
    width: f32,
    #[arg(long, default_value_t = 8.0)]
    height: f32,
    #[arg(long, default_value_t = 24)]
    width_segments: usize,
    #[arg(long, default_value_t = 16)]
    height_segments: usize,
    #[arg(long, default_value_t = 1.0)]
    mass: f32,
    #[arg(long, default_value_t = 0.1)]
    stiffness: f32,
    #[arg(long, default_value_t = 0.05)]
    viscosity: f32,
    /// Physics ticks per second
    #[arg(long, default_value_t = 100.0)]
    tick_rate: f32,
    /// Fraction of velocity removed from free particles each tick
    #[arg(long, default_value_t = 0.0)]
    damping: f32,
    #[arg(long, value_enum, default_value_t = Integrator::Verlet)]
    integrator: Integrator,
    #[arg(long)]
    no_wind: bool,
    #[arg(long)]
    no_gravity: bool,
    #[arg(long)]
    no_shear: bool,
    #[arg(long)]
    no_bend: bool,
}

impl PhysicsArgs {
    fn flag_config(&self) -> FlagConfig {
        // the flag hangs from the top half of a pole twice its height
        FlagConfig::new()
            .with_origin(Vec3::new(0.0, self.height, 0.0))
            .with_size(self.width, self.height)
            .with_segments(self.width_segments, self.height_segments)
            .with_mass(self.mass)
            .with_stiffness(self.stiffness)
            .with_viscosity(self.viscosity)
            .with_tick_rate(self.tick_rate)
            .with_damping(self.damping)
            .with_integration(self.integrator.into())
            .with_shear(FamilySettings {
                enabled: !self.no_shear,
                ..Default::default()
            })
            .with_bend(FamilySettings {
                enabled: !self.no_bend,
                ..Default::default()
            })
    }

    fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            wind_enabled: !self.no_wind,
            gravity_enabled: !self.no_gravity,
            ..Default::default()
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { physics, steps } => run_headless(&physics, steps),
        Commands::View { physics } => run_viewer(physics),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_headless(physics: &PhysicsArgs, steps: u32) -> Result<(), Box<dyn std::error::Error>> {
    info!(steps, "running headless");
    let result = run_simulation(physics.flag_config(), physics.scene_config(), steps)?;

    println!("steps = {}", result.steps);
    for probe in result.probes {
        println!("{} = {}", probe.name, probe.value);
    }

    Ok(())
}

fn run_viewer(physics: PhysicsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let app = view_app::ViewApp::new(physics.flag_config(), physics.scene_config())?;
    let options = eframe::NativeOptions::default();
    eframe::run_native("flagsim", options, Box::new(|_cc| Ok(Box::new(app))))?;
    Ok(())
}
