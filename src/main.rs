use clap::Parser;
use log::info;
use rayoptics::{
    console::{show_intro, Args},
    error::{RayOpticsError, RoResult},
    simulator::Simulator,
};

fn print_summary(simulator: &Simulator) {
    let stats = simulator.stats();
    println!("processed rays:          {}", stats.processed_rays());
    println!("recorded segments:       {}", simulator.segments().len());
    println!("truncated brightness:    {:.3e}", stats.truncation());
    println!(
        "undefined behavior:      {:.3e}",
        stats.undefined_behavior_brightness()
    );
    if stats.degenerate_rays() > 0 {
        println!("rejected rays:           {}", stats.degenerate_rays());
    }
    if let Some(warning) = simulator.scene().warning() {
        println!("\nWarning:\n{warning}");
    }
    if let Some(error) = simulator.scene().error() {
        println!("\nError:\n{error}");
    }
}

fn dump_segments(simulator: &Simulator) -> RoResult<()> {
    let yaml = serde_yaml::to_string(simulator.segments())
        .map_err(|e| RayOpticsError::Other(format!("serialization of segments failed: {e}")))?;
    print!("{yaml}");
    Ok(())
}

fn main() -> RoResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    //parse CLI arguments
    let args = Args::parse();
    if !args.dump_segments {
        show_intro();
    }
    let mut simulator = args.simulator()?;
    info!(
        "Simulating scene with {} objects",
        simulator.scene().objects().len()
    );
    simulator.run()?;
    if args.dump_segments {
        dump_segments(&simulator)
    } else {
        print_summary(&simulator);
        Ok(())
    }
}
