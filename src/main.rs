use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(version, about = "Decodes a BITS transmission and reports its version sum and value")]
struct Args {
    /// Input file, `day16.in` by default (`day16test<N>.in` with --test)
    input: Option<PathBuf>,

    /// Number of the example input to run instead of the real one
    #[arg(short, long)]
    test: Option<u32>,

    /// Only run this part
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1 ..= 2))]
    part: Option<u8>,

    /// Print the decoded packet tree
    #[arg(long)]
    dump: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {log::LevelFilter::Debug} else {log::LevelFilter::Info};
    env_logger::builder().filter_level(log_level).parse_default_env().init();

    let fname = args.input.unwrap_or_else(|| match args.test {
        Some(test) => format!("day16test{}.in", test).into(),
        None => "day16.in".into(),
    });
    debug!("reading {}", fname.display());
    let input = std::fs::read_to_string(&fname)
        .with_context(|| format!("cannot read {}", fname.display()))?;

    let time = Instant::now();
    let packet = aoc2021::parse(&input).context("cannot decode transmission")?;
    if args.dump {
        print!("{}", packet);
    }
    let parts = match args.part {
        Some(part) => vec![part],
        None => vec![1, 2],
    };
    for part in parts {
        println!("part {}: {}", part, aoc2021::solve(part, &packet)?);
    }
    info!("{} seconds elapsed", time.elapsed().as_secs_f32());
    Ok(())
}
