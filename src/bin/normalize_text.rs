use anyhow::{Context, Result};
use foodfacets::normalize::{normalize, split_segments};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    // Descriptions come from the arguments, or one per stdin line
    let args: Vec<String> = env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            print_normalized(&mut out, &line)?;
        }
    } else {
        for arg in &args {
            print_normalized(&mut out, arg)?;
        }
    }
    Ok(())
}

fn print_normalized(out: &mut impl Write, description: &str) -> Result<()> {
    let (name, modifiers) = split_segments(&normalize(description));
    writeln!(out, "{}\t{}", name, modifiers.join(","))?;
    Ok(())
}
