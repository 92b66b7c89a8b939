//! The NeoNetwork ROA tool.
//!
//! Reads the config database in the current directory and prints the
//! resulting ROA set as router config text or JSON.

use std::fs;
use std::path::Path;
use std::process::exit;
use clap::Parser;
use neoroa::resources::addr::AddressFamily;
use neoroa::roa::{Policy, RoaSet};


//------------ Args ----------------------------------------------------------

/// NeoNetwork ROA tool.
#[derive(Parser)]
#[command(name = "neoroa", version, about)]
struct Args {
    /// Set the IPv4 max prefix length.
    #[arg(
        short = 'm', long,
        default_value_t = 29,
        value_parser = clap::value_parser!(u8).range(0..=32),
    )]
    max: u8,

    /// Set the IPv6 max prefix length.
    #[arg(
        short = 'M', long,
        default_value_t = 64,
        value_parser = clap::value_parser!(u8).range(0..=128),
    )]
    max6: u8,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Write output to a file ('-' or nothing means stdout).
    #[arg(short = 'o', long, default_value = "")]
    output: String,

    /// Process the IPv4 route directory only.
    #[arg(short = '4', long = "ipv4")]
    ipv4: bool,

    /// Process the IPv6 route directory only.
    #[arg(short = '6', long = "ipv6")]
    ipv6: bool,
}

impl Args {
    /// Returns the address families to process, in output order.
    fn families(&self) -> &'static [AddressFamily] {
        if self.ipv4 {
            &[AddressFamily::Ipv4]
        }
        else if self.ipv6 {
            &[AddressFamily::Ipv6]
        }
        else {
            &[AddressFamily::Ipv4, AddressFamily::Ipv6]
        }
    }
}


//------------ main ----------------------------------------------------------

fn main() {
    let args = Args::parse();
    let policy = Policy { max_len4: args.max, max_len6: args.max6 };

    let roas = match RoaSet::generate(
        Path::new("."), args.families(), policy
    ) {
        Ok(roas) => roas,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    let output = if args.json {
        roas.to_json()
    }
    else {
        roas.to_text()
    };

    if args.output.is_empty() || args.output == "-" {
        println!("{}", output);
    }
    else if let Err(err) = fs::write(&args.output, &output) {
        eprintln!("failed to write '{}': {}", args.output, err);
        exit(1);
    }
    else {
        println!("written to {}", args.output);
    }
}


//============ Tests =========================================================
