//! Radio Thermostat Host CLI
//!
//! Reads the room temperature from a Radio Thermostat on the local network.
//!
//! ## Usage
//!
//! ```bash
//! # Read once and print degrees Celsius
//! cargo run --bin tstat_host -- --host 192.168.1.20
//!
//! # Print a JSON measurement instead
//! cargo run --bin tstat_host -- --host 192.168.1.20 --json
//!
//! # Select the power mode before reading (sleep serves the cached value)
//! cargo run --bin tstat_host -- --host 192.168.1.20 --mode forced
//! ```

use envsense::adapters::radio_thermostat::INVALID_TEMP_C;
use envsense::{Mode, RadioThermostat, TemperatureSensor};

fn usage() {
    eprintln!("Usage: tstat_host --host <HOST> [--mode sleep|forced|normal] [--json]");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
        return Ok(());
    }

    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|idx| args.get(idx + 1))
            .cloned()
    };

    let host = match value_of("--host") {
        Some(host) => host,
        None => {
            eprintln!("Error: no thermostat host given");
            usage();
            return Err("No host given".into());
        }
    };

    let mode = match value_of("--mode") {
        Some(name) => match Mode::from_name(&name) {
            Some(mode) => mode,
            None => {
                eprintln!("Error: unknown mode '{}'", name);
                usage();
                return Err("Unknown mode".into());
            }
        },
        None => Mode::Normal,
    };

    let mut tstat = RadioThermostat::new(&host)?;
    tstat.set_mode(mode)?;

    let measurement = tstat.read_measurement()?;
    tstat.close();

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string(&measurement)?);
    } else if measurement.temperature_c == INVALID_TEMP_C {
        println!("{}: no valid reading", host);
    } else {
        println!("{}: {:.1} °C", host, measurement.temperature_c);
    }

    Ok(())
}
