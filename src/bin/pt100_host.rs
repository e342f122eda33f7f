//! PT100 Sensor Bank Host Shell
//!
//! This binary runs on your PC and provides an interactive shell to
//! manage the sensor bank over a serial port.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! cargo run --features std --bin pt100_host -- --list-ports
//!
//! # Connect to the first USB serial port
//! cargo run --features std --bin pt100_host
//!
//! # Connect to a specific port and log temperatures
//! cargo run --features std --bin pt100_host -- --port /dev/ttyACM0 --csv pt100_log.csv
//! ```
//!
//! ## Commands
//!
//! - `list` - Show all sensors
//! - `read <id>` - Read a sensor's temperature now
//! - `del <id>` - Delete a sensor
//! - `on <id>` / `off <id>` - Start or stop a sensor
//! - `interval <id> <ms>` - Set the periodic report interval (0 disables)
//! - `help` - Show help
//! - `exit` - Exit shell
//!
//! Anything else is sent to the device as-is, e.g.
//! `NEW id=1 pin=A0 name=Room active=1 interval=5000`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use pt100::config::DEFAULT_BAUD;
use pt100::host::console::describe;
use pt100::host::link::{find_usb_port, port_type_name, wait_ready};
use pt100::host::{DeviceSession, SampleSource, TemperatureLog};
use pt100::protocol::message::DeviceMessage;
use pt100::domain::SensorUpdate;
use pt100::Command;

/// Interactive shell for the PT100 sensor bank
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Serial port (default: first USB serial port)
    #[arg(long)]
    port: Option<String>,

    /// Baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    baud: u32,

    /// Append every received temperature to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.list_ports {
        list_ports();
        return Ok(());
    }

    let Some(port_name) = args.port.clone().or_else(find_usb_port) else {
        eprintln!("Error: No USB serial port found");
        eprintln!("Use --list-ports to see available ports");
        eprintln!("Or specify port with --port <PORT>");
        bail!("no device found");
    };

    // On Windows, COM ports >= 10 need the \\.\COMxx format
    #[cfg(target_os = "windows")]
    let port_name = if port_name.starts_with("COM") && !port_name.starts_with(r"\\") {
        format!(r"\\.\{}", port_name)
    } else {
        port_name
    };

    let csv = args
        .csv
        .as_ref()
        .map(TemperatureLog::open)
        .transpose()
        .context("cannot open CSV log")?;

    print!("Connecting to {} at {} baud...", port_name, args.baud);
    io::stdout().flush()?;
    let (mut session, messages) = DeviceSession::open(&port_name, args.baud)
        .with_context(|| format!("cannot open {}", port_name))?;
    println!(" opened!");

    println!("Waiting for device ready...");
    if wait_ready(&messages, Duration::from_secs(3)) {
        println!("Device ready!");
    } else {
        println!("Warning: Did not receive ready signal from device");
        println!("Proceeding anyway...");
    }

    let _printer = thread::Builder::new()
        .name("pt100-printer".into())
        .spawn(move || print_messages(messages, csv))?;

    println!("\nPT100 Sensor Bank Shell");
    println!("Type 'help' for commands, 'exit' to quit\n");

    let stdin = io::stdin();
    for input in stdin.lock().lines() {
        let input = input?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }
        if input == "help" {
            print_help();
            continue;
        }

        match shell_line(input) {
            Ok(line) => session.send_line(&line).context("write to device failed")?,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Turn shell input into a protocol line
fn shell_line(input: &str) -> Result<String, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let id = || -> Result<u8, String> {
        parts
            .get(1)
            .ok_or_else(|| format!("Usage: {} <id>", parts[0]))?
            .parse::<u8>()
            .map_err(|_| "Invalid id (must be 0-255)".to_string())
    };

    let update = |changes: SensorUpdate| -> Result<Command, String> { Ok(Command::set(id()?, changes)) };

    let command = match parts[0] {
        "list" => Command::list(),
        "read" => Command::read(id()?),
        "del" | "delete" => Command::delete(id()?),
        "on" | "off" => update(SensorUpdate {
            active: Some(parts[0] == "on"),
            ..Default::default()
        })?,
        "interval" => {
            let ms = parts
                .get(2)
                .ok_or("Usage: interval <id> <ms>")?
                .parse::<u32>()
                .map_err(|_| "Invalid interval (milliseconds, 0 disables)".to_string())?;
            update(SensorUpdate {
                interval_ms: Some(ms),
                ..Default::default()
            })?
        }
        _ => return Ok(input.to_string()),
    };
    Ok(command.to_string())
}

fn print_messages(messages: Receiver<DeviceMessage>, mut csv: Option<TemperatureLog>) {
    for message in messages {
        println!("{}", describe(&message));

        if let (Some(csv_log), Some((id, name, t, periodic))) = (csv.as_mut(), message.temperature()) {
            if let Err(e) = csv_log.record(id, name, t, SampleSource::from_periodic(periodic)) {
                log::error!("CSV write to {} failed: {}", csv_log.path().display(), e);
            }
        }
    }
    println!("Device disconnected");
}

fn list_ports() {
    println!("Available serial ports:");
    match serialport::available_ports() {
        Ok(ports) => {
            if ports.is_empty() {
                println!("  (none)");
            }
            for port in ports {
                print!("  {}", port.port_name);
                match &port.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        println!(" - USB (VID: 0x{:04x}, PID: 0x{:04x})", info.vid, info.pid);
                        if let Some(ref product) = info.product {
                            println!("      Product: {}", product);
                        }
                    }
                    other => println!(" - {}", port_type_name(other)),
                }
            }
        }
        Err(e) => {
            eprintln!("Error listing ports: {}", e);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list                 Show all sensors");
    println!("  read <id>            Read a sensor's temperature now");
    println!("  del <id>             Delete a sensor");
    println!("  on <id> / off <id>   Start or stop a sensor");
    println!("  interval <id> <ms>   Set the report interval (0 disables)");
    println!("  help                 Show this help");
    println!("  exit                 Exit shell");
    println!();
    println!("Anything else is sent to the device unchanged:");
    println!("  NEW id=1 pin=A0 name=Room t1=0 q1=0 t2=100 q2=1023 interval=5000");
    println!("  SET id=1 active=1");
    println!("  DEL id=1");
}
