//! Serial session with the sensor bank
//!
//! A background thread reads the port, splits the stream into lines and
//! forwards each decoded [`DeviceMessage`] over a channel, so unsolicited
//! reports are seen as soon as they arrive.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serialport::{SerialPort, SerialPortType};

use crate::protocol::message::DeviceMessage;

/// Read timeout of the port; bounds how long the reader takes to stop
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Open connection to a device
pub struct DeviceSession {
    port: Box<dyn SerialPort>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl DeviceSession {
    /// Open `port_name` and start the reader thread
    ///
    /// DTR and RTS are held low so boards that reset on DTR keep running.
    pub fn open(port_name: &str, baud: u32) -> Result<(Self, Receiver<DeviceMessage>), serialport::Error> {
        let mut port = serialport::new(port_name, baud)
            .timeout(READ_TIMEOUT)
            .flow_control(serialport::FlowControl::None)
            .open()?;
        port.write_data_terminal_ready(false)?;
        port.write_request_to_send(false)?;

        let reader_port = port.try_clone()?;
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let reader_stop = Arc::clone(&stop);
        let reader = thread::Builder::new()
            .name("pt100-reader".into())
            .spawn(move || read_lines(reader_port, &tx, &reader_stop))?;

        log::info!("connected to {} at {} baud", port_name, baud);
        Ok((
            Self {
                port,
                stop,
                reader: Some(reader),
            },
            rx,
        ))
    }

    /// Send one protocol line (surrounding whitespace is trimmed)
    pub fn send_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim();
        log::debug!("> {}", line);
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

/// Wait up to `timeout` for the readiness line
///
/// Other messages received meanwhile are discarded.
pub fn wait_ready(rx: &Receiver<DeviceMessage>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(message) if message.is_ready() => return true,
            Ok(message) => log::debug!("ignored before ready: {:?}", message),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
        }
    }
}

/// Split a byte stream into lines and forward them decoded
///
/// Returns when `stop` is set, the stream ends, the receiver is gone or a
/// read fails with anything but a timeout.
pub fn read_lines<R: Read>(mut reader: R, tx: &Sender<DeviceMessage>, stop: &AtomicBool) {
    let mut pending: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 256];

    while !stop.load(Ordering::Relaxed) {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => continue,
            Err(e) => {
                log::error!("serial read failed: {}", e);
                break;
            }
        };
        pending.extend_from_slice(&chunk[..n]);

        while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            log::debug!("< {}", line);
            if tx.send(DeviceMessage::decode(line)).is_err() {
                return;
            }
        }
    }
}

/// First USB serial port, if any
pub fn find_usb_port() -> Option<String> {
    serialport::available_ports()
        .ok()?
        .into_iter()
        .find(|port| matches!(port.port_type, SerialPortType::UsbPort(_)))
        .map(|port| port.port_name)
}

/// Human-readable name of a port type
pub fn port_type_name(port_type: &SerialPortType) -> &'static str {
    match port_type {
        SerialPortType::UsbPort(_) => "USB",
        SerialPortType::BluetoothPort => "Bluetooth",
        SerialPortType::PciPort => "PCI",
        SerialPortType::Unknown => "Unknown",
    }
}
