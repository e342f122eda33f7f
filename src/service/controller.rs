//! Command protocol engine
//!
//! Owns the sensor registry and the input line buffer. The firmware main
//! loop calls [`Controller::tick`] repeatedly; everything else here is
//! synchronous and bounded, so a tick never waits on anything.

use crate::config::{FirmwareConfig, LINE_CAPACITY};
use crate::domain::{RegistryError, SensorRegistry};
use crate::ports::{AnalogPort, Clock, CommunicationError, CommunicationPort};
use crate::protocol::command::{Command, NewArgs, SetArgs};
use crate::protocol::line_buffer::{LineBuffer, LineEvent};
use crate::protocol::response::{ErrorCode, Ready, Response};
use crate::service::reporter::report_due;
use crate::service::send;

/// Sensor bank state plus the protocol engine driving it
pub struct Controller {
    registry: SensorRegistry,
    input: LineBuffer<LINE_CAPACITY>,
    config: FirmwareConfig,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(FirmwareConfig::default())
    }
}

impl Controller {
    /// Create a controller with an empty registry
    pub fn new(config: FirmwareConfig) -> Self {
        Self {
            registry: SensorRegistry::new(),
            input: LineBuffer::new(),
            config,
        }
    }

    pub fn config(&self) -> &FirmwareConfig {
        &self.config
    }

    /// Read-only view of the registry
    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// Send the readiness line; call once at startup
    pub fn announce<C: CommunicationPort>(&self, serial: &mut C) -> Result<(), CommunicationError> {
        info!("sensor bank ready, {} slots", self.registry.capacity());
        send(serial, &Ready)
    }

    /// One scheduler iteration
    ///
    /// Drains every byte the transport has buffered, answering each
    /// completed line in arrival order, then runs one periodic report pass.
    pub fn tick<C, A, K>(&mut self, serial: &mut C, analog: &mut A, clock: &K) -> Result<(), CommunicationError>
    where
        C: CommunicationPort,
        A: AnalogPort,
        K: Clock,
    {
        while let Some(byte) = serial.poll_byte()? {
            if let Some(response) = self.receive(byte, analog, clock.now_ms()) {
                send(serial, &response)?;
            }
        }

        report_due(
            &mut self.registry,
            analog,
            serial,
            clock.now_ms(),
            self.config.samples_per_read,
        )?;
        Ok(())
    }

    /// Feed one input byte; returns the response to a line it completes
    pub fn receive<A: AnalogPort>(&mut self, byte: u8, analog: &mut A, now_ms: u32) -> Option<Response> {
        match self.input.push(byte)? {
            LineEvent::Overflow => {
                warn!("input line longer than {} bytes dropped", LINE_CAPACITY);
                Some(Response::error(ErrorCode::LineOverflow))
            }
            LineEvent::Line => {
                let parsed = Command::parse(self.input.line(), &self.config);
                self.input.clear();
                match parsed {
                    Ok(command) => self.execute(command, analog, now_ms),
                    Err(_) => {
                        debug!("malformed number rejected");
                        Some(Response::error(ErrorCode::BadNumber))
                    }
                }
            }
        }
    }

    /// Run one parsed command against the registry
    ///
    /// Returns `None` only for blank lines.
    pub fn execute<A: AnalogPort>(&mut self, command: Command, analog: &mut A, now_ms: u32) -> Option<Response> {
        let response = match command {
            Command::Blank => return None,
            Command::New(args) => self.create(args, now_ms),
            Command::Delete { id } => self.delete(id),
            Command::Set(args) => self.update(args, now_ms),
            Command::Read { id } => self.read(id, analog),
            Command::List => Response::listing(self.registry.iter()),
            Command::Unknown(word) => {
                debug!("unknown command {}", word.as_str());
                Response::error(ErrorCode::UnknownCommand)
            }
        };
        Some(response)
    }

    fn create(&mut self, args: NewArgs, now_ms: u32) -> Response {
        let Some(params) = args.to_params() else {
            return Response::error(ErrorCode::NeedIdAndPin);
        };
        let id = params.id;
        match self.registry.create(params, now_ms) {
            Ok(sensor) => {
                info!("sensor {} created on channel {}", id, sensor.channel);
                Response::Ok
            }
            Err(RegistryError::Duplicate) => {
                warn!("sensor {} already exists", id);
                Response::error(ErrorCode::ExistsOrFull)
            }
            Err(e) => {
                warn!("sensor {} not created: {:?}", id, e);
                Response::error(ErrorCode::ExistsOrFull)
            }
        }
    }

    fn delete(&mut self, id: Option<u8>) -> Response {
        match id.map(|id| self.registry.remove(id)) {
            Some(Ok(sensor)) => {
                info!("sensor {} removed", sensor.id());
                Response::Ok
            }
            _ => Response::error(ErrorCode::NoSuchId),
        }
    }

    fn update(&mut self, args: SetArgs, now_ms: u32) -> Response {
        let Some(sensor) = args.id.and_then(|id| self.registry.find_mut(id)) else {
            return Response::error(ErrorCode::NoSuchId);
        };
        sensor.apply(args.update, now_ms);
        info!("sensor {} updated", sensor.id());
        Response::Ok
    }

    fn read<A: AnalogPort>(&mut self, id: Option<u8>, analog: &mut A) -> Response {
        let Some(sensor) = id.and_then(|id| self.registry.find_mut(id)) else {
            return Response::error(ErrorCode::NoSuchId);
        };
        match sensor.read_temperature(analog, self.config.samples_per_read) {
            Ok(temperature) => Response::Reading {
                id: sensor.id(),
                name: sensor.name.clone(),
                temperature,
            },
            Err(e) => {
                warn!("sensor {}: analog read failed: {:?}", sensor.id(), e);
                Response::error(ErrorCode::ReadFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Calibration;
    use crate::testing::{FixedAnalog, ManualClock, ScriptedLink};

    struct Session {
        controller: Controller,
        serial: ScriptedLink,
        analog: FixedAnalog,
        clock: ManualClock,
    }

    impl Session {
        fn new() -> Self {
            Self::with_config(FirmwareConfig::default())
        }

        fn with_config(config: FirmwareConfig) -> Self {
            Self {
                controller: Controller::new(config),
                serial: ScriptedLink::new(),
                analog: FixedAnalog::new(0),
                clock: ManualClock::at(0),
            }
        }

        /// Send raw input, run one tick and collect the output lines
        fn feed(&mut self, input: &str) -> Vec<String> {
            self.serial.send(input);
            self.controller
                .tick(&mut self.serial, &mut self.analog, &self.clock)
                .unwrap();
            self.serial.take_lines()
        }

        /// Send one command line and return its single response
        fn command(&mut self, line: &str) -> String {
            let mut lines = self.feed(&format!("{line}\n"));
            assert_eq!(lines.len(), 1, "expected one line, got {lines:?}");
            lines.remove(0)
        }
    }

    const OK: &str = r#"{"ok":true}"#;

    #[test]
    fn test_announce_prints_ready() {
        let session = Session::new();
        let mut serial = ScriptedLink::new();
        session.controller.announce(&mut serial).unwrap();
        assert_eq!(serial.take_lines(), vec![r#"{"hello":"ready"}"#]);
    }

    #[test]
    fn test_new_stores_supplied_fields() {
        let mut s = Session::new();
        assert_eq!(
            s.command("NEW id=4 pin=A2 active=1 name=Tank t1=-10 q1=100 t2=90 q2=900"),
            OK
        );

        let sensor = s.controller.registry().find(4).unwrap();
        assert_eq!(sensor.channel, 16);
        assert!(sensor.active);
        assert_eq!(sensor.name.as_str(), "Tank");
        assert_eq!(*sensor.calibration(), Calibration::new(-10.0, 100, 90.0, 900));
    }

    #[test]
    fn test_new_uses_defaults() {
        let mut s = Session::new();
        assert_eq!(s.command("NEW id=1 pin=0"), OK);

        let sensor = s.controller.registry().find(1).unwrap();
        assert!(!sensor.active);
        assert_eq!(sensor.name.as_str(), "PT100");
        assert_eq!(*sensor.calibration(), Calibration::DEFAULT);
        assert_eq!(sensor.report_interval_ms(), 0);
    }

    #[test]
    fn test_new_requires_id_and_pin() {
        let mut s = Session::new();
        let need = r#"{"ok":false,"err":"need id&pin"}"#;
        assert_eq!(s.command("NEW id=1"), need);
        assert_eq!(s.command("NEW pin=A0"), need);
        assert!(s.controller.registry().is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut s = Session::new();
        assert_eq!(s.command("NEW id=1 pin=0"), OK);
        assert_eq!(
            s.command("NEW id=1 pin=3 name=Other"),
            r#"{"ok":false,"err":"exists_or_full"}"#
        );
        assert_eq!(s.controller.registry().find(1).unwrap().channel, 0);
    }

    #[test]
    fn test_ninth_sensor_rejected() {
        let mut s = Session::new();
        for id in 0..8 {
            assert_eq!(s.command(&format!("NEW id={id} pin=0")), OK);
        }
        assert_eq!(
            s.command("NEW id=8 pin=0"),
            r#"{"ok":false,"err":"exists_or_full"}"#
        );
        assert_eq!(s.controller.registry().len(), 8);
    }

    #[test]
    fn test_set_equal_raw_points_are_separated() {
        let mut s = Session::new();
        s.command("NEW id=1 pin=0");
        assert_eq!(s.command("SET id=1 q1=5 q2=5"), OK);
        let calibration = *s.controller.registry().find(1).unwrap().calibration();
        assert_eq!((calibration.q1(), calibration.q2()), (5, 6));
    }

    #[test]
    fn test_set_updates_only_supplied_fields() {
        let mut s = Session::new();
        s.command("NEW id=1 pin=A0 name=Room t1=5");
        assert_eq!(s.command("SET id=1 active=1 pin=A1"), OK);

        let sensor = s.controller.registry().find(1).unwrap();
        assert!(sensor.active);
        assert_eq!(sensor.channel, 15);
        assert_eq!(sensor.name.as_str(), "Room");
        assert_eq!(sensor.calibration().t1(), 5.0);
    }

    #[test]
    fn test_set_and_read_unknown_id() {
        let mut s = Session::new();
        let missing = r#"{"ok":false,"err":"no_such_id"}"#;
        assert_eq!(s.command("SET id=1 active=1"), missing);
        assert_eq!(s.command("READ id=1"), missing);
        assert_eq!(s.command("READ"), missing);
    }

    #[test]
    fn test_delete_frees_slot_for_new_id() {
        let mut s = Session::new();
        for id in 0..8 {
            s.command(&format!("NEW id={id} pin=0"));
        }
        assert_eq!(s.command("DEL id=3"), OK);
        assert!(s.controller.registry().find(3).is_none());
        assert_eq!(s.command("NEW id=42 pin=0"), OK);
        assert!(s.controller.registry().exists(42));
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut s = Session::new();
        assert_eq!(s.command("DEL id=7"), r#"{"ok":false,"err":"no_such_id"}"#);
        assert_eq!(s.command("DEL id=-1"), r#"{"ok":false,"err":"no_such_id"}"#);
    }

    #[test]
    fn test_list_empty_and_in_slot_order() {
        let mut s = Session::new();
        assert_eq!(s.command("LIST"), r#"{"s":[]}"#);

        s.command("NEW id=5 pin=1 active=1 name=B");
        s.command("NEW id=2 pin=0 name=A");
        assert_eq!(
            s.command("list"),
            r#"{"s":[{"id":5,"name":"B","pin":1,"active":1},{"id":2,"name":"A","pin":0,"active":0}]}"#
        );
    }

    #[test]
    fn test_read_at_q1_returns_t1() {
        let mut s = Session::new();
        s.command("NEW id=9 pin=A0 name=Test t1=0 q1=0 t2=100 q2=1023");
        assert_eq!(
            s.command("READ id=9"),
            r#"{"ok":true,"id":9,"name":"Test","t":0.00}"#
        );
        let last = s.controller.registry().find(9).unwrap().last_temp().unwrap();
        assert!(last.abs() < 1e-6);
        assert_eq!(s.analog.samples_taken, 63);
    }

    #[test]
    fn test_read_interpolates() {
        let mut s = Session::new();
        s.analog.set(14, 600);
        s.command("NEW id=1 pin=A0 t1=20 q1=200 t2=60 q2=1000");
        assert_eq!(
            s.command("READ id=1"),
            r#"{"ok":true,"id":1,"name":"PT100","t":40.00}"#
        );
    }

    #[test]
    fn test_read_failure_reported() {
        let mut s = Session::new();
        s.analog = FixedAnalog::new(0).failing();
        s.command("NEW id=1 pin=A0");
        assert_eq!(s.command("READ id=1"), r#"{"ok":false,"err":"read_failed"}"#);
    }

    #[test]
    fn test_unknown_command() {
        let mut s = Session::new();
        assert_eq!(s.command("RESET"), r#"{"ok":false,"err":"unknown_cmd"}"#);
        assert!(s.controller.registry().is_empty());
    }

    #[test]
    fn test_blank_lines_are_silent() {
        let mut s = Session::new();
        assert!(s.feed("\r\n  \n\t\r\n").is_empty());
    }

    #[test]
    fn test_overlong_line_reported_once() {
        let mut s = Session::new();
        let long = format!("NEW id=1 pin=0 name={}\n", "x".repeat(200));
        assert_eq!(s.feed(&long), vec![r#"{"ok":false,"err":"line_overflow"}"#]);
        assert!(s.controller.registry().is_empty());

        // The engine is ready for the next line
        assert_eq!(s.command("LIST"), r#"{"s":[]}"#);
    }

    #[test]
    fn test_line_at_capacity_is_accepted() {
        let mut s = Session::new();
        let mut line = String::from("NEW id=1 pin=0 ");
        while line.len() < LINE_CAPACITY {
            line.push('x');
        }
        assert_eq!(s.command(&line), OK);
        let overflowing = format!("{line}y");
        assert_eq!(
            s.command(&overflowing),
            r#"{"ok":false,"err":"line_overflow"}"#
        );
    }

    #[test]
    fn test_several_lines_in_one_tick() {
        let mut s = Session::new();
        let lines = s.feed("NEW id=1 pin=0\r\nNEW id=1 pin=0\r\nLIST\r\n");
        assert_eq!(
            lines,
            vec![
                OK,
                r#"{"ok":false,"err":"exists_or_full"}"#,
                r#"{"s":[{"id":1,"name":"PT100","pin":0,"active":0}]}"#,
            ]
        );
    }

    #[test]
    fn test_partial_line_waits_for_terminator() {
        let mut s = Session::new();
        assert!(s.feed("LI").is_empty());
        assert_eq!(s.feed("ST\n"), vec![r#"{"s":[]}"#]);
    }

    #[test]
    fn test_periodic_reports_follow_commands() {
        let mut s = Session::new();
        s.clock.set(10_000);
        let lines = s.feed("NEW id=1 pin=0 active=1 name=Room interval=1000\n");
        assert_eq!(lines, vec![OK, r#"{"id":1,"name":"Room","t":0.00}"#]);

        s.clock.advance(999);
        assert!(s.feed("").is_empty());
        s.clock.advance(1);
        assert_eq!(s.feed(""), vec![r#"{"id":1,"name":"Room","t":0.00}"#]);
    }

    #[test]
    fn test_clearing_interval_stops_reports() {
        let mut s = Session::new();
        s.feed("NEW id=1 pin=0 active=1 interval=100\n");
        assert_eq!(s.command("SET id=1 interval=0"), OK);
        s.clock.advance(100_000);
        assert!(s.feed("").is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_malformed_numbers() {
        let mut s = Session::with_config(FirmwareConfig::strict());
        assert_eq!(
            s.command("NEW id=one pin=0"),
            r#"{"ok":false,"err":"bad_number"}"#
        );
        assert!(s.controller.registry().is_empty());
        assert_eq!(s.command("NEW id=1 pin=A0"), OK);
    }

    #[test]
    fn test_lenient_mode_reads_garbage_as_zero() {
        let mut s = Session::new();
        assert_eq!(s.command("NEW id=one pin=0"), OK);
        assert!(s.controller.registry().exists(0));
    }

    #[test]
    fn test_list_of_control_character_names_in_one_tick() {
        let mut s = Session::new();
        let name = "\u{1}".repeat(20);
        let mut input = String::new();
        for id in 0..8 {
            input.push_str(&format!("NEW id={id} pin=0 name={name}\n"));
        }
        input.push_str("LIST\nREAD id=0\n");

        let lines = s.feed(&input);
        assert_eq!(lines.len(), 10, "{lines:?}");
        assert!(lines[..8].iter().all(|line| line == OK));

        let entry = format!(r#""name":"{}""#, "\\u0001".repeat(20));
        assert!(lines[8].starts_with(r#"{"s":[{"id":0,"#));
        assert_eq!(lines[8].matches(&entry).count(), 8);
        assert_eq!(lines[9], format!(r#"{{"ok":true,"id":0,{entry},"t":0.00}}"#));
    }

    #[test]
    fn test_write_failure_aborts_tick() {
        let mut s = Session::new();
        s.serial.send("LIST\nLIST\n");
        s.serial.broken = true;
        assert_eq!(
            s.controller.tick(&mut s.serial, &mut s.analog, &s.clock),
            Err(CommunicationError::WriteFailed)
        );
    }
}
