//! PT100 Sensor Bank Firmware (RP2040)
//!
//! Runs the sensor bank on a Raspberry Pi Pico: commands arrive on UART0
//! (GPIO0 TX, GPIO1 RX), PT100 front ends are wired to the ADC inputs on
//! GPIO26..=29, which answer to `A0..A3`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - Sensor / Calibration / ReportSchedule                         │
//! │  - SensorRegistry                                                │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - AnalogPort / CommunicationPort / Clock                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - RpAnalogInput: ADC on GPIO26..=29                             │
//! │  - SerialLink: BufferedUart on UART0                             │
//! │  - EmbassyClock: embassy-time uptime                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Build with `cargo run --release --features embedded --example pt100_firmware`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_rp::bind_interrupts;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use pt100::adapters::{EmbassyClock, RpAnalogInput, SerialLink};
use pt100::{Controller, FirmwareConfig};

// ============================================================================
// Configuration
// ============================================================================

/// UART receive buffer; holds several full command lines
const RX_BUFFER_SIZE: usize = 512;

/// UART transmit buffer; a full `LIST` reply fits
const TX_BUFFER_SIZE: usize = 1024;

/// Pause between scheduler ticks (milliseconds)
const TICK_MS: u64 = 1;

// ============================================================================
// Interrupt Bindings
// ============================================================================

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// ============================================================================
// Main Entry Point
// ============================================================================

#[embassy_executor::main]
async fn main(_spawner: embassy_executor::Spawner) {
    info!("=== PT100 Sensor Bank ===");

    let config = FirmwareConfig::default();
    let p = embassy_rp::init(Default::default());

    // Communication Adapter: UART0
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baud_rate;
    let uart = BufferedUart::new(
        p.UART0,
        Irqs,
        p.PIN_0,
        p.PIN_1,
        &mut tx_buffer,
        &mut rx_buffer,
        uart_config,
    );
    let mut serial = SerialLink::new(uart);
    info!("UART0 at {} baud", config.baud_rate);

    // Analog Adapter: ADC inputs A0..A3
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let inputs = [
        Some(AdcChannel::new_pin(p.PIN_26, Pull::None)),
        Some(AdcChannel::new_pin(p.PIN_27, Pull::None)),
        Some(AdcChannel::new_pin(p.PIN_28, Pull::None)),
        Some(AdcChannel::new_pin(p.PIN_29, Pull::None)),
    ];
    let mut analog = RpAnalogInput::new(adc, inputs, config.analog_base);

    let clock = EmbassyClock;
    let mut controller = Controller::new(config);

    if let Err(e) = controller.announce(&mut serial) {
        error!("Failed to send ready line: {:?}", e);
    }

    loop {
        if let Err(e) = controller.tick(&mut serial, &mut analog, &clock) {
            warn!("Serial link error: {:?}", e);
        }
        Timer::after_millis(TICK_MS).await;
    }
}
