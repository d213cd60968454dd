//! The UART from the USB host bridge.

use defmt::warn;
use embedded_hal::serial::Read;
use sparkfun_pro_micro_rp2040::hal;
use sparkfun_pro_micro_rp2040::hal::uart::UartPeripheral;
use zx_keyboard::link::LinkDecoder;
use zx_keyboard::{KeyReport, KeyReportSource};

use crate::leds::STATUS;

pub struct UartLink<D, P>
    where D: hal::uart::UartDevice, P: hal::uart::ValidUartPinout<D>
{
    uart: UartPeripheral<hal::uart::Enabled, D, P>,
    decoder: LinkDecoder,
}

impl<D: hal::uart::UartDevice, P: hal::uart::ValidUartPinout<D>> UartLink<D, P> {
    pub fn new(uart: UartPeripheral<hal::uart::Enabled, D, P>) -> Self {
        UartLink {
            uart,
            decoder: LinkDecoder::new(),
        }
    }

    /// Feed everything waiting in the UART to the decoder.
    fn receive(&mut self) {
        while self.uart.uart_is_readable() {
            match self.uart.read() {
                Ok(byte) => {
                    self.decoder.push(byte);
                }
                Err(_) => warn!("Uart recv error"),
            }
        }
        STATUS.set_attached(self.decoder.is_attached());
    }
}

impl<D: hal::uart::UartDevice, P: hal::uart::ValidUartPinout<D>> KeyReportSource
    for UartLink<D, P>
{
    fn poll(&mut self) -> Option<KeyReport> {
        self.receive();
        self.decoder.poll()
    }
}
