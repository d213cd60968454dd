//! ZX Spectrum keyboard on a SparkFun Pro Micro RP2040.
//!
//! The bus edge interrupt answers the ULA from the published response table.  Everything else
//! happens in idle: reading reports from the USB host bridge, rebuilding the matrix, and driving
//! reset and the magic button.  The status LED runs as its own task.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use sparkfun_pro_micro_rp2040 as bsp;

mod board;
mod leds;
mod link;

#[rtic::app(
    device = crate::bsp::pac,
    dispatchers = [TIMER_IRQ_1],
)]
mod app {
    use crate::board::{self, AddressLines, AsmDelay, DataLines, InPin, OutPin};
    use crate::bsp;
    use crate::leds::{LedManager, StatusIndicator, STATUS};
    use crate::link::UartLink;
    use bsp::hal::clocks::init_clocks_and_plls;
    use bsp::hal::gpio::{self, bank0, DynPinId, FunctionPio0, FunctionUart, Pin, PinState, PullDown};
    use bsp::hal::pac::{PIO0, UART0};
    use bsp::hal::pio::{PIOExt, SM0};
    use bsp::hal::uart::{DataBits, StopBits, UartConfig, UartPeripheral};
    use bsp::hal::Clock;
    use bsp::hal::Sio;
    use bsp::{hal, XOSC_CRYSTAL_FREQ};
    use defmt::info;
    use fugit::RateExtU32;
    use rtic_monotonics::rp2040::ExtU64;
    use rtic_monotonics::rp2040::Timer;
    use rtic_monotonics::Monotonic;
    use ws2812_pio::Ws2812Direct;
    use zx_keyboard::bus::BusResponder;
    use zx_keyboard::link::LINK_BAUD;
    use zx_keyboard::magic::MagicButton;
    use zx_keyboard::response::ResponseTables;
    use zx_keyboard::{Controller, Mode};

    type UartPins = (
        Pin<bank0::Gpio0, FunctionUart, PullDown>,
        Pin<bank0::Gpio1, FunctionUart, PullDown>,
    );

    type Keyboard = Controller<'static, OutPin, StatusIndicator, InPin, OutPin, AsmDelay>;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        bus: BusResponder<'static, AddressLines, DataLines>,
        keyboard: Keyboard,
        link: UartLink<UART0, UartPins>,
        leds: LedManager<Ws2812Direct<PIO0, SM0, Pin<DynPinId, FunctionPio0, PullDown>>>,
    }

    #[init(local = [tables: ResponseTables = ResponseTables::new()])]
    fn init(mut ctx: init::Context) -> (Shared, Local) {
        // Going through rtic skips the rp2040 hal's spinlock workaround, and a debugger reset
        // can leave the spinlock held.
        unsafe {
            bsp::hal::sio::spinlock_reset();
        }

        info!("ZX keyboard {=str}", env!("CARGO_PKG_VERSION"));

        let rp2040_timer_token = rtic_monotonics::create_rp2040_monotonic_token!();
        Timer::start(ctx.device.TIMER, &mut ctx.device.RESETS, rp2040_timer_token);

        let mut watchdog = hal::Watchdog::new(ctx.device.WATCHDOG);

        let clocks = init_clocks_and_plls(
            XOSC_CRYSTAL_FREQ,
            ctx.device.XOSC,
            ctx.device.CLOCKS,
            ctx.device.PLL_SYS,
            ctx.device.PLL_USB,
            &mut ctx.device.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let sio = Sio::new(ctx.device.SIO);
        let pins = gpio::Pins::new(
            ctx.device.IO_BANK0,
            ctx.device.PADS_BANK0,
            sio.gpio_bank0,
            &mut ctx.device.RESETS,
        );

        let (publisher, reader) = ctx.local.tables.split();

        let bus = BusResponder::new(
            reader,
            AddressLines::new(board::address_pins!(pins)),
            DataLines::new(board::data_pins!(pins)),
        );

        let m1: InPin = pins.gpio20.into_pull_up_input().into_dyn_pin();
        let reset: OutPin = pins
            .gpio22
            .into_push_pull_output_in_state(PinState::High)
            .into_dyn_pin();
        let nmi: OutPin = pins
            .gpio23
            .into_push_pull_output_in_state(PinState::High)
            .into_dyn_pin();
        let magic = MagicButton::new(m1, nmi, AsmDelay);
        let keyboard = Controller::new(publisher, reset, StatusIndicator, magic);

        let uart_pins = (
            pins.gpio0.into_function::<FunctionUart>(),
            pins.gpio1.into_function::<FunctionUart>(),
        );
        let uart = UartPeripheral::new(ctx.device.UART0, uart_pins, &mut ctx.device.RESETS)
            .enable(
                UartConfig::new(LINK_BAUD.Hz(), DataBits::Eight, None, StopBits::One),
                clocks.peripheral_clock.freq(),
            )
            .unwrap();
        let link = UartLink::new(uart);

        let (mut pio, sm0, _, _, _) = ctx.device.PIO0.split(&mut ctx.device.RESETS);
        let ws = Ws2812Direct::new(
            pins.gpio25.into_function().into_dyn_pin(),
            &mut pio,
            sm0,
            clocks.peripheral_clock.freq(),
        );
        let leds = LedManager::new(ws);

        led_task::spawn().unwrap();

        info!("Waiting for keyboard");

        (
            Shared {},
            Local {
                bus,
                keyboard,
                link,
                leds,
            },
        )
    }

    /// The ULA changed the row selects.
    #[task(binds = IO_IRQ_BANK0, priority = 3, local = [bus])]
    fn bus_edge(ctx: bus_edge::Context) {
        ctx.local.bus.respond();
    }

    #[task(local = [leds])]
    async fn led_task(ctx: led_task::Context) {
        let mut next = Timer::now();
        loop {
            ctx.local.leds.set(STATUS.indication());
            ctx.local.leds.tick();
            next += 1.millis();
            Timer::delay_until(next).await;
        }
    }

    /// The poll loop.
    #[idle(local = [keyboard, link])]
    fn idle(ctx: idle::Context) -> ! {
        loop {
            ctx.local.keyboard.poll(ctx.local.link);
            STATUS.set_joystick(ctx.local.keyboard.mode() == Mode::Joystick);
        }
    }
}
