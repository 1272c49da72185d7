#![no_std]
#![no_main]

use cyw43::Control;
use cyw43_pio::{PioSpi, RM2_CLOCK_DIVIDER};
use defmt::unwrap;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_net::dns::DnsQueryType;
use embassy_net::{Config, IpAddress, Stack, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use panic_persist as _;
use static_cell::StaticCell;

use respeaker_board::credentials::Credentials;
use respeaker_board::net::{Host, Ipv4Addr, ServerEndpoint, DEFAULT_SERVER_PORT};
use respeaker_board::board_log;

const JOIN_RETRY: Duration = Duration::from_secs(5);

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"respeaker-board"),
    embassy_rp::binary_info::rp_program_description!(
        c"WiFi bring-up for a data ingestion board"
    ),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

#[cfg(feature = "usb-logger")]
bind_interrupts!(struct UsbIrqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<embassy_rp::peripherals::USB>;
});

/// Radio controller shared between the join loop and the status LED.
#[derive(Clone, Copy)]
pub struct SharedControl(&'static Mutex<CriticalSectionRawMutex, Control<'static>>);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    #[cfg(feature = "usb-logger")]
    {
        let driver = embassy_rp::usb::Driver::new(p.USB, UsbIrqs);
        spawner.must_spawn(logger_task(driver));
    }

    if let Some(panic_message) = panic_persist::get_panic_message_utf8() {
        board_log!(error, "Previous run panicked: {}", panic_message);
    }

    let credentials = Credentials::BUILT_IN;
    credentials.log_summary();

    if let Err(e) = credentials.validate() {
        board_log!(error, "Invalid credentials ({}): {:?}", e.field().key(), e);
        halt().await;
    }

    // Firmware files for the CYW43xxx WiFi chip
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        RM2_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;

    spawner.must_spawn(cyw43_task(runner));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let config = Config::dhcpv4(Default::default());
    let seed: u64 = RoscRng.next_u64();

    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::new()),
        seed,
    );

    unwrap!(spawner.spawn(net_task(runner)));

    let shared_control = SharedControl(&*{
        static CONTROL: StaticCell<Mutex<CriticalSectionRawMutex, Control<'static>>> =
            StaticCell::new();
        CONTROL.init(Mutex::new(control))
    });

    spawner.must_spawn(blink_task(shared_control));

    join_network(shared_control, &credentials).await;

    board_log!(info, "Waiting for DHCP...");
    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        board_log!(info, "IP Address: {}", config.address);
    }

    // validate() already accepted the host
    let Ok(endpoint) = credentials.endpoint(DEFAULT_SERVER_PORT) else {
        halt().await
    };

    match resolve(stack, endpoint).await {
        Some(addr) => board_log!(info, "Server {} reachable at {}:{}", endpoint, addr, endpoint.port),
        None => board_log!(warn, "Could not resolve {}", endpoint),
    }

    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}

/// Join the configured network, retrying until the access point accepts us.
async fn join_network(shared_control: SharedControl, credentials: &Credentials<'static>) {
    board_log!(info, "Connecting to WiFi network: {}", credentials.ssid());

    loop {
        {
            let mut control = shared_control.0.lock().await;
            let options = if credentials.is_open_network() {
                cyw43::JoinOptions::new_open()
            } else {
                cyw43::JoinOptions::new(credentials.password().as_bytes())
            };
            match control.join(credentials.ssid(), options).await {
                Ok(()) => {
                    board_log!(info, "WiFi connected");
                    return;
                }
                Err(e) => {
                    board_log!(error, "WiFi join failed: status={}, retrying in 5s", e.status);
                }
            }
        }
        Timer::after(JOIN_RETRY).await;
    }
}

/// Look up the server address, using DNS only for hostnames.
async fn resolve(stack: Stack<'static>, endpoint: ServerEndpoint<'static>) -> Option<Ipv4Addr> {
    match endpoint.host {
        Host::Ip(addr) => Some(addr),
        Host::Name(name) => {
            let addrs = stack.dns_query(name, DnsQueryType::A).await.ok()?;
            addrs.iter().find_map(|addr| match addr {
                IpAddress::Ipv4(v4) => Some(Ipv4Addr::from(v4.octets())),
                #[allow(unreachable_patterns, reason = "IPv6 only exists with the proto-ipv6 feature")]
                _ => None,
            })
        }
    }
}

async fn halt() -> ! {
    loop {
        Timer::after_secs(5).await;
    }
}

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

#[cfg(feature = "usb-logger")]
#[embassy_executor::task]
async fn logger_task(driver: embassy_rp::usb::Driver<'static, embassy_rp::peripherals::USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver);
}

#[embassy_executor::task]
async fn blink_task(shared_control: SharedControl) {
    let delay = Duration::from_millis(500);
    loop {
        shared_control.0.lock().await.gpio_set(0, true).await;
        Timer::after(delay).await;
        shared_control.0.lock().await.gpio_set(0, false).await;
        Timer::after(delay).await;
    }
}
