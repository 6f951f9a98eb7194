#![no_std]
#![no_main]

mod board;

use core::cell::RefCell;

use bsp::entry;
use defmt::*;
use defmt_rtt as _;
use panic_probe as _;

// Provide an alias for our BSP so we can switch targets quickly.
use rp_pico as bsp;

use bsp::hal::{
    adc::AdcPin,
    clocks::init_clocks_and_plls,
    pac,
    pwm::Slices,
    watchdog::Watchdog,
    Adc, Sio, Timer,
};
use lcd1602_rs::LCD1602;
use plant_stand::actuators::{ActuatorDrivers, Indicator, LiftMotor, PwmTone};
use plant_stand::config::{BUZZER_TONE_HZ, MOTOR_FULL_SPEED};
use plant_stand::input::ButtonPins;
use plant_stand::sensors::{SensorReaders, Ultrasonic};
use plant_stand::PlantStand;

use board::{AdcChannel, BoardClock, LcdDisplay};

#[entry]
fn main() -> ! {
    info!("Plant stand starting");
    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure the clocks
    //
    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // The single-cycle I/O block controls our GPIO pins
    let sio = Sio::new(pac.SIO);

    // Set the pins up according to their function on this particular board
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // Set up LCD1602
    let lcd = LCD1602::new(
        pins.gpio1.into_function(),
        pins.gpio0.into_function(),
        pins.gpio2.into_function(),
        pins.gpio3.into_function(),
        pins.gpio4.into_function(),
        pins.gpio5.into_function(),
        timer,
    )
    .ok()
    .unwrap();

    // Set up buttons
    let buttons = ButtonPins::new(
        pins.gpio7.into_pull_down_input(),
        pins.gpio8.into_pull_down_input(),
        pins.gpio10.into_pull_down_input(),
        pins.gpio11.into_pull_down_input(),
    );

    // Set up analog sensors on the shared ADC
    let adc = RefCell::new(Adc::new(pac.ADC, &mut pac.RESETS));
    let temperature_pin = AdcPin::new(pins.gpio26.into_floating_input()).ok().unwrap();
    let light_pin = AdcPin::new(pins.gpio27.into_floating_input()).ok().unwrap();
    let soil_pin = AdcPin::new(pins.gpio28.into_floating_input()).ok().unwrap();

    // Set up ultrasonic ranger
    let ranger = Ultrasonic::new(
        pins.gpio20.into_push_pull_output(),
        pins.gpio21.into_pull_down_input(),
        timer,
        BoardClock::new(timer),
    );

    let sensors = SensorReaders::new(
        ranger,
        AdcChannel::new(&adc, temperature_pin),
        AdcChannel::new(&adc, light_pin),
        AdcChannel::new(&adc, soil_pin),
    );

    // Set up PWM
    let pwm_slices = Slices::new(pac.PWM, &mut pac.RESETS);

    // Buzzer: 125 MHz / 125 = 1 MHz count, wrapping at the alarm pitch
    let mut pwm3 = pwm_slices.pwm3;
    pwm3.set_div_int(125);
    pwm3.set_top((1_000_000 / BUZZER_TONE_HZ - 1) as u16);
    pwm3.enable();
    let mut buzzer = pwm3.channel_a;
    buzzer.output_to(pins.gpio6);

    // RGB indicator
    let mut pwm6 = pwm_slices.pwm6;
    pwm6.enable();
    let mut pwm7 = pwm_slices.pwm7;
    pwm7.enable();
    let mut red = pwm6.channel_a;
    red.output_to(pins.gpio12);
    let mut green = pwm6.channel_b;
    green.output_to(pins.gpio13);
    let mut blue = pwm7.channel_a;
    blue.output_to(pins.gpio14);

    // Lift motor speed
    let mut pwm1 = pwm_slices.pwm1;
    pwm1.enable();
    let mut motor_speed = pwm1.channel_a;
    motor_speed.output_to(pins.gpio18);

    let actuators = ActuatorDrivers::new(
        Indicator::new(red, green, blue),
        PwmTone::new(buzzer, BUZZER_TONE_HZ),
        pins.gpio15.into_push_pull_output(),
        LiftMotor::new(
            pins.gpio16.into_push_pull_output(),
            pins.gpio17.into_push_pull_output(),
            motor_speed,
            MOTOR_FULL_SPEED,
        ),
        pins.gpio19.into_push_pull_output(),
    );

    let mut stand = PlantStand::new(
        sensors,
        buttons,
        actuators,
        LcdDisplay::new(lcd),
        BoardClock::new(timer),
        timer,
    );

    info!("Plant stand ready");
    stand.run()
}
