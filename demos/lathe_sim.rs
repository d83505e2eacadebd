//! Host-side lathe simulation.
//!
//! Runs the three contexts of the controller on threads:
//! - a "timer interrupt" thread ticking the step pulse generator,
//! - a "hall sensor" thread feeding spindle edges to the RPM estimator,
//! - the command loop executing text commands.
//!
//! Run with: `cargo run --example lathe_sim [config.toml]`

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use leadscrew::{
    load_config, Lathe, LatheConfig, MotionCommandBuilder, MotionController, RampSettings,
    Response, RpmEstimator, StepPulseGenerator,
};

static MOTION: MotionController = MotionController::new(RampSettings {
    start_delay: 1500,
    acceleration_step: 10,
    accel_update_interval: 2000,
});
static SPINDLE: RpmEstimator = RpmEstimator::new(6000);
static SPINDLE_RPM: AtomicU32 = AtomicU32::new(120);
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Mock output pin that does nothing.
struct MockPin;

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay provider backed by the OS scheduler.
struct SleepDelay;

impl embedded_hal::delay::DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }
}

fn main() -> leadscrew::Result<()> {
    println!("=== Electronic Lead Screw Simulation ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => LatheConfig::default(),
    };
    let screw = config.leadscrew_spec();
    println!(
        "{} axis: pitch {:.3} mm, {} steps/rev, {:.2} steps/mm",
        config.leadscrew.axis, screw.pitch, screw.steps_per_rev, screw.steps_per_mm
    );
    MOTION.set_start_delay(config.profile.start_delay_us);
    MOTION.set_acceleration_step(config.profile.acceleration_step_us);

    let start = Instant::now();
    let micros = move || start.elapsed().as_micros() as u32;
    let millis = move || start.elapsed().as_millis() as u32;

    let ticker = thread::spawn(move || {
        let mut generator = StepPulseGenerator::new(&MOTION, MockPin);
        while !SHUTDOWN.load(Ordering::Relaxed) {
            if generator.tick(micros()).is_err() {
                break;
            }
            thread::sleep(Duration::from_micros(20));
        }
    });

    let sensor = thread::spawn(move || {
        while !SHUTDOWN.load(Ordering::Relaxed) {
            let rpm = SPINDLE_RPM.load(Ordering::Relaxed).max(1);
            thread::sleep(Duration::from_millis(60_000 / rpm as u64));
            SPINDLE.on_edge(millis());
        }
    });

    let motion = MotionCommandBuilder::new()
        .from_config(&config)
        .dir_pin(MockPin)
        .delay(SleepDelay)
        .build(&MOTION)?;
    let mut lathe = Lathe::new(&config, motion, &SPINDLE);

    let script = [
        "pos",
        "travelrel 2",
        "feedratetime 300",
        "feedabs 0",
        "pos",
        "feedtype rot",
        "feedraterpm 0.5",
        "t",
        "feedrel 3",
        "rpm",
        "t",
        "pos",
        "bogus",
    ];

    for line in script {
        print!("> {:<18}", line);
        match lathe.execute_line(line) {
            Ok(Response::Position { steps, mm }) => {
                println!("position {} steps = {:.3} mm", steps.value(), mm.value())
            }
            Ok(Response::Rpm(rpm)) => println!("spindle {:.1} rpm", rpm.value()),
            Ok(Response::Threading(on)) => println!("threading {}", if on { "on" } else { "off" }),
            Ok(Response::Ack) => println!("ok"),
            Err(e) => println!("error: {}", e),
        }

        // Halfway through the threaded cut the spindle slows down.
        let mut slowed = false;
        while lathe.motion().is_moving() {
            if let Some(update) = lathe.poll(millis()) {
                println!(
                    "  sync: {:.1} rpm -> {:.1} steps/s{}",
                    update.rpm.value(),
                    update.steps_per_sec.value(),
                    if update.applied { "" } else { " (held)" }
                );
            }
            let snap = MOTION.snapshot();
            if lathe.is_threading() && !slowed && snap.remaining_steps < snap.total_steps / 2 {
                SPINDLE_RPM.store(80, Ordering::Relaxed);
                slowed = true;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    SHUTDOWN.store(true, Ordering::Relaxed);
    let _ = ticker.join();
    let _ = sensor.join();

    println!("\n=== Simulation Complete ===");
    Ok(())
}
