mod config;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};

use tempo_engine::clock::{
    AdjustableClock,
    Clock,
    FrameBasedClock,
    GameplayClock,
    GameplayClockConfig,
    GameplayClockController,
    RateAdjustment,
    SourceClockHandle,
    StopwatchClock,
};
use tempo_engine::core::{AppControl, FrameHost, FrameStableTime, TimingConsumer};
use tempo_engine::logging::{init_logging, LoggingConfig};

use config::StudioConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = StudioConfig::from_env().context("failed to read studio configuration")?;

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║          TEMPO STUDIO v0.1             ║");
    println!("  ║   headless gameplay clock session      ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let track = Rc::new(RefCell::new(StopwatchClock::new()));
    track
        .borrow_mut()
        .set_rate(config.practice_rate)
        .context("track rejected practice rate")?;

    let handle: SourceClockHandle = track.clone();
    let mut controller = GameplayClockController::new(
        handle,
        GameplayClockConfig {
            start_time: config.start_time,
            ..GameplayClockConfig::default()
        },
    );

    // The slowdown is a practice aid; scoring should still see the base rate.
    controller
        .non_gameplay_adjustments_mut()
        .add(RateAdjustment::new(config.practice_rate));

    controller.on_seek(|| log::info!("seek completed"));
    controller.on_paused_changed(|paused| log::info!("paused: {paused}"));

    let mut stable = FrameStableTime::new();
    let mut hud = |clock: &dyn GameplayClock| {
        log::trace!("hud {:.1}ms", clock.current_time());
        AppControl::Continue
    };

    let mut host = FrameHost::new();

    let seek_frame = config.frames / 4;
    let pause_frame = config.frames / 2;
    let resume_frame = pause_frame + config.frames / 8;

    controller.reset(None, true);

    for frame in 0..config.frames {
        match frame {
            f if f == seek_frame => controller.seek(config.seek_to),
            f if f == pause_frame => controller.stop(),
            f if f == resume_frame => controller.start(),
            _ => {}
        }

        let consumers: &mut [&mut dyn TimingConsumer] = &mut [&mut stable, &mut hud];
        if host.tick(&mut controller, consumers) == AppControl::Exit {
            break;
        }

        if frame % 30 == 0 {
            log::info!(
                "frame {frame:>4}  time {:>10.1}ms  elapsed {:>6.2}ms  fps {:>5.1}  rate {:.2} (true {:.2})  paused {}",
                controller.current_time(),
                stable.elapsed(),
                controller.frames_per_second(),
                controller.rate(),
                controller.true_gameplay_rate(),
                controller.is_paused(),
            );
        }

        std::thread::sleep(config.frame_interval);
    }

    println!();
    println!("  Session ended at {:.1}ms after {} frames.", controller.current_time(), stable.frames());
    println!();

    Ok(())
}
