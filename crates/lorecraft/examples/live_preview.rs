//! Simulates an editor feeding keystrokes into a generator with a refresh
//! timer, using synthetic glyphs so no game assets are needed.
//!
//! Run with: cargo run -p lorecraft --example live_preview

use std::sync::Arc;
use std::time::{Duration, Instant};

use lorecraft::prelude::*;
use lorecraft_test_utils::glyphs::fixture_reader;

fn main() {
    lorecraft::core::logging::init();

    let reader = Arc::new(fixture_reader(2, &[0], 6, 5));
    let mut generator = match pollster::block_on(Generator::builder().reader(reader).build()) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("Failed to set up generator: {}", err);
            return;
        }
    };

    let start = Instant::now();
    let typed = "&6&lPickaxe of Haste\n&7Efficiency V";
    let mut clock = start;
    for end in 1..=typed.len() {
        if !typed.is_char_boundary(end) {
            continue;
        }
        generator.set_text(&typed[..end]);
        clock += Duration::from_millis(150);

        match pollster::block_on(generator.refresh(clock)) {
            Ok(RenderOutcome::Rendered(stats)) => println!(
                "t={:>5}ms  {}x{}  lines={} draws={}{}",
                clock.duration_since(start).as_millis(),
                stats.size.width,
                stats.size.height,
                stats.lines_touched,
                stats.draws,
                if stats.full { " (full)" } else { "" }
            ),
            Ok(_) => {}
            Err(err) => eprintln!("Render failed: {}", err),
        }
    }

    // Flush whatever the timer has not picked up yet.
    if let Err(err) = pollster::block_on(generator.render()) {
        eprintln!("Render failed: {}", err);
    }
    println!(
        "Final image {}x{}, shown at {:?}",
        generator.frame().width(),
        generator.frame().height(),
        generator.display_size()
    );
}
