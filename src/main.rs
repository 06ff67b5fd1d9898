//! Anchor Back entry point
//!
//! On the web this installs back navigation into the page. Natively it
//! replays a navigation script from stdin so tracker behaviour can be
//! inspected without a browser:
//!
//! ```text
//! init #intro
//! record #intro #api
//! back
//! teardown
//! ```
//!
//! `-` stands for the top of the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();

    // Logger first, so a bad config element is reported
    if let Err(e) = console_log::init_with_level(log::Level::Trace) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::set_max_level(log::LevelFilter::Info);

    let settings = anchor_back::Settings::load();
    log::set_max_level(settings.level_filter());

    log::info!("Anchor Back starting...");
    if let Err(e) = anchor_back::web::install(settings) {
        log::error!("Failed to install back navigation: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::BufRead;

    use anchor_back::{Hash, HashNavigationTracker, Settings};

    env_logger::init();

    let settings = Settings::load();
    let mut tracker = HashNavigationTracker::new(settings.max_entries)
        .with_listener(|visible: bool| log::info!("Back button {}", if visible { "shown" } else { "hidden" }));
    tracker.initialize(&Hash::top());

    let parse = |token: &str| {
        if token == "-" {
            Hash::top()
        } else {
            Hash::new(token)
        }
    };

    let stdin = std::io::stdin();
    for (n, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["init"] => tracker.initialize(&Hash::top()),
            ["init", hash] => tracker.initialize(&parse(*hash)),
            ["record", from, to] => {
                let outcome = tracker.record_navigation(&parse(*from), &parse(*to));
                println!("{:?}", outcome);
            }
            ["back"] => match tracker.go_back() {
                Some(target) => println!("-> {}", target),
                None => println!("-> (nothing to go back to)"),
            },
            ["teardown"] => tracker.teardown(),
            _ => {
                log::warn!("line {}: unrecognised command {:?}", n + 1, line);
                continue;
            }
        }

        let entries: Vec<String> = tracker.entries().iter().map(|h| h.to_string()).collect();
        let current = tracker.current().map(|h| h.to_string());
        println!(
            "   [{}] position {} current {} can_go_back {}",
            entries.join(", "),
            tracker.position(),
            current.as_deref().unwrap_or("none"),
            tracker.can_go_back()
        );
    }
}
