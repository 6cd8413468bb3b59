//! Smoke test binary for the window registry
//!
//! Run with: cargo run --bin smoke-test
//! Run with a config file: cargo run --bin smoke-test -- --config ./config.json
//!
//! Drives a full session against the headless toolkit:
//! 1. Registry init (loading indicator + pooled generic window)
//! 2. Main window creation and readiness
//! 3. Popup recycling without a new native construction
//! 4. Closing the popup from its title bar returns it to the pool
//! 5. Hiding the last primary window requests quit exactly once

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use window_registry::config::{load_config, load_config_from};
use window_registry::windows::{WindowOptions, WindowType};
use window_registry::{logging, HeadlessToolkit, InMemoryStore, WindowRegistry};

#[derive(Debug, Parser)]
#[command(name = "smoke-test", about = "Headless window registry smoke test")]
struct Args {
    /// Config file to load instead of ~/.window-registry/config.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,
}

struct Checks {
    failures: usize,
}

impl Checks {
    fn check(&mut self, label: &str, ok: bool) {
        if ok {
            println!("   ✓ {}", label);
        } else {
            println!("   ✗ {}", label);
            self.failures += 1;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }
    let _guard = logging::init();

    let config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };

    println!("=== Window Registry Smoke Test ===\n");
    let mut checks = Checks { failures: 0 };
    let mut registry = WindowRegistry::new(HeadlessToolkit::new(), InMemoryStore::new(), config);

    println!("1. Initializing registry...");
    registry.init().context("registry init failed")?;
    settle(&mut registry);
    checks.check("loading indicator created", registry.loading_window().is_some());
    if registry.config().prewarm_generic_window {
        checks.check(
            "generic window pooled and idle",
            registry.generic_window().map(|h| h.is_available()).unwrap_or(false),
        );
    }
    println!();

    println!("2. Opening main window...");
    let main = registry
        .create(WindowType::Main, WindowOptions::default())
        .context("main window creation failed")?;
    settle(&mut registry);
    checks.check(
        "main window shown after content ready",
        registry.get(main).map(|h| h.is_shown()).unwrap_or(false),
    );
    let again = registry.create(WindowType::Main, WindowOptions::default())?;
    checks.check("repeated create returns the same window", again == main);
    println!();

    println!("3. Opening about popup...");
    let before = registry.toolkit().constructions();
    let about = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .context("popup creation failed")?;
    settle(&mut registry);
    let recycled = registry.toolkit().constructions() == before;
    if registry.config().prewarm_generic_window {
        checks.check("popup recycled the generic window", recycled);
    } else {
        println!("   SKIPPED: generic window pre-warming disabled");
    }
    checks.check(
        "popup shown",
        registry.get(about).map(|h| h.is_shown()).unwrap_or(false),
    );
    println!();

    println!("4. Closing about popup from its title bar...");
    let native = registry.require(about)?.native_id();
    registry.toolkit_mut().user_close(native);
    settle(&mut registry);
    if registry.config().prewarm_generic_window {
        checks.check(
            "recycled popup returned to the pool",
            registry.get_by_native(native).map(|h| h.is_available()).unwrap_or(false),
        );
    } else {
        checks.check("popup closed", registry.get_by_native(native).is_none());
    }
    checks.check("main window still open", !registry.require(main)?.is_closed());
    checks.check("no quit requested", !registry.quit_requested());
    println!();

    println!("5. Hiding main window...");
    registry.hide(main);
    checks.check("quit requested", registry.quit_requested());
    checks.check("toolkit quit called once", registry.toolkit().quit_calls() == 1);
    println!();

    for event in registry.drain_events() {
        println!(
            "   [{}] {} {}",
            event.key.0,
            event.window_type,
            event.event.as_str()
        );
    }

    registry.teardown();
    settle(&mut registry);

    println!("\n   Last log lines (newest first):");
    for line in logging::get_last_logs(5) {
        println!("   {}", line);
    }
    println!(
        "   {} buffered lines, log file: {}",
        logging::get_recent_logs().len(),
        logging::log_path().display()
    );

    if checks.failures > 0 {
        bail!("{} check(s) failed", checks.failures);
    }
    println!("\n=== All checks passed ===");
    Ok(())
}

fn settle(registry: &mut WindowRegistry<HeadlessToolkit, InMemoryStore>) {
    registry.toolkit_mut().finish_all_loads();
    registry.pump_events();
}
