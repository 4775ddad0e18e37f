//! Counter demo - mounts two independent counter boundaries and drives them.
//!
//! Usage: `actionplug-demo [config.toml]`

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use actionplug_core::{ActionPlug, DispatchConfig, Handler};
use actionplug_registry::{
    create_boundary, ActionPlugRegistry, Boundary, MountedScope, Subscription,
};

// =============================================================================
// Counter
// =============================================================================

/// Plugs shared by every counter instance.
struct CounterPlugs {
    increment: ActionPlug<i64>,
    set: ActionPlug<i64>,
}

/// One mounted counter: its scope, its state, and its subscriptions.
struct Counter {
    name: &'static str,
    count: Arc<AtomicI64>,
    // Dropped before `scope`.
    _subscriptions: Vec<Subscription>,
    scope: MountedScope,
}

impl Counter {
    fn mount(
        name: &'static str,
        boundary: &Boundary,
        plugs: &CounterPlugs,
        registry: &ActionPlugRegistry,
    ) -> Self {
        let scope = boundary.mount(&registry.root());
        let count = Arc::new(AtomicI64::new(0));

        let on_increment = {
            let count = Arc::clone(&count);
            Handler::new(move |n: &i64| {
                count.fetch_add(*n, Ordering::SeqCst);
            })
        };
        let on_set = {
            let count = Arc::clone(&count);
            Handler::new(move |n: &i64| {
                count.store(*n, Ordering::SeqCst);
            })
        };

        let subscriptions = vec![
            scope.subscribe(&plugs.increment, on_increment),
            scope.subscribe(&plugs.set, on_set),
        ];

        tracing::info!("Mounted counter '{}' as {}", name, scope.id());
        Self {
            name,
            count,
            _subscriptions: subscriptions,
            scope,
        }
    }

    fn value(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Entry Point
// =============================================================================

fn load_config() -> Result<DispatchConfig, String> {
    match std::env::args().nth(1) {
        Some(path) => DispatchConfig::load(&path).map_err(|e| format!("{}: {}", path, e)),
        None => Ok(DispatchConfig::default()),
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let registry = ActionPlugRegistry::new(config);
    let plugs = CounterPlugs {
        increment: ActionPlug::with_label("increment"),
        set: ActionPlug::with_label("set"),
    };
    let boundary = create_boundary([plugs.increment.id(), plugs.set.id()]).with_label("counter");

    let first = Counter::mount("counter1", &boundary, &plugs, &registry);
    let second = Counter::mount("counter2", &boundary, &plugs, &registry);

    // A button nested inside each counter fires through its own handle.
    let first_button = first.scope.child([]).trigger_handle();
    let second_button = second.scope.child([]).trigger_handle();

    for _ in 0..3 {
        first_button.fire(&plugs.increment, &5);
    }
    second_button.fire(&plugs.increment, &-1);
    second_button.fire(&plugs.set, &42);

    for counter in [&first, &second] {
        println!("{}: {}", counter.name, counter.value());
    }

    // A plug no counter owns resolves to the root and reaches nobody.
    let stray = ActionPlug::<i64>::with_label("stray");
    let report = first_button.fire(&stray, &1);
    tracing::info!("Stray trigger reached {} handler(s)", report.invoked);

    let first_count = Arc::clone(&first.count);
    drop(first);
    let report = first_button.fire(&plugs.increment, &5);
    println!(
        "counter1 after unmount: {} ({} handler(s) reached)",
        first_count.load(Ordering::SeqCst),
        report.invoked
    );
    println!("{}: {}", second.name, second.value());
}
