//! Counter - scoped reduxed instances in one state tree
//!
//! One counter bundle, one scoped instance per `--scopes` entry:
//! - Bundle: handlers named once, types and creators derived
//! - Scopes: each instance only reacts to its own actions
//! - Host store: a tiny loop feeding a channel of actions to the root reducer
//!
//! Run with `RUST_LOG=debug` to see every handler the reducers apply.

use std::collections::BTreeMap;

use clap::Parser;
use reduxed::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Args
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "counter", about = "Scoped counters sharing one action stream")]
struct Args {
    /// Prefix for the counter action types
    #[arg(long, default_value = "counter")]
    prefix: String,

    /// Comma-separated counter instances
    #[arg(long, value_delimiter = ',', default_value = "left,right")]
    scopes: Vec<String>,

    /// Rounds of actions to dispatch
    #[arg(long, default_value_t = 3)]
    steps: u32,
}

// ============================================================================
// Bundle - What can happen and how state changes
// ============================================================================

type CounterAction = ScopedAction<i64>;

fn counter_bundle() -> Bundle<i64, i64> {
    Bundle::new()
        .handler("increment", |count: i64, _: Option<&i64>| count + 1)
        .handler("decrement", |count: i64, _: Option<&i64>| count - 1)
        .handler("addAmount", |count: i64, amount: Option<&i64>| {
            count + amount.copied().unwrap_or(0)
        })
        .handler("reset", |_: i64, _: Option<&i64>| 0)
}

// ============================================================================
// Root reducer - one scoped counter per instance
// ============================================================================

type AppState = BTreeMap<String, i64>;

struct RootReducer {
    counters: Vec<(String, ScopedReducer<i64, CounterAction>)>,
}

impl Reducer<AppState, CounterAction> for RootReducer {
    fn reduce(&self, state: Option<AppState>, action: Option<&CounterAction>) -> AppState {
        let state = state.unwrap_or_default();
        self.counters
            .iter()
            .map(|(name, reducer)| {
                let current = state.get(name).copied();
                (name.clone(), reducer.reduce(current, action))
            })
            .collect()
    }
}

// ============================================================================
// Main - build, dispatch, report
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let counter = counter_bundle().build(0, Some(BundleOptions::with_prefix(args.prefix)));

    for (name, ty) in counter.types().iter() {
        tracing::info!(handler = name, action = %ty, "Registered action type");
    }

    let root = RootReducer {
        counters: args
            .scopes
            .iter()
            .map(|scope| {
                (
                    scope.clone(),
                    reducer_scope::<i64, CounterAction, _>(scope.as_str(), counter.reducer()),
                )
            })
            .collect(),
    };

    // Initialization probe
    let mut state = root.reduce(None, None);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<CounterAction>();

    let producers: Vec<_> = args
        .scopes
        .iter()
        .enumerate()
        .map(|(i, scope)| (i, action_scope(scope.as_str(), &counter.actions())))
        .collect();
    let plain = counter.actions();
    let steps = args.steps;

    tokio::spawn(async move {
        for step in 0..steps {
            for (i, actions) in &producers {
                let amount = i64::try_from(*i).unwrap_or(0) + 1;
                let _ = action_tx.send(actions["addAmount"](Some(amount)));
                if step % 2 == 1 {
                    let _ = action_tx.send(actions["decrement"](None));
                }
            }
            // Unscoped: every scoped counter ignores it
            let _ = action_tx.send(plain["reset"](None).into());
        }
    });

    while let Some(action) = action_rx.recv().await {
        tracing::debug!(
            action = %action.action_type(),
            scope = ?action.scope(),
            "Dispatching action"
        );
        state = root.reduce(Some(state), Some(&action));
    }

    for (scope, count) in &state {
        tracing::info!(scope = %scope, count = count, "Final count");
    }
}
