//! Colorful console output for solver progress.
//!
//! Provides a `tracing` layer that formats solver events with colors.
//! Initialized on the first sample call when the `console` feature is enabled.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "quboforge_solver=info";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides the default filter. A subscriber installed elsewhere wins.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("quboforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_solver_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    variables: Option<u64>,
    couplers: Option<u64>,
    solver_limit: Option<u64>,
    iteration: Option<u64>,
    iterations: Option<u64>,
    subproblems: Option<u64>,
    distinct_states: Option<u64>,
    elapsed_ms: Option<u64>,
    energy: Option<f64>,
    reason: Option<String>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "reason" => self.reason = Some(s.trim_matches('"').to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "variables" => self.variables = Some(value),
            "couplers" => self.couplers = Some(value),
            "solver_limit" => self.solver_limit = Some(value),
            "iteration" => self.iteration = Some(value),
            "iterations" => self.iterations = Some(value),
            "subproblems" => self.subproblems = Some(value),
            "distinct_states" => self.distinct_states = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "energy" {
            self.energy = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_solver_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "improvement" => format_improvement(v),
        "solve_end" => format_solve_end(v),
        _ => String::new(),
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} variables ({}), couplers ({}), solver limit ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        v.variables
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
        v.couplers
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
        v.solver_limit.unwrap_or(0).to_string().bright_yellow(),
    )
}

fn format_improvement(v: &EventVisitor) -> String {
    format!(
        "    {} Iteration {:>7} | {}",
        "->".bright_blue(),
        v.iteration
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
        format_energy(v.energy),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Solving ended ({}): best energy ({}), time spent ({}), iterations ({}), sub-problems ({}), distinct states ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        v.reason.as_deref().unwrap_or("unknown").white().bold(),
        format_energy(v.energy),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow(),
        v.iterations
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
        v.subproblems
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta(),
        v.distinct_states.unwrap_or(0).to_string().white(),
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_energy(energy: Option<f64>) -> String {
    match energy {
        Some(e) if e < 0.0 => format!("{e}").bright_green().to_string(),
        Some(e) => format!("{e}").white().to_string(),
        None => "N/A".white().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("tabu_end".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_solver_event(&visitor).is_empty());
    }

    struct EventCounter {
        name: &'static str,
        seen: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = EventVisitor::default();
            event.record(&mut visitor);
            if visitor.event.as_deref() == Some(self.name) {
                self.seen.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_default_filter_shows_improvements() {
        let seen = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_FILTER))
            .with(EventCounter {
                name: "improvement",
                seen: Arc::clone(&seen),
            });

        let samples = tracing::subscriber::with_default(subscriber, || {
            crate::QuboSampler::new()
                .with_seed(1)
                .sample_qubo((0..4usize).map(|i| (i, i, -1.0)))
                .unwrap()
        });

        assert_eq!(samples.statistics().improvements as usize, seen.load(Ordering::SeqCst));
        assert!(seen.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_improvement_is_rendered() {
        let visitor = EventVisitor {
            event: Some("improvement".to_string()),
            iteration: Some(3),
            energy: Some(-4.0),
            ..EventVisitor::default()
        };
        let output = format_solver_event(&visitor);
        assert!(output.contains("Iteration"));
        assert!(output.contains("-4"));
    }

    #[test]
    fn test_init_idempotent() {
        init();
        init();
    }
}
