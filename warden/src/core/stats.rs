use eyre::{Result, WrapErr};
use prometheus::{IntCounterVec, Opts, Registry};
use warden_model::ExecutionState;

pub struct DispatchStats {
    pub registry: Registry,
    pub command_counts: IntCounterVec,
    pub outcome_counts: IntCounterVec,
}

macro_rules! metric_vec {
    (counter: $opt:literal, $help:literal, $label:literal) => {
        IntCounterVec::new(Opts::new($opt, $help), &[$label])
    };
}

impl DispatchStats {
    pub fn new() -> Result<Self> {
        let command_counts = metric_vec!(counter: "commands", "Resolved commands", "name")
            .wrap_err("failed to create command counter")?;
        let outcome_counts = metric_vec!(counter: "outcomes", "Finished dispatches", "state")
            .wrap_err("failed to create outcome counter")?;

        let registry = Registry::new_custom(Some(String::from("warden")), None)
            .wrap_err("failed to create registry")?;

        registry
            .register(Box::new(command_counts.clone()))
            .wrap_err("failed to register command counter")?;
        registry
            .register(Box::new(outcome_counts.clone()))
            .wrap_err("failed to register outcome counter")?;

        Ok(Self {
            registry,
            command_counts,
            outcome_counts,
        })
    }

    pub fn increment_command(&self, name: &str) {
        self.command_counts.with_label_values(&[name]).inc();
    }

    pub fn increment_outcome(&self, state: ExecutionState) {
        self.outcome_counts
            .with_label_values(&[state.as_str()])
            .inc();
    }
}
