//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::{BuildUseCase, InspectUseCase};
use crate::config::Config;
use crate::domain::ports::BuildEventSink;
use crate::infrastructure::{ComposerRepository, ConsoleEventSink, JsonEventSink, PharFactory};

/// Type alias for the concrete BuildUseCase with all dependencies
pub type ConcreteBuildUseCase = BuildUseCase<ComposerRepository, PharFactory>;

/// Create a build use case honoring the archive settings of `config`
pub fn create_build_use_case(config: &Config) -> ConcreteBuildUseCase {
    let repo = ComposerRepository::new();
    let factory = PharFactory::new(config.archive.signature, config.archive.readonly);

    BuildUseCase::new(repo, factory)
}

pub fn create_inspect_use_case() -> InspectUseCase {
    InspectUseCase::new()
}

/// Event sink for the chosen output mode
pub fn create_event_sink(json: bool, verbose: bool) -> Arc<dyn BuildEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout(verbose))
    }
}
