//! Built-in capability families and their default registrations.

mod calculator;
mod clock;
mod memory;
mod web;

pub use calculator::{evaluate, expression_of, render_number, CalculatorHandler};
pub use clock::{current_time, ClockHandler};
pub use memory::MemoryHandler;
pub use web::WebSearchHandler;

use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::{CapabilityRegistration, CapabilityRegistry};
use crate::variables::VariableStore;

/// Register the four built-in families: calculator, clock, memory, web.
pub fn register_builtins(
    registry: &CapabilityRegistry,
    variables: Arc<dyn VariableStore>,
) -> Result<(), RegistryError> {
    registry.register(
        CapabilityRegistration::new("calculator", Arc::new(CalculatorHandler))
            .with_verb("calculate")
            .with_verb("evaluate")
            .with_alias("calc", "calculate")
            .with_alias("compute", "calculate")
            .with_required_parameter("expression"),
    )?;

    registry.register(
        CapabilityRegistration::new("clock", Arc::new(ClockHandler))
            .with_verb("now")
            .with_alias("time", "now"),
    )?;

    registry.register(
        CapabilityRegistration::new("memory", Arc::new(MemoryHandler::new(variables)))
            .with_verb("remember")
            .with_verb("recall")
            .with_verb("forget")
            .with_alias("memorize", "remember")
            .with_alias("store", "remember"),
    )?;

    registry.register(
        CapabilityRegistration::new("web", Arc::new(WebSearchHandler))
            .with_verb("search")
            .with_alias("find", "search")
            .with_required_parameter("query"),
    )?;

    Ok(())
}
