// Interview-preparation wizard: session model, state machine, effect driver, HTTP handlers.
// The machine is pure; all collaborator I/O happens in the driver.

pub mod driver;
pub mod error;
pub mod handlers;
pub mod interview;
pub mod machine;
pub mod session;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod testing;
