mod fake_operators;
mod fake_workspace;
mod scripted_confirmer;

pub use fake_operators::FakeOperators;
pub use fake_workspace::FakeWorkspace;
pub use scripted_confirmer::ScriptedConfirmer;
