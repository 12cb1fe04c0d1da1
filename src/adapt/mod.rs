pub(crate) mod apply;
pub(crate) mod engine;
pub(crate) mod external;
pub(crate) mod orchestrator;
pub(crate) mod target;
