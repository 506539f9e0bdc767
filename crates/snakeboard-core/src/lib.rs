// Library root: the draft board core (parsing, snake assignment, picked
// state) plus the collaborators a front end composes around it.

pub mod config;
pub mod draft;
pub mod presets;
pub mod store;
