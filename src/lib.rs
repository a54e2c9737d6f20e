pub mod bodies;
pub mod constants;
pub mod ephemeris;
pub mod kepler;
pub mod observables;
pub mod observers;
pub mod orbit_type;
pub mod orrery_errors;
pub mod ref_system;
pub mod time;
