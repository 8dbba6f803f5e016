pub mod applier;
pub mod mapview;
pub mod pool;
pub mod sequencer;
pub mod session;
