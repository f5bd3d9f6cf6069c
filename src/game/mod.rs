// Pure board rules - no I/O, no clocks, no room state.

pub use board::{Board, Marker, Outcome};

mod board;
