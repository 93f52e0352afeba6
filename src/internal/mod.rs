pub mod prelude;

pub mod timer;
