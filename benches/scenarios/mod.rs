//! Benchmarks of the realtime paths as the binary drives them.

mod bus;
mod dispatch;
mod particles;

pub use bus::bench_bus;
pub use dispatch::bench_dispatch;
pub use particles::bench_particles;
