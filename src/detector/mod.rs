pub mod scan;
pub mod signals;

pub use scan::PumpScanner;
