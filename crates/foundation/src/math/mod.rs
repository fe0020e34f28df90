pub mod geodesy;
pub mod precision;
pub mod sphere;
pub mod vec;

pub use geodesy::*;
pub use precision::*;
pub use sphere::*;
pub use vec::*;
