mod surface;

pub use surface::Surface;
