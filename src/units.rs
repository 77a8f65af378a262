// For simulating
pub type Real = f32;
pub type Point = cgmath::Point3<Real>;
pub type Vector = cgmath::Vector3<Real>;

// For display, rgba
pub type Color = cgmath::Vector4<f32>;
