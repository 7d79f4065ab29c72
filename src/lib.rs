pub mod math {
    pub mod approx_eq;
    pub mod color;
    pub mod matrix;
    pub mod point;
    pub mod tuple;
    pub mod vector;
    pub mod vector4;
}

pub mod render {
    pub mod canvas;
    pub mod intersection;
    pub mod ray;
    pub mod renderer;
}

pub mod scene;

pub mod shading {
    pub mod brdf;
    pub mod integrator;
}
