use lineal::{Matrix, Vector};

pub struct Camera {
    pub position: Vector<f32, 3>,
    pub direction: Vector<f32, 3>,
    pub up: Vector<f32, 3>,

    ratio: f32,
    far: f32,
    near: f32,
    fov: f32,
}

impl Camera {
    /// `fov` is the vertical field of view in radians.
    pub fn new(
        position: Vector<f32, 3>,
        direction: Vector<f32, 3>,
        fov: f32,
        ratio: f32,
        near: f32,
        far: f32,
    ) -> Camera {
        return Camera {
            position,
            direction,
            up: Vector::new([0., 1., 0.]),

            fov,
            near,
            far,
            ratio,
        };
    }

    /// Keeps the aspect ratio in step with the surface size. A zero height
    /// (minimized window) leaves the ratio unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }

        self.ratio = width as f32 / height as f32;
    }

    pub fn ratio(&self) -> f32 {
        return self.ratio;
    }

    pub fn projection_matrix(&self) -> Matrix<f32, 4, 4> {
        return Matrix::projection(self.fov, self.ratio, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix<f32, 4, 4> {
        return Matrix::look_at(self.position, self.direction, self.up);
    }
}
