/// Geometry primitives handed to the view transform
use nalgebra::{Matrix4xX, Point3};

/// Homogeneous vertices, one column per vertex
pub type VertexBatch = Matrix4xX<f64>;

/// Lift points into a homogeneous batch (w = 1)
pub fn batch_from_points(points: &[Point3<f64>]) -> VertexBatch {
    VertexBatch::from_iterator(
        points.len(),
        points.iter().flat_map(|p| [p.x, p.y, p.z, 1.0]),
    )
}

/// Line color of a wireframe triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A triangle outline defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
    pub color: Rgb,
}

impl Triangle {
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color: Rgb::WHITE,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

/// A wireframe model composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// All vertices in triangle order; columns 3i..3i+3 belong to triangle i
    pub fn to_batch(&self) -> VertexBatch {
        let points: Vec<Point3<f64>> = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices)
            .collect();
        batch_from_points(&points)
    }

    /// X, Y and Z axes as degenerate triangles (green, pink, blue)
    pub fn axes(length: f64) -> Self {
        let origin = Point3::origin();
        let mut mesh = Self::with_capacity(3);
        mesh.add_triangle(
            Triangle::new(origin, Point3::new(length, 0.0, 0.0), origin)
                .with_color(Rgb(124, 252, 0)),
        );
        mesh.add_triangle(
            Triangle::new(origin, Point3::new(0.0, length, 0.0), origin)
                .with_color(Rgb(255, 20, 147)),
        );
        mesh.add_triangle(
            Triangle::new(origin, Point3::new(0.0, 0.0, length), origin).with_color(Rgb(0, 0, 255)),
        );
        mesh
    }

    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Axis-aligned cube centered on the origin
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let corner = |x: f64, y: f64, z: f64| Point3::new(x * h, y * h, z * h);
        // two triangles per face, counter-clockwise seen from outside
        let faces: [[(f64, f64, f64); 4]; 6] = [
            [(-1., -1., 1.), (1., -1., 1.), (1., 1., 1.), (-1., 1., 1.)],
            [(1., -1., -1.), (-1., -1., -1.), (-1., 1., -1.), (1., 1., -1.)],
            [(-1., 1., 1.), (1., 1., 1.), (1., 1., -1.), (-1., 1., -1.)],
            [(-1., -1., -1.), (1., -1., -1.), (1., -1., 1.), (-1., -1., 1.)],
            [(1., -1., 1.), (1., -1., -1.), (1., 1., -1.), (1., 1., 1.)],
            [(-1., -1., -1.), (-1., -1., 1.), (-1., 1., 1.), (-1., 1., -1.)],
        ];

        let mut mesh = Self::with_capacity(12);
        for face in faces {
            let [a, b, c, d] = face.map(|(x, y, z)| corner(x, y, z));
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
