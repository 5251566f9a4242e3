use core::ops::Mul;

use super::Vec2;

/// 2D affine matrix in column-major form.
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub fn transform_point(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Column-major 3x3 matrix, padded for a `mat3x3<f32>` uniform.
    pub fn to_cols_array(self) -> [[f32; 4]; 3] {
        [
            [self.a, self.b, 0.0, 0.0],
            [self.c, self.d, 0.0, 0.0],
            [self.tx, self.ty, 1.0, 0.0],
        ]
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `(lhs * rhs).transform_point(p) == lhs.transform_point(rhs.transform_point(p))`
impl Mul for Affine {
    type Output = Affine;
    fn mul(self, rhs: Affine) -> Affine {
        Affine {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            tx: self.a * rhs.tx + self.c * rhs.ty + self.tx,
            ty: self.b * rhs.tx + self.d * rhs.ty + self.ty,
        }
    }
}

/// Translation / rotation / scale of a drawable.
///
/// Applied in scale, rotate, translate order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vec2,
    /// Counter-clockwise, radians.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec2::zero(),
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    #[inline]
    pub fn clear(&mut self) {
        *self = Self::IDENTITY;
    }

    #[inline]
    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec2::new(s, s);
    }

    #[inline]
    pub fn move_xy(&mut self, dx: f32, dy: f32) {
        self.translation = self.translation + Vec2::new(dx, dy);
    }

    #[inline]
    pub fn rotate(&mut self, radians: f32) {
        self.rotation += radians;
    }

    pub fn matrix(&self) -> Affine {
        let (sin, cos) = self.rotation.sin_cos();
        Affine {
            a: cos * self.scale.x,
            b: sin * self.scale.x,
            c: -sin * self.scale.y,
            d: cos * self.scale.y,
            tx: self.translation.x,
            ty: self.translation.y,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Stack of accumulated model matrices. The bottom entry is the identity.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Affine>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self { stack: vec![Affine::IDENTITY] }
    }

    /// Current accumulated matrix.
    #[inline]
    pub fn top(&self) -> Affine {
        self.stack.last().copied().unwrap_or(Affine::IDENTITY)
    }

    /// Pushes `top * m`, so `m` applies in the current local space.
    pub fn push_mul_right(&mut self, m: Affine) {
        let next = self.top() * m;
        self.stack.push(next);
    }

    /// Removes the most recent push. The identity base is never popped.
    pub fn pop(&mut self) {
        debug_assert!(self.stack.len() > 1, "TransformStack::pop without matching push");
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
