use crate::error::Error;
use ordered_float::NotNan;
use std::ops::Add;

/// A position in image space, stored row first.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Point {
    y: f32,
    x: f32,
}

impl Point {
    pub fn new(y: f32, x: f32) -> Result<Self, Error> {
        Ok(Self {
            y: NotNan::new(y)
                .map_err(|e| Error::ConstructNotNan(e, y))?
                .into_inner(),
            x: NotNan::new(x)
                .map_err(|e| Error::ConstructNotNan(e, x))?
                .into_inner(),
        })
    }

    pub fn squared_distance(self, other: Self) -> f32 {
        crate::decode::util::squared_distance(self.y, self.x, other.y, other.x)
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::Output {
            y: self.y + rhs.y,
            x: self.x + rhs.x,
        }
    }
}
