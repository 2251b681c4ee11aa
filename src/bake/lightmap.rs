//! Baked output image.

use half::f16;

use crate::util::Vec3;

/// Linear RGB radiance, row-major, `width * height` texels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lightmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Vec3>,
}

impl Lightmap {
    /// Black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![Vec3::ZERO; width as usize * height as usize],
        }
    }

    /// Reset every texel to zero.
    pub fn clear(&mut self) {
        self.data.fill(Vec3::ZERO);
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.width + x) as usize).copied()
    }

    /// Raw RGB f32 bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// RGBA16F texels (alpha = 1) for half-float texture upload.
    pub fn to_rgba_f16(&self) -> Vec<[f16; 4]> {
        self.data
            .iter()
            .map(|c| {
                [
                    f16::from_f32(c.x),
                    f16::from_f32(c.y),
                    f16::from_f32(c.z),
                    f16::ONE,
                ]
            })
            .collect()
    }

    /// Component-wise maximum over all texels.
    pub fn max_value(&self) -> Vec3 {
        self.data.iter().fold(Vec3::ZERO, |acc, c| acc.max(*c))
    }

    /// Add another image of the same size texel by texel.
    pub fn add(&mut self, other: &[Vec3]) {
        for (dst, src) in self.data.iter_mut().zip(other) {
            *dst += *src;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_lookup() {
        let mut map = Lightmap::new(3, 2);
        map.data[4] = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(map.texel(1, 1), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(map.texel(3, 0), None);
        assert_eq!(map.max_value(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_upload_layouts() {
        let mut map = Lightmap::new(2, 1);
        map.data[1] = Vec3::new(0.5, 1.0, 2.0);
        assert_eq!(map.as_bytes().len(), 2 * 3 * 4);
        let half = map.to_rgba_f16();
        assert_eq!(half.len(), 2);
        assert_eq!(half[1][0].to_f32(), 0.5);
        assert_eq!(half[1][2].to_f32(), 2.0);
        assert_eq!(half[0][3], f16::ONE);
    }
}
