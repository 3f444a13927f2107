use crate::{
    decode::{part::Part, point::Point},
    error::Error,
};
use ndarray::ArrayView3;
use num_traits::cast::ToPrimitive;

#[inline]
pub(crate) fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[inline]
pub(crate) fn squared_distance(y1: f32, x1: f32, y2: f32, x2: f32) -> f32 {
    let dy = y2 - y1;
    let dx = x2 - x1;
    dy * dy + dx * dx
}

pub(crate) fn get(tensor: ArrayView3<f32>, index: [usize; 3]) -> Result<f32, Error> {
    let (height, width, channels) = tensor.dim();
    tensor
        .get(index)
        .copied()
        .ok_or(Error::TensorIndexOutOfBounds(index, [height, width, channels]))
}

/// Read the short-range offset of `keypoint_id` at cell `(y, x)`.
///
/// Offsets are laid out as `[y_0 .. y_{K-1}, x_0 .. x_{K-1}]` along the channel
/// axis. Fractional coordinates are truncated, not rounded.
pub(crate) fn get_offset_point<T>(
    y: T,
    x: T,
    keypoint_id: usize,
    offsets: ArrayView3<f32>,
) -> Result<Point, Error>
where
    T: ToPrimitive,
{
    let num_keypoints = offsets.dim().2 / 2;
    let y = y.to_usize().ok_or(Error::ConvertToUSize)?;
    let x = x.to_usize().ok_or(Error::ConvertToUSize)?;
    Point::new(
        get(offsets, [y, x, keypoint_id])?,
        get(offsets, [y, x, keypoint_id + num_keypoints])?,
    )
}

/// Convert a heatmap cell to image space: `cell * output_stride + offset`.
///
/// No clamping to the image bounds is done here.
pub(crate) fn get_image_coords(
    part: &Part,
    output_stride: usize,
    offsets: ArrayView3<f32>,
) -> Result<Point, Error> {
    let offset_point = get_offset_point(part.heatmap_y, part.heatmap_x, part.keypoint_id, offsets)?;
    let output_stride = output_stride.to_f32().ok_or(Error::ConvertToF32)?;
    let heatmap_y = part.heatmap_y.to_f32().ok_or(Error::ConvertToF32)?;
    let heatmap_x = part.heatmap_x.to_f32().ok_or(Error::ConvertToF32)?;
    Point::new(
        heatmap_y * output_stride + offset_point.y(),
        heatmap_x * output_stride + offset_point.x(),
    )
}

/// The grid cell nearest to an image-space point, clamped to the grid.
pub(crate) fn get_strided_index_near_point(
    point: Point,
    output_stride: usize,
    height: usize,
    width: usize,
) -> Result<(usize, usize), Error> {
    let output_stride = output_stride.to_f32().ok_or(Error::ConvertToF32)?;
    let max_y = height.saturating_sub(1).to_f32().ok_or(Error::ConvertToF32)?;
    let max_x = width.saturating_sub(1).to_f32().ok_or(Error::ConvertToF32)?;
    let y = clamp((point.y() / output_stride).round(), 0.0, max_y);
    let x = clamp((point.x() / output_stride).round(), 0.0, max_x);
    Ok((
        y.to_usize().ok_or(Error::ConvertToUSize)?,
        x.to_usize().ok_or(Error::ConvertToUSize)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    mod clamp_tests {
        use super::clamp;

        #[test]
        fn inside_is_unchanged() {
            assert_eq!(clamp(3, 0, 5), 3);
            assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        }

        #[test]
        fn outside_is_bounded() {
            assert_eq!(clamp(-2, 0, 5), 0);
            assert_eq!(clamp(9, 0, 5), 5);
            assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        }
    }

    mod squared_distance_tests {
        use super::squared_distance;

        #[test]
        fn symmetric() {
            assert_eq!(
                squared_distance(1.0, 2.0, 4.0, 6.0),
                squared_distance(4.0, 6.0, 1.0, 2.0)
            );
            assert_eq!(squared_distance(1.0, 2.0, 4.0, 6.0), 25.0);
        }

        #[test]
        fn zero_for_same_point() {
            assert_eq!(squared_distance(3.5, -1.25, 3.5, -1.25), 0.0);
        }
    }

    fn offsets(height: usize, width: usize, num_keypoints: usize) -> Array3<f32> {
        // y offset = 10 * keypoint id, x offset = -(keypoint id), plus the cell row.
        Array3::from_shape_fn((height, width, 2 * num_keypoints), |(y, _, c)| {
            if c < num_keypoints {
                10.0 * c as f32 + y as f32
            } else {
                -((c - num_keypoints) as f32)
            }
        })
    }

    mod get_offset_point_tests {
        use super::{get_offset_point, offsets};

        #[test]
        fn reads_y_then_x_block() {
            let offsets = offsets(4, 3, 5);
            let point = get_offset_point(2_usize, 1, 3, offsets.view()).unwrap();
            assert_eq!(point.y(), 32.0);
            assert_eq!(point.x(), -3.0);
        }

        #[test]
        fn truncates_fractional_coordinates() {
            let offsets = offsets(4, 3, 5);
            let truncated = get_offset_point(2.9_f32, 1.7, 3, offsets.view()).unwrap();
            let exact = get_offset_point(2_usize, 1, 3, offsets.view()).unwrap();
            assert_eq!(truncated, exact);
        }

        #[test]
        fn out_of_bounds_is_an_error() {
            let offsets = offsets(4, 3, 5);
            assert!(get_offset_point(4_usize, 0, 0, offsets.view()).is_err());
            assert!(get_offset_point(0_usize, 0, 5, offsets.view()).is_err());
        }
    }

    mod get_image_coords_tests {
        use super::{get_image_coords, offsets, Part};
        use assert_approx_eq::assert_approx_eq;

        #[test]
        fn stride_plus_offset() {
            let offsets = offsets(4, 3, 5);
            let part = Part {
                heatmap_y: 3,
                heatmap_x: 2,
                keypoint_id: 1,
            };
            let point = get_image_coords(&part, 16, offsets.view()).unwrap();
            assert_approx_eq!(point.y(), 3.0 * 16.0 + 13.0);
            assert_approx_eq!(point.x(), 2.0 * 16.0 - 1.0);
        }

        #[test]
        fn is_pure() {
            let offsets = offsets(4, 3, 5);
            let part = Part {
                heatmap_y: 1,
                heatmap_x: 1,
                keypoint_id: 4,
            };
            assert_eq!(
                get_image_coords(&part, 8, offsets.view()).unwrap(),
                get_image_coords(&part, 8, offsets.view()).unwrap()
            );
        }
    }

    mod get_strided_index_near_point_tests {
        use super::{get_strided_index_near_point, Point};

        #[test]
        fn rounds_to_nearest_cell() {
            let point = Point::new(23.9, 40.1).unwrap();
            assert_eq!(get_strided_index_near_point(point, 16, 10, 10).unwrap(), (1, 3));
        }

        #[test]
        fn clamps_to_grid() {
            let point = Point::new(-50.0, 1000.0).unwrap();
            assert_eq!(get_strided_index_near_point(point, 16, 4, 6).unwrap(), (0, 5));
        }
    }
}
