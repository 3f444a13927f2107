use crate::{decode::Skeleton, error::Error};
use ndarray::{Array3, ArrayView3};
use std::{fs::File, io::BufReader, path::Path};

/// A row-major `[height, width, channels]` tensor as stored on disk.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TensorFile {
    pub shape: [usize; 3],
    pub data: Vec<f32>,
}

impl TensorFile {
    fn into_array(self, name: &'static str) -> Result<Array3<f32>, Error> {
        let [height, width, channels] = self.shape;
        Array3::from_shape_vec((height, width, channels), self.data)
            .map_err(|e| Error::ConstructTensorArray(name, e))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OutputTensorsFile {
    pub heatmaps: TensorFile,
    pub short_offsets: TensorFile,
    pub displacement_fwd: TensorFile,
    pub displacement_bwd: TensorFile,
}

/// The four network outputs the decoder consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensors {
    /// `[H, W, K]` keypoint scores.
    pub heatmaps: Array3<f32>,
    /// `[H, W, 2K]`: all y offsets, then all x offsets.
    pub short_offsets: Array3<f32>,
    /// `[H, W, 2E]`: per-edge y displacements, then x displacements.
    pub displacement_fwd: Array3<f32>,
    pub displacement_bwd: Array3<f32>,
}

impl OutputTensors {
    pub fn from_file(file: OutputTensorsFile) -> Result<Self, Error> {
        Ok(Self {
            heatmaps: file.heatmaps.into_array("heatmaps")?,
            short_offsets: file.short_offsets.into_array("short_offsets")?,
            displacement_fwd: file.displacement_fwd.into_array("displacement_fwd")?,
            displacement_bwd: file.displacement_bwd.into_array("displacement_bwd")?,
        })
    }

    pub fn read_json<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::OpenTensorFile(e, path.to_path_buf()))?;
        let file = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::ParseTensorFile(e, path.to_path_buf()))?;
        Self::from_file(file)
    }

    /// Apply the logistic function to the heatmaps, for models that emit logits.
    pub fn activate_heatmaps(&mut self) {
        self.heatmaps.mapv_inplace(sigmoid);
    }

    pub fn view(&self) -> OutputTensorsView<'_> {
        OutputTensorsView {
            heatmaps: self.heatmaps.view(),
            short_offsets: self.short_offsets.view(),
            displacement_fwd: self.displacement_fwd.view(),
            displacement_bwd: self.displacement_bwd.view(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutputTensorsView<'a> {
    pub heatmaps: ArrayView3<'a, f32>,
    pub short_offsets: ArrayView3<'a, f32>,
    pub displacement_fwd: ArrayView3<'a, f32>,
    pub displacement_bwd: ArrayView3<'a, f32>,
}

impl<'a> OutputTensorsView<'a> {
    /// Check every tensor against the heatmap grid and the skeleton's keypoint
    /// and edge counts, and reject NaN or infinite values.
    pub fn validate(&self, skeleton: &Skeleton) -> Result<(), Error> {
        let (height, width, _) = self.heatmaps.dim();
        let num_keypoints = skeleton.num_keypoints();
        let num_edges = skeleton.num_edges();

        check_shape("heatmaps", self.heatmaps, [height, width, num_keypoints])?;
        check_shape(
            "short_offsets",
            self.short_offsets,
            [height, width, 2 * num_keypoints],
        )?;
        check_shape(
            "displacement_fwd",
            self.displacement_fwd,
            [height, width, 2 * num_edges],
        )?;
        check_shape(
            "displacement_bwd",
            self.displacement_bwd,
            [height, width, 2 * num_edges],
        )?;

        if height == 0 || width == 0 {
            return Err(Error::EmptyHeatmapGrid(height, width));
        }

        check_finite("heatmaps", self.heatmaps)?;
        check_finite("short_offsets", self.short_offsets)?;
        check_finite("displacement_fwd", self.displacement_fwd)?;
        check_finite("displacement_bwd", self.displacement_bwd)
    }
}

fn check_finite(name: &'static str, tensor: ArrayView3<f32>) -> Result<(), Error> {
    match tensor.indexed_iter().find(|(_, value)| !value.is_finite()) {
        Some(((y, x, c), &value)) => Err(Error::NonFiniteTensorValue {
            name,
            index: [y, x, c],
            value,
        }),
        None => Ok(()),
    }
}

fn check_shape(
    name: &'static str,
    tensor: ArrayView3<f32>,
    expected: [usize; 3],
) -> Result<(), Error> {
    let (height, width, channels) = tensor.dim();
    let actual = [height, width, channels];
    if actual == expected {
        Ok(())
    } else {
        Err(Error::TensorShapeMismatch {
            name,
            expected,
            actual,
        })
    }
}

#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
