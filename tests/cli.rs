use bodypix_decode::tensor::{OutputTensorsFile, TensorFile};
use std::{path::PathBuf, process::Command};

const BIN: &str = env!("CARGO_BIN_EXE_bodypix-decode");

fn tensor(channels: usize) -> TensorFile {
    TensorFile {
        shape: [2, 2, channels],
        data: vec![0.0; 4 * channels],
    }
}

fn write_input(name: &str) -> PathBuf {
    let mut heatmaps = tensor(17);
    // cell (1, 1), keypoint 0
    heatmaps.data[3 * 17] = 0.9;
    let file = OutputTensorsFile {
        heatmaps,
        short_offsets: tensor(34),
        displacement_fwd: tensor(32),
        displacement_bwd: tensor(32),
    };
    let path = std::env::temp_dir().join(format!(
        "bodypix-decode-{}-{}.json",
        name,
        std::process::id()
    ));
    std::fs::write(&path, serde_json::to_vec(&file).unwrap()).unwrap();
    path
}

#[test]
fn decodes_tensor_file_to_json() {
    let path = write_input("decodes");
    let output = Command::new(BIN)
        .arg(&path)
        .args(&["-s", "8", "-l", "warn"])
        .output()
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(output.status.success(), "{:?}", output);
    let poses: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let poses = poses.as_array().unwrap();
    assert_eq!(poses.len(), 1);
    let keypoints = poses[0]["keypoints"].as_array().unwrap();
    assert_eq!(keypoints.len(), 17);
    assert_eq!(keypoints[0]["part"], "nose");
    assert_eq!(keypoints[0]["position"]["y"], 8.0);
    assert_eq!(keypoints[0]["position"]["x"], 8.0);
}

#[test]
fn missing_input_fails() {
    let status = Command::new(BIN)
        .arg(std::env::temp_dir().join("bodypix-decode-does-not-exist.json"))
        .args(&["-l", "off"])
        .status()
        .unwrap();
    assert!(!status.success());
}
