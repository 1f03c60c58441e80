//! Data loading and synthesis for training.

mod batch;
mod dataset;
mod depth_camera;
mod geometry;

pub use batch::MultiViewBatch;
pub use dataset::{BatchIter, MultiViewDataset, MultiViewSample, IMAGE_CHANNELS};
pub use depth_camera::{
    generate_orbit_poses, generate_sphere_poses, DepthCameraSimulator, DepthImage, Pose,
};
pub use geometry::Point3;
