//! Simulated depth camera for synthetic multi-view training data.
//!
//! Renders per-view depth and mask images from a virtual scene described by a
//! signed distance function. Tests and demos use it to synthesize complete
//! [`MultiViewSample`]s without an external capture pipeline.

use std::f32::consts::PI;

use super::dataset::{MultiViewSample, IMAGE_CHANNELS};
use super::geometry::Point3;

/// Camera pose in 3D space.
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    /// Camera position in world coordinates.
    pub position: Point3,
    /// Forward direction (normalized).
    pub forward: Point3,
    /// Up direction (normalized).
    pub up: Point3,
    /// Right direction (computed from forward x up).
    pub right: Point3,
}

impl Pose {
    /// Create a new pose from position and look-at target.
    pub fn look_at(position: Point3, target: Point3, up: Point3) -> Self {
        let forward = (target - position).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward).normalize();

        Self {
            position,
            forward,
            up,
            right,
        }
    }

    /// Transform a direction from camera space to world space.
    pub fn transform_direction(&self, dir: Point3) -> Point3 {
        self.right * dir.x + self.up * dir.y + self.forward * dir.z
    }
}

/// A depth image with per-pixel depth values.
#[derive(Debug, Clone)]
pub struct DepthImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth values (row-major, [y * width + x]).
    /// Invalid pixels have depth = 0.
    pub depths: Vec<f32>,
}

impl DepthImage {
    /// Create a new depth image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depths: vec![0.0; (width * height) as usize],
        }
    }

    /// Get depth at pixel (x, y).
    pub fn get(&self, x: u32, y: u32) -> f32 {
        if x < self.width && y < self.height {
            self.depths[(y * self.width + x) as usize]
        } else {
            0.0
        }
    }

    /// Set depth at pixel (x, y).
    pub fn set(&mut self, x: u32, y: u32, depth: f32) {
        if x < self.width && y < self.height {
            self.depths[(y * self.width + x) as usize] = depth;
        }
    }

    /// Get the number of valid depth pixels.
    pub fn valid_count(&self) -> usize {
        self.depths.iter().filter(|&&d| d > 0.0).count()
    }

    /// Binary validity mask, 1.0 where a surface was hit.
    pub fn mask(&self) -> Vec<f32> {
        self.depths
            .iter()
            .map(|&d| if d > 0.0 { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Simulated depth camera for generating synthetic depth data.
pub struct DepthCameraSimulator {
    /// Image width in pixels.
    pub resolution_x: u32,
    /// Image height in pixels.
    pub resolution_y: u32,
    /// Horizontal field of view in radians.
    pub fov_h: f32,
    /// Vertical field of view (computed from aspect ratio).
    pub fov_v: f32,
    /// Minimum depth (near plane).
    pub min_depth: f32,
    /// Maximum depth (far plane).
    pub max_depth: f32,
    /// Depth noise standard deviation, relative to depth.
    pub noise_sigma: f32,
    /// Random seed for noise generation.
    seed: u64,
}

impl DepthCameraSimulator {
    /// Create a new depth camera simulator.
    ///
    /// # Arguments
    /// * `resolution_x` - Image width in pixels
    /// * `resolution_y` - Image height in pixels
    /// * `fov_h` - Horizontal field of view in radians
    pub fn new(resolution_x: u32, resolution_y: u32, fov_h: f32) -> Self {
        let aspect = resolution_x as f32 / resolution_y as f32;
        let fov_v = 2.0 * ((fov_h / 2.0).tan() / aspect).atan();

        Self {
            resolution_x,
            resolution_y,
            fov_h,
            fov_v,
            min_depth: 0.1,
            max_depth: 10.0,
            noise_sigma: 0.002,
            seed: 42,
        }
    }

    /// Set the depth range.
    pub fn with_depth_range(mut self, min: f32, max: f32) -> Self {
        self.min_depth = min;
        self.max_depth = max;
        self
    }

    /// Set the noise level.
    pub fn with_noise(mut self, sigma: f32) -> Self {
        self.noise_sigma = sigma;
        self
    }

    /// Generate a random number using a simple LCG.
    fn rand(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.seed >> 33) as f32) / (1u64 << 31) as f32
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self) -> f32 {
        let u1 = self.rand().max(1e-10);
        let u2 = self.rand();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Compute ray direction for a pixel.
    fn pixel_to_ray(&self, x: u32, y: u32) -> Point3 {
        // Normalized device coordinates [-1, 1]
        let ndc_x = (2.0 * x as f32 + 1.0) / self.resolution_x as f32 - 1.0;
        let ndc_y = 1.0 - (2.0 * y as f32 + 1.0) / self.resolution_y as f32;

        let tan_h = (self.fov_h / 2.0).tan();
        let tan_v = (self.fov_v / 2.0).tan();

        Point3::new(ndc_x * tan_h, ndc_y * tan_v, 1.0).normalize()
    }

    /// Render a depth image from a viewpoint using a signed distance function.
    ///
    /// # Arguments
    /// * `pose` - Camera pose
    /// * `sdf_query` - Function that returns signed distance at a point
    pub fn render_depth<F>(&mut self, pose: &Pose, sdf_query: F) -> DepthImage
    where
        F: Fn(Point3) -> f32,
    {
        let mut image = DepthImage::new(self.resolution_x, self.resolution_y);

        for y in 0..self.resolution_y {
            for x in 0..self.resolution_x {
                let ray_dir_camera = self.pixel_to_ray(x, y);
                let ray_dir_world = pose.transform_direction(ray_dir_camera);

                if let Some(depth) = self.sphere_trace(pose.position, ray_dir_world, &sdf_query) {
                    let noisy_depth = depth + self.gaussian_noise() * self.noise_sigma * depth;
                    if noisy_depth >= self.min_depth && noisy_depth <= self.max_depth {
                        image.set(x, y, noisy_depth);
                    }
                }
            }
        }

        image
    }

    /// Sphere trace along a ray to find the surface.
    fn sphere_trace<F>(&self, origin: Point3, direction: Point3, sdf_query: &F) -> Option<f32>
    where
        F: Fn(Point3) -> f32,
    {
        let mut t = self.min_depth;
        let max_steps = 128;
        let hit_threshold = 0.0001;

        for _ in 0..max_steps {
            if t > self.max_depth {
                return None;
            }

            let p = origin + direction * t;
            let dist = sdf_query(p);

            if dist.abs() < hit_threshold {
                return Some(t);
            }

            // Step by the distance to nearest surface
            t += dist.max(hit_threshold);
        }

        None
    }

    /// Render one complete training sample: V depth/mask views of a scene
    /// plus a shaded RGB input image taken from the first pose.
    ///
    /// Depths are rescaled from `[min_depth, max_depth]` to `[0, 1]` so loss
    /// magnitudes stay comparable to the mask term.
    pub fn render_multiview_sample<F>(&mut self, poses: &[Pose], sdf_query: F) -> MultiViewSample
    where
        F: Fn(Point3) -> f32,
    {
        let pixels = (self.resolution_x * self.resolution_y) as usize;
        let depth_span = (self.max_depth - self.min_depth).max(1e-6);

        let mut depth = Vec::with_capacity(poses.len() * pixels);
        let mut mask = Vec::with_capacity(poses.len() * pixels);
        let mut image = vec![0.0; IMAGE_CHANNELS * pixels];

        for (view, pose) in poses.iter().enumerate() {
            let rendered = self.render_depth(pose, &sdf_query);

            for &d in &rendered.depths {
                if d > 0.0 {
                    depth.push((d - self.min_depth) / depth_span);
                    mask.push(1.0);
                } else {
                    depth.push(0.0);
                    mask.push(0.0);
                }
            }

            // Input image: shade the first view by proximity, replicated to RGB
            if view == 0 {
                for (i, &d) in rendered.depths.iter().enumerate() {
                    let shade = if d > 0.0 {
                        1.0 - (d - self.min_depth) / depth_span
                    } else {
                        0.0
                    };
                    for c in 0..IMAGE_CHANNELS {
                        image[c * pixels + i] = shade.clamp(0.0, 1.0);
                    }
                }
            }
        }

        MultiViewSample { image, depth, mask }
    }
}

/// Generate orbit camera poses around a center point.
///
/// # Arguments
/// * `num_views` - Number of camera positions
/// * `radius` - Distance from center
/// * `center` - Point to orbit around
/// * `height` - Height above center
pub fn generate_orbit_poses(
    num_views: usize,
    radius: f32,
    center: Point3,
    height: f32,
) -> Vec<Pose> {
    let mut poses = Vec::with_capacity(num_views);

    for i in 0..num_views {
        let angle = 2.0 * PI * i as f32 / num_views as f32;
        let position = Point3::new(
            center.x + radius * angle.cos(),
            center.y + height,
            center.z + radius * angle.sin(),
        );

        poses.push(Pose::look_at(position, center, Point3::new(0.0, 1.0, 0.0)));
    }

    poses
}

/// Generate camera poses uniformly distributed on a sphere using a Fibonacci
/// spiral, covering the target from all directions including top and bottom.
///
/// # Arguments
/// * `num_views` - Number of camera positions
/// * `radius` - Distance from center to each camera
/// * `center` - Point to look at
pub fn generate_sphere_poses(num_views: usize, radius: f32, center: Point3) -> Vec<Pose> {
    let mut poses = Vec::with_capacity(num_views);

    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let golden_angle = 2.0 * PI / (golden_ratio * golden_ratio);

    for i in 0..num_views {
        let y = if num_views > 1 {
            1.0 - (i as f32 / (num_views - 1) as f32) * 2.0
        } else {
            0.0
        };
        let radius_at_y = (1.0 - y * y).sqrt();
        let theta = golden_angle * i as f32;

        let x = radius_at_y * theta.cos();
        let z = radius_at_y * theta.sin();

        let position = Point3::new(
            center.x + x * radius,
            center.y + y * radius,
            center.z + z * radius,
        );

        // Switch up vector when looking straight up/down
        let up = if y.abs() > 0.99 {
            Point3::new(1.0, 0.0, 0.0)
        } else {
            Point3::new(0.0, 1.0, 0.0)
        };

        poses.push(Pose::look_at(position, center, up));
    }

    poses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_sdf(p: Point3) -> f32 {
        p.length() - 0.3
    }

    #[test]
    fn test_pose_creation() {
        let pose = Pose::look_at(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        // Forward should point toward origin
        assert!((pose.forward.z - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_depth_image_mask() {
        let mut image = DepthImage::new(4, 4);
        image.set(1, 2, 1.5);

        assert_eq!(image.valid_count(), 1);
        let mask = image.mask();
        assert_eq!(mask[2 * 4 + 1], 1.0);
        assert_eq!(mask.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_render_sphere() {
        let mut camera = DepthCameraSimulator::new(32, 32, 60.0_f32.to_radians())
            .with_depth_range(0.1, 5.0)
            .with_noise(0.0);

        let pose = Pose::look_at(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        let depth = camera.render_depth(&pose, sphere_sdf);

        assert!(depth.valid_count() > 0);

        // Center pixel should have depth around 0.7 (1.0 - 0.3)
        let center_depth = depth.get(16, 16);
        assert!(center_depth > 0.5 && center_depth < 0.9);
    }

    #[test]
    fn test_render_multiview_sample() {
        let views = 3;
        let mut camera = DepthCameraSimulator::new(16, 16, 60.0_f32.to_radians())
            .with_depth_range(0.1, 3.0)
            .with_noise(0.0);

        let poses = generate_sphere_poses(views, 1.0, Point3::default());
        let sample = camera.render_multiview_sample(&poses, sphere_sdf);

        assert_eq!(sample.image.len(), IMAGE_CHANNELS * 16 * 16);
        assert_eq!(sample.depth.len(), views * 16 * 16);
        assert_eq!(sample.mask.len(), views * 16 * 16);

        // Depths are rescaled into [0, 1] and masked pixels carry zero depth
        for (d, m) in sample.depth.iter().zip(sample.mask.iter()) {
            assert!(*d >= 0.0 && *d <= 1.0);
            if *m == 0.0 {
                assert_eq!(*d, 0.0);
            }
        }
        assert!(sample.mask.iter().sum::<f32>() > 0.0);
    }

    #[test]
    fn test_orbit_poses_face_center() {
        let poses = generate_orbit_poses(8, 1.0, Point3::default(), 0.5);

        assert_eq!(poses.len(), 8);
        for pose in &poses {
            let to_center = (Point3::default() - pose.position).normalize();
            assert!(pose.forward.dot(to_center) > 0.5);
        }
    }
}
