/// Radius of the sphere mesh shared by every point
pub const POINT_SPHERE_RADIUS: f32 = 0.0075;

/// Display scale of a point at rest
pub const POINT_MESH_SCALE_DEFAULT: f32 = 1.5;

/// Display scale of the highlighted point
pub const POINT_MESH_SCALE_HIGHLIGHTED: f32 = POINT_MESH_SCALE_DEFAULT * 3.0;

/// Camera zoom multiplier applied per wheel event
pub const CAMERA_ZOOM_FACTOR: f32 = 1.05;

/// Tooltip anchor offset from the pointer, in logical pixels
pub const TOOLTIP_OFFSET_PX: f32 = 10.0;

/// Inactivity period after which hover state is re-evaluated
pub const IDLE_TIMEOUT_MS: u64 = 500;

/// Margin between the unit cube holding the points and the drawn bounding cube
pub const BOUNDING_CUBE_PADDING: f32 = 0.075;

/// Extra size on the face mesh so outlines are not z-fighting with faces
pub const BOUNDING_CUBE_EDGE_PADDING: f32 = 0.001;

/// Perspective camera placement
pub const CAMERA_POSITION: [f32; 3] = [2.0, 1.5, 2.5];
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.5;
pub const CAMERA_FAR: f32 = 1000.0;

/// Key light placement
pub const KEY_LIGHT_POSITION: [f32; 3] = [100.0, 100.0, -100.0];

/// Update cadence while the window is focused and no input arrives
pub const REACTIVE_UPDATE_MS: u64 = 100;
