/// Scene background, also the compositing backdrop for label colours
pub const BACKGROUND_RGB: [u8; 3] = [0, 0, 0];

/// Translucent bounding cube faces
pub const BOUNDING_CUBE_FACE_RGB: u32 = 0xe7e7e7;
pub const BOUNDING_CUBE_FACE_OPACITY: f32 = 0.125;

/// Bounding cube face outlines
pub const BOUNDING_CUBE_EDGE_RGB: u32 = 0x999999;

/// Reference axis drawn along the bottom of the cube
pub const AXIS_LINE_RGB: u32 = 0xff0000;

/// Key light tint and strength
pub const KEY_LIGHT_RGB: u32 = 0xaabbff;
pub const KEY_LIGHT_ILLUMINANCE: f32 = 2_000.0;

/// Ambient fill
pub const AMBIENT_LIGHT_RGB: u32 = 0x111111;
pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 80.0;

/// Split a packed 0xRRGGBB value into its channels.
pub const fn hex_to_rgb(hex: u32) -> [u8; 3] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    ]
}
