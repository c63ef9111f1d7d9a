//! Constants used throughout the application

/// Number of hand landmarks in one detected hand
pub const NUM_HAND_LANDMARKS: usize = 21;

// Landmark indices of the 21-point hand model. Ordering is fixed by the
// upstream pose estimator and must not be rearranged.
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Hand skeleton connections for the debug overlay
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

/// Default canvas and frame dimensions
pub const DEFAULT_CANVAS_WIDTH: u32 = 640;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 480;

/// Default stroke appearance (RGBA)
pub const DEFAULT_STROKE_COLOR: [u8; 4] = [64, 156, 255, 255];
pub const DEFAULT_STROKE_WIDTH: u32 = 4;

/// Maximum accepted stroke width in pixels
pub const MAX_STROKE_WIDTH: u32 = 64;

/// Default exponential smoothing factor for the cursor
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.5;

/// Skeleton overlay colors (RGBA)
pub const SKELETON_BONE_COLOR: [u8; 4] = [0, 220, 120, 255];
pub const SKELETON_JOINT_COLOR: [u8; 4] = [255, 64, 64, 255];

/// Crosshair and label colors (RGBA)
pub const CROSSHAIR_COLOR: [u8; 4] = [255, 204, 51, 255];
pub const LABEL_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Background used when flattening the drawing for export or analysis
pub const FLATTEN_BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Instruction prompt sent with the drawing to the analysis service
pub const ANALYSIS_PROMPT: &str = "Analyze this drawing. It may be a mathematical equation, \
     a diagram, or a shape. Explain what it shows and solve it if applicable.";

/// Default analysis service binding
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;
