use std::io::Write;

/// Process status after the window was closed normally.
pub const EXIT_SUCCESS: i32 = 0;
/// Process status when startup fails or the loop dies.
pub const EXIT_FAILURE: i32 = 1;

pub fn exit_code<T, E>(result: &Result<T, E>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// Writes one `Error: <description>` line, the format GPU errors are reported in.
pub fn write_error_line(
    out: &mut impl Write,
    description: &dyn std::fmt::Display,
) -> std::io::Result<()> {
    writeln!(out, "Error: {}", description)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex shader",
            ShaderStage::Fragment => "fragment shader",
        }
    }
}

/// Failure to turn the quad's shader sources into a usable pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Compile { stage, log } => {
                write!(f, "failed to compile {}: {}", stage.label(), log)
            }
            ShaderError::Link { log } => write!(f, "failed to link shader program: {}", log),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Everything that can stop the program before the first frame.
#[derive(Debug)]
pub enum BootstrapError {
    Window(winit::error::OsError),
    Surface(wgpu::CreateSurfaceError),
    NoAdapter,
    Device(wgpu::RequestDeviceError),
    Shader(ShaderError),
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::Window(_) => write!(f, "failed to create window"),
            BootstrapError::Surface(_) => write!(f, "failed to create window surface"),
            BootstrapError::NoAdapter => write!(f, "no graphics adapter can present to the window"),
            BootstrapError::Device(_) => write!(f, "failed to open graphics device"),
            BootstrapError::Shader(_) => write!(f, "failed to build quad shaders"),
        }
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootstrapError::Window(e) => Some(e),
            BootstrapError::Surface(e) => Some(e),
            BootstrapError::NoAdapter => None,
            BootstrapError::Device(e) => Some(e),
            BootstrapError::Shader(e) => Some(e),
        }
    }
}

impl From<ShaderError> for BootstrapError {
    fn from(value: ShaderError) -> Self {
        BootstrapError::Shader(value)
    }
}
