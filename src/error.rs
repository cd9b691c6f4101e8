//! Error types for caloview.
//!
//! Every fallible layer has its own enum: reading the PDG reference file,
//! reading the event store, looking up loaded collections, loading the
//! display configuration, and driving the GPU viewer.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while building the PDG visualization map.
#[derive(Debug)]
pub enum PdgMapError {
    /// Failed to open or read the reference file.
    Io(std::io::Error),
    /// A data line ended in a digit but its last token is not an integer.
    BadCode {
        /// 1-based line number in the reference file.
        line: usize,
        /// The offending token.
        token: String,
        /// Underlying integer parse error.
        source: std::num::ParseIntError,
    },
    /// The code parses but its antiparticle code does not fit in an `i32`.
    CodeOutOfRange {
        /// 1-based line number in the reference file.
        line: usize,
        code: i32,
    },
}

impl fmt::Display for PdgMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdgMapError::Io(e) => write!(f, "Failed to read PDG reference file: {}", e),
            PdgMapError::BadCode { line, token, source } => {
                write!(f, "Invalid PDG code '{}' on line {}: {}", token, line, source)
            }
            PdgMapError::CodeOutOfRange { line, code } => {
                write!(f, "PDG code {} on line {} has no antiparticle code", code, line)
            }
        }
    }
}

impl std::error::Error for PdgMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PdgMapError::Io(e) => Some(e),
            PdgMapError::BadCode { source, .. } => Some(source),
            PdgMapError::CodeOutOfRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for PdgMapError {
    fn from(e: std::io::Error) -> Self {
        PdgMapError::Io(e)
    }
}

/// Errors that can occur while reading the event store.
#[derive(Debug)]
pub enum EventStoreError {
    /// Failed to read the event file from disk.
    Io {
        /// File that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid JSON.
    Json(serde_json::Error),
    /// The JSON document does not have the expected event layout.
    Format(String),
    /// The requested entry does not exist.
    EntryOutOfRange {
        /// Requested entry.
        entry: usize,
        /// Number of entries in the store.
        entries: usize,
        /// Lowest and highest entry numbers present, `None` for an empty store.
        range: Option<(usize, usize)>,
    },
    /// A record in a branch is missing fields or has malformed values.
    Record {
        /// Branch the record belongs to.
        branch: String,
        /// Position of the record inside the branch.
        index: usize,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

impl fmt::Display for EventStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStoreError::Io { path, source } => {
                write!(f, "Failed to read event file {}: {}", path.display(), source)
            }
            EventStoreError::Json(e) => write!(f, "Event file is not valid JSON: {}", e),
            EventStoreError::Format(msg) => write!(f, "Unexpected event file layout: {}", msg),
            EventStoreError::EntryOutOfRange {
                entry,
                entries,
                range: Some((first, last)),
            } => write!(
                f,
                "Event {} does not exist (store holds {} events numbered {} to {})",
                entry, entries, first, last
            ),
            EventStoreError::EntryOutOfRange { entry, range: None, .. } => {
                write!(f, "Event {} does not exist (store is empty)", entry)
            }
            EventStoreError::Record { branch, index, source } => {
                write!(f, "Malformed record {} in branch '{}': {}", index, branch, source)
            }
        }
    }
}

impl std::error::Error for EventStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EventStoreError::Io { source, .. } => Some(source),
            EventStoreError::Json(e) => Some(e),
            EventStoreError::Record { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EventStoreError {
    fn from(e: serde_json::Error) -> Self {
        EventStoreError::Json(e)
    }
}

/// Errors raised by [`DetPlot`](crate::DetPlot) operations.
#[derive(Debug)]
pub enum DisplayError {
    /// The (branch, event) pair was never loaded.
    NotLoaded {
        /// Branch name that was requested.
        branch: String,
        /// Event index that was requested.
        event: usize,
    },
    /// Reading the event store failed.
    Store(EventStoreError),
    /// Building the PDG visualization map failed.
    Pdg(PdgMapError),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::NotLoaded { branch, event } => write!(
                f,
                "Branch '{}' has not been loaded for event {}. Call load_hits_for_event() first.",
                branch, event
            ),
            DisplayError::Store(e) => write!(f, "Event store error: {}", e),
            DisplayError::Pdg(e) => write!(f, "PDG map error: {}", e),
        }
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisplayError::NotLoaded { .. } => None,
            DisplayError::Store(e) => Some(e),
            DisplayError::Pdg(e) => Some(e),
        }
    }
}

impl From<EventStoreError> for DisplayError {
    fn from(e: EventStoreError) -> Self {
        DisplayError::Store(e)
    }
}

impl From<PdgMapError> for DisplayError {
    fn from(e: PdgMapError) -> Self {
        DisplayError::Pdg(e)
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The config file is not valid JSON for the expected schema.
    Json(serde_json::Error),
    /// A value is out of its valid range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    BufferMapping(String),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the viewer or writing snapshots.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Failed to encode or write a snapshot image.
    Snapshot(image::ImageError),
    /// Loading an event for display failed.
    Display(DisplayError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::Snapshot(e) => write!(f, "Failed to write snapshot: {}", e),
            ViewerError::Display(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::Snapshot(e) => Some(e),
            ViewerError::Display(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<image::ImageError> for ViewerError {
    fn from(e: image::ImageError) -> Self {
        ViewerError::Snapshot(e)
    }
}

impl From<DisplayError> for ViewerError {
    fn from(e: DisplayError) -> Self {
        ViewerError::Display(e)
    }
}
