use std::path::PathBuf;

use thiserror::Error;

use crate::backend::Resource;

/// Faults reported by a window/graphics/UI provider.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("OS refused to create the window: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("event loop never became ready to create a window")]
    NoWindow,

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface lost or outdated")]
    SurfaceLost,

    #[error("timed out acquiring the next surface texture")]
    Timeout,

    #[error("{resource} used before it was acquired")]
    NotAcquired { resource: Resource },

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Faults that only cost the current frame.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BackendError::SurfaceLost | BackendError::Timeout)
    }
}

/// Errors returned by `DebugGui::run`.
#[derive(Debug, Error)]
pub enum GuiError {
    #[error("failed to acquire {stage}")]
    Init {
        stage: Resource,
        #[source]
        source: BackendError,
    },

    #[error("frame {frame} aborted")]
    Frame {
        frame: u64,
        #[source]
        source: BackendError,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
