//! 音频输出设备

use std::path::{Path, PathBuf};
use tracing::debug;

use super::AudioError;

/// 单条正在发声的音轨
pub trait TrackOutput {
    fn set_volume(&self, volume: f32);
    fn stop(&self);
    /// 音源已播放完
    fn is_finished(&self) -> bool;
}

/// 打开音轨的输出设备
pub trait OutputDevice {
    fn open_track(&self, src: &str, volume: f32) -> Result<Box<dyn TrackOutput>, AudioError>;
}

/// 解析音频路径
///
/// 绝对路径和带协议的路径原样返回，其余拼接到资源根目录下。
pub fn resolve_path(base: &Path, src: &str) -> PathBuf {
    if src.starts_with('/') || src.contains(':') {
        PathBuf::from(src)
    } else {
        base.join(src)
    }
}

/// 不发声的输出，只追踪状态
#[derive(Debug, Clone)]
pub struct SilentDevice {
    base_path: PathBuf,
}

impl SilentDevice {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

struct SilentTrack;

impl TrackOutput for SilentTrack {
    fn set_volume(&self, _volume: f32) {}

    fn stop(&self) {}

    fn is_finished(&self) -> bool {
        false
    }
}

impl OutputDevice for SilentDevice {
    fn open_track(&self, src: &str, volume: f32) -> Result<Box<dyn TrackOutput>, AudioError> {
        let path = resolve_path(&self.base_path, src);
        debug!(path = %path.display(), volume, "静音播放");
        Ok(Box::new(SilentTrack))
    }
}

#[cfg(feature = "device-audio")]
pub use device::RodioDevice;

#[cfg(feature = "device-audio")]
mod device {
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use tracing::info;

    use super::{OutputDevice, TrackOutput, resolve_path};
    use crate::audio::AudioError;

    /// 系统音频设备（rodio）
    pub struct RodioDevice {
        /// 音频输出流（必须保持存活）
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
        base_path: PathBuf,
    }

    impl RodioDevice {
        pub fn open(base_path: &Path) -> Result<Self, AudioError> {
            let (stream, stream_handle) =
                OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
            info!(base = %base_path.display(), "音频设备已打开");
            Ok(Self {
                _stream: stream,
                stream_handle,
                base_path: base_path.to_path_buf(),
            })
        }
    }

    struct SinkTrack {
        sink: Sink,
    }

    impl TrackOutput for SinkTrack {
        fn set_volume(&self, volume: f32) {
            self.sink.set_volume(volume);
        }

        fn stop(&self) {
            self.sink.stop();
        }

        fn is_finished(&self) -> bool {
            self.sink.empty()
        }
    }

    impl OutputDevice for RodioDevice {
        fn open_track(&self, src: &str, volume: f32) -> Result<Box<dyn TrackOutput>, AudioError> {
            let full_path = resolve_path(&self.base_path, src);
            let path = full_path.display().to_string();

            let file = File::open(&full_path).map_err(|e| AudioError::Open {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let sink =
                Sink::try_new(&self.stream_handle).map_err(|e| AudioError::Device(e.to_string()))?;

            sink.set_volume(volume);
            sink.append(source);
            Ok(Box::new(SinkTrack { sink }))
        }
    }
}
