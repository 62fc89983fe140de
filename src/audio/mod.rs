pub mod buffer;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod recorder;
pub mod wav;

pub use buffer::WaveformBuffer;
#[cfg(feature = "audio-io")]
pub use input::Microphone;
pub use recorder::{RecordedClip, Recorder};
pub use wav::encode_wav;
