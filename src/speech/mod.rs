//! Speech playback for assistant replies
//!
//! Synthesis itself happens on the backend (`/voice/tts`); this module only
//! plays the returned audio, one track at a time.

pub mod playback;

pub use playback::SpeechPlayer;
