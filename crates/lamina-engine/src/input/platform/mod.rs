//! Platform event translation.
//!
//! Maps winit window events onto the platform-agnostic `RawEvent` stream.

mod winit;

pub(crate) use self::winit::translate_window_event;
